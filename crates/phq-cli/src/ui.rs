//! Terminal rendering for scores and diagnostic reports

use colored::*;

use phq_core::{ProbeReport, ScoreResult, Severity};

use crate::{CustomDataOutcome, DiagnosticReport, SubmissionOutcome};

/// Display startup banner
pub fn display_banner() {
    let width = 52;
    let top_border = format!("┌{}┐", "─".repeat(width - 2));
    let bottom_border = format!("└{}┘", "─".repeat(width - 2));

    println!();
    println!("{}", top_border.blue());
    println!(
        "│  {}{}│",
        "PHQ-9 analysis diagnostics".blue().bold(),
        " ".repeat(width - 30)
    );
    println!("{}", bottom_border.blue());
    println!();
}

fn paint_severity(severity: Severity) -> ColoredString {
    match severity {
        Severity::Minimal => severity.label().green(),
        Severity::Mild => severity.label().cyan(),
        Severity::Moderate => severity.label().yellow(),
        Severity::ModeratelySevere | Severity::Severe => severity.label().red().bold(),
    }
}

fn yes_no(flag: bool) -> ColoredString {
    if flag { "yes".green() } else { "no".red() }
}

pub fn format_score(score: &ScoreResult) -> String {
    let mut out = format!(
        "{} {}/27\n{} {}\n",
        "Total score:".bold(),
        score.total,
        "Severity:".bold(),
        paint_severity(score.severity)
    );
    out.push_str(&format!(
        "{} {}\n",
        "AI analysis recommended:".bold(),
        yes_no(score.recommend_analysis)
    ));
    out
}

pub fn format_connectivity(available: bool) -> String {
    if available {
        format!("{} Analysis service is reachable", "✅".green())
    } else {
        format!("{} Analysis service is not reachable", "❌".red())
    }
}

fn format_probe(probe: &ProbeReport) -> String {
    let status = probe
        .status
        .map(|code| code.to_string())
        .unwrap_or_else(|| "-".to_string());
    let mut line = format!(
        "  {} {} status={} time={}ms available={}\n",
        "•".cyan(),
        probe.url,
        status,
        probe.elapsed_ms,
        yes_no(probe.available)
    );
    if let Some(snippet) = probe.body_snippet.as_deref().filter(|s| !s.is_empty()) {
        line.push_str(&format!("    body: {}\n", snippet.dimmed()));
    }
    if let Some(error) = &probe.error {
        line.push_str(&format!("    error: {}\n", error.red()));
    }
    line
}

pub fn format_report(report: &DiagnosticReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} {}\n",
        "Diagnostic run at".bold(),
        report.started_at.to_rfc3339()
    ));
    out.push_str(&format!(
        "{} {}\n",
        "Service available:".bold(),
        yes_no(report.service_available)
    ));
    out.push_str(&format!(
        "{} {}\n",
        "Endpoint available:".bold(),
        yes_no(report.endpoint_available)
    ));
    out.push_str(&format!("{}\n", "Connection detail:".bold()));
    out.push_str(&format_probe(&report.connection.service));
    out.push_str(&format_probe(&report.connection.endpoint));
    out.push_str(&format!(
        "{} total={} severity={}\n",
        "Sample questionnaire:".bold(),
        report.sample_score.total,
        paint_severity(report.sample_score.severity)
    ));

    match &report.submission {
        None => out.push_str(&format!(
            "{} skipped, endpoint unavailable\n",
            "Submission:".bold()
        )),
        Some(SubmissionOutcome::Failure { message }) => out.push_str(&format!(
            "{} {} {}\n",
            "Submission:".bold(),
            "failed:".red(),
            message
        )),
        Some(SubmissionOutcome::Success { response }) => {
            out.push_str(&format!("{} {}\n", "Submission:".bold(), "succeeded".green()));
            out.push_str(&format!(
                "  emotional state: {}\n",
                response.emotional_state.as_deref().unwrap_or("(none)")
            ));
            out.push_str(&format!(
                "  service severity: {}\n",
                response.severity.as_deref().unwrap_or("(none)")
            ));
            match &response.recommendations {
                Some(recommendations) if !recommendations.is_empty() => {
                    out.push_str("  recommendations:\n");
                    for recommendation in recommendations {
                        out.push_str(&format!("    - {}\n", recommendation));
                    }
                }
                _ => out.push_str("  recommendations: (none)\n"),
            }
        }
    }

    out
}

pub fn format_custom_outcome(outcome: &CustomDataOutcome) -> String {
    let status = if outcome.success {
        "✅ Analysis succeeded".green()
    } else {
        "❌ Analysis failed".red()
    };
    let mut out = format!("{}\n{}\n", status, outcome.summary);
    if let Some(recommendations) = outcome
        .response
        .as_ref()
        .and_then(|response| response.recommendations.as_ref())
    {
        for recommendation in recommendations {
            out.push_str(&format!("  {} {}\n", "→".green(), recommendation));
        }
    }
    out
}
