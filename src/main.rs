use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::sync::Arc;
use tokio::sync::oneshot;

use phq_analysis::{AnalysisClient, AnalysisConfig};
use phq_cli::{
    display_banner, format_connectivity, format_custom_outcome, format_report, format_score,
    DebugHarness, SubmissionOutcome,
};
use phq_core::{score_responses, AnalysisService};

mod telemetry;

#[derive(Parser)]
#[command(name = "phq")]
#[command(about = "PHQ-9 scoring and analysis service diagnostics", long_about = None)]
struct Cli {
    /// Base URL of the analysis service (overrides PHQ_ANALYSIS_URL)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Submission path under the base URL (overrides PHQ_ANALYSIS_ENDPOINT)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score nine answers locally
    Score {
        #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
        responses: Vec<i32>,

        /// Submit for analysis when the score warrants it
        #[arg(long)]
        submit: bool,
    },
    /// Check whether the analysis service is reachable
    Check,
    /// Run the full diagnostic sequence with the sample questionnaire
    Diagnose,
    /// Validate and submit custom answers
    Submit {
        #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
        responses: Vec<i32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    telemetry::init(&cli.log_level)?;

    let mut config = AnalysisConfig::from_env()?;
    if let Some(url) = cli.url {
        config.base_url = url;
    }
    if let Some(endpoint) = cli.endpoint {
        config.endpoint_path = endpoint;
    }

    let client = AnalysisClient::new(config)?;
    tracing::debug!(endpoint = %client.endpoint_url(), "analysis client ready");
    let harness = DebugHarness::new(Arc::new(client));

    let succeeded = match cli.command {
        Commands::Score { responses, submit } => run_score(&harness, &responses, submit).await,
        Commands::Check => {
            let available = harness.quick_connectivity_check().await;
            println!("{}", format_connectivity(available));
            available
        }
        Commands::Diagnose => run_diagnose(&harness).await,
        Commands::Submit { responses } => {
            let outcome = harness.test_with_custom_data(&responses).await;
            print!("{}", format_custom_outcome(&outcome));
            outcome.success
        }
    };

    if !succeeded {
        std::process::exit(1);
    }

    Ok(())
}

async fn run_score<S>(harness: &DebugHarness<S>, responses: &[i32], submit: bool) -> bool
where
    S: AnalysisService + ?Sized + 'static,
{
    let score = match score_responses(responses) {
        Ok(score) => score,
        Err(e) => {
            println!("{} {}", "❌".red(), e);
            return false;
        }
    };

    print!("{}", format_score(&score));

    if !submit {
        return true;
    }

    if !score.recommend_analysis {
        println!("{} Score below analysis threshold, nothing submitted", "💡".cyan());
        return true;
    }

    println!("{} Submitting for analysis...", "🤖".blue());
    let outcome = harness.test_with_custom_data(responses).await;
    print!("{}", format_custom_outcome(&outcome));
    outcome.success
}

async fn run_diagnose<S>(harness: &DebugHarness<S>) -> bool
where
    S: AnalysisService + ?Sized + 'static,
{
    display_banner();

    let (tx, rx) = oneshot::channel();
    let task = harness.spawn_full_diagnostic(move |report| {
        let _ = tx.send(report);
    });

    tokio::select! {
        received = rx => match received {
            Ok(report) => {
                print!("{}", format_report(&report));
                matches!(report.submission, Some(SubmissionOutcome::Success { .. }))
            }
            Err(_) => false,
        },
        _ = tokio::signal::ctrl_c() => {
            task.cancel();
            println!("{} Diagnostic run cancelled", "⚠️".yellow());
            false
        }
    }
}
