use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use verity::{ApiClient, ClientConfig, PredictionBackend, PredictionController, RequestState};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Root address of the prediction service (overrides VERITY_API_BASE)
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in seconds (overrides VERITY_TIMEOUT_SECS; none by default)
    #[arg(long)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify text given as an argument, read from a file, or piped on stdin
    Predict {
        text: Option<String>,
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,
    },
    /// Classify the built-in sample paragraph
    Example,
    /// Check that the service is up
    Health,
    /// Show which model the service is running
    Meta,
    /// Print the service's documentation and status URLs
    Links,
}

/// Environment first, then command line flags on top.
fn build_config(args: &Args) -> Result<ClientConfig> {
    let mut config = ClientConfig::from_env()?;
    if let Some(base) = &args.base_url {
        config = config.with_base_url(base)?;
    }
    if let Some(secs) = args.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    Ok(config)
}

fn read_input(text: Option<String>, file: Option<PathBuf>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(path) = file {
        return std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()));
    }
    if io::stdin().is_terminal() {
        bail!("no text given: pass TEXT, --file PATH, or pipe text on stdin");
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf).context("reading stdin")?;
    Ok(buf)
}

fn confidence_bar(percent: u8) -> String {
    const WIDTH: usize = 20;
    let filled = (percent as usize * WIDTH + 50) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(WIDTH - filled))
}

fn render<B: PredictionBackend>(controller: &PredictionController<B>) -> bool {
    let stats = controller.stats();
    println!("{} words • {} chars", stats.words, stats.chars);

    match controller.state() {
        RequestState::Success(result) => {
            let pct = result.confidence_percent();
            println!("\nResult:");
            println!("  {}", result.label);
            println!("  class: {}", result.prediction.class_id());
            println!("  {} ms", result.ms);
            println!("  Confidence: {}% {}", pct, confidence_bar(pct));
            println!("\nConfidence is probability: useful signal, not absolute truth.");
            true
        }
        RequestState::Error(message) => {
            eprintln!("\nRequest failed");
            eprintln!("  {}", message);
            false
        }
        RequestState::Idle | RequestState::Loading => {
            println!("\nNo prediction yet.");
            false
        }
    }
}

async fn run_prediction(client: ApiClient, text: Option<String>) -> bool {
    let mut controller = PredictionController::new(client);
    match text {
        Some(text) => controller.set_text(text),
        None => controller.fill_example(),
    }

    let start = Instant::now();
    controller.submit().await;
    info!("Round trip took {:.2?}", start.elapsed());

    render(&controller)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();

    let config = build_config(&args)?;
    info!("Using prediction service at {}", config.base_url);
    let client = ApiClient::new(config)?;

    let ok = match args.command {
        Command::Predict { text, file } => {
            let text = read_input(text, file)?;
            run_prediction(client, Some(text)).await
        }
        Command::Example => run_prediction(client, None).await,
        Command::Health => {
            let health = client.health().await?;
            println!("ok: {}", health.ok);
            health.ok
        }
        Command::Meta => {
            let meta = client.meta().await?;
            println!("model: {}", meta.model);
            println!("vectorizer: {}", meta.vectorizer);
            let mut labels: Vec<_> = meta.labels.into_iter().collect();
            labels.sort();
            for (class, label) in labels {
                println!("  {}: {}", class, label);
            }
            true
        }
        Command::Links => {
            let links = client.links();
            println!("docs:   {}", links.docs);
            println!("health: {}", links.health);
            println!("meta:   {}", links.meta);
            true
        }
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
