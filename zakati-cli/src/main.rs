//! # Zakati - Command-line Zakat Calculator
//!
//! Computes Zakat on declared holdings using live gold, silver and exchange
//! rates, prints a summary and writes `Zakat_Report.pdf`.
//!
//! ## Usage
//! ```bash
//! # Live prices (needs METAL_API_KEY)
//! zakati --cash 30000 --debts 500 --base SAR --output USD
//!
//! # Guided prompts
//! zakati --interactive
//!
//! # Manual prices, no network
//! zakati --offline --gold-price 250 --silver-price 3 --cash 30000
//!
//! # Run system diagnostics
//! zakati doctor
//! ```

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use zakati_core::prelude::*;
use zakati_providers::LiveRateProvider;
use zakati_report::ReportArtifact;

mod config_loader;
mod input;
mod output;
mod wizard;

use config_loader::{CliConfig, ProviderFlags};
use input::{parse_currency, HoldingsInput};

/// Zakat calculator with live metal prices
#[derive(Parser, Debug)]
#[command(name = "zakati")]
#[command(author = "Zakati contributors")]
#[command(version)]
#[command(about = "Zakat calculator with live metal prices and a PDF report", long_about = None)]
struct Args {
    /// Currency the declared amounts are in
    #[arg(long, value_parser = parse_currency)]
    base: Option<Currency>,

    /// Currency to report results in
    #[arg(long, value_parser = parse_currency)]
    output: Option<Currency>,

    #[command(flatten)]
    holdings: HoldingsInput,

    #[command(flatten)]
    provider: ProviderFlags,

    /// Ask for every value interactively
    #[arg(short, long, default_value = "false")]
    interactive: bool,

    /// Use the given prices instead of fetching live
    #[arg(long, default_value = "false")]
    offline: bool,

    /// Gold price per gram in the base currency (offline mode)
    #[arg(long, requires = "offline")]
    gold_price: Option<Decimal>,

    /// Silver price per gram in the base currency (offline mode)
    #[arg(long, requires = "offline")]
    silver_price: Option<Decimal>,

    /// Base to output multiplier (offline mode)
    #[arg(long, requires = "offline")]
    exchange_rate: Option<Decimal>,

    /// Directory to write Zakat_Report.pdf into
    #[arg(long, conflicts_with = "no_report")]
    report: Option<PathBuf>,

    /// Skip writing the PDF report
    #[arg(long, default_value = "false")]
    no_report: bool,

    /// Print the result as JSON instead of a table
    #[arg(long, default_value = "false")]
    json: bool,

    /// Print the step-by-step calculation
    #[arg(long, default_value = "false")]
    explain: bool,

    /// Enable file logging to logs/ directory
    #[arg(long, default_value = "false")]
    log: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run diagnostics to check configuration and connectivity
    Doctor,
    /// Write a sample configuration file
    InitConfig,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        let message = match e.downcast_ref::<ZakatError>() {
            Some(zakat_error) => zakat_error.user_message(),
            None => e.to_string(),
        };
        eprintln!("Error: {}", message);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let loaded = CliConfig::load();
    let log_to_file = args.log || loaded.as_ref().ok().and_then(|c| c.enable_logging).unwrap_or(false);

    // Keeps the file writer alive until exit.
    let _file_guard = init_tracing(log_to_file)?;

    match args.command {
        Some(Commands::Doctor) => return run_doctor(loaded, &args.provider).await,
        Some(Commands::InitConfig) => {
            let path = CliConfig::create_sample()?;
            println!("Wrote sample configuration to {}", path.display());
            return Ok(());
        }
        None => {}
    }

    run_calculation(args, loaded?).await
}

fn init_tracing(to_file: bool) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>, Box<dyn std::error::Error>> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    if to_file {
        std::fs::create_dir_all("logs")?;

        let file_appender = tracing_appender::rolling::daily("logs", "zakati.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let env_filter = tracing_subscriber::EnvFilter::from_default_env().add_directive("zakati=debug".parse()?);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(non_blocking)
                    .with_ansi(false),
            )
            .init();

        info!("--- Zakat Calculation Session Started [{}] ---", chrono::Utc::now());
        Ok(Some(guard))
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive("zakati=info".parse()?))
            .with_writer(io::stderr)
            .init();
        Ok(None)
    }
}

async fn run_calculation(args: Args, config: CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut base = args.base.or(config.base_currency).unwrap_or_default();
    let mut output_currency = args.output.or(config.output_currency).unwrap_or(base);
    let mut holdings = args.holdings.clone();

    if args.interactive {
        let answers = wizard::run_wizard_mode(base, output_currency)?;
        base = answers.base;
        output_currency = answers.output;
        holdings = answers.holdings;
    }

    let (assets, liabilities) = holdings.to_declarations()?;
    let provider = select_provider(&args, &config)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.green} {msg}")?);
    spinner.set_message(if args.offline { "Calculating..." } else { "Fetching current rates..." });
    spinner.enable_steady_tick(Duration::from_millis(100));
    let outcome = calculate(provider.as_ref(), &assets, &liabilities, base, output_currency).await;
    spinner.finish_and_clear();
    let result = outcome?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", output::summary_table(&result));
        println!("{}", output::status_line(&result));
    }

    if args.explain {
        println!("\n{}", result.explain());
    }

    if !args.no_report {
        let dir = args.report.or(config.report_dir).unwrap_or_else(|| PathBuf::from("."));
        let path = ReportArtifact::from_result(&result)?.save_in(&dir)?;
        eprintln!("Report saved to {}", path.display());
    }

    Ok(())
}

/// Static prices in offline mode, the live services otherwise.
fn select_provider(args: &Args, config: &CliConfig) -> Result<Box<dyn RateProvider>, Box<dyn std::error::Error>> {
    if args.offline {
        let gold = args
            .gold_price
            .or(config.gold_price)
            .ok_or_else(|| ZakatError::invalid_input("gold_price", "--gold-price is required with --offline"))?;
        let silver = args
            .silver_price
            .or(config.silver_price)
            .ok_or_else(|| ZakatError::invalid_input("silver_price", "--silver-price is required with --offline"))?;

        let mut provider = StaticRateProvider::new(gold, silver)?;
        if let Some(rate) = args.exchange_rate {
            provider = provider.with_exchange_rate(rate)?;
        }
        info!("Using offline prices");
        return Ok(Box::new(provider));
    }

    let provider_config = config.provider_config(|name| env::var(name).ok(), &args.provider)?;
    Ok(Box::new(LiveRateProvider::new(&provider_config)?))
}

/// Run doctor diagnostics
async fn run_doctor(
    loaded: Result<CliConfig, ZakatError>,
    flags: &ProviderFlags,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n🚑 Zakati Doctor - Diagnostics Tool");
    println!("═══════════════════════════════════════════════\n");

    // 1. Environment Info
    println!("1. System Information:");
    println!("   OS: {}", std::env::consts::OS);
    println!("   Arch: {}", std::env::consts::ARCH);
    println!("   CLI Version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "   NO_COLOR: {}",
        if env::var("NO_COLOR").is_ok() { "Set (True)" } else { "Unset" }
    );

    // 2. Configuration
    println!("\n2. Configuration:");
    match CliConfig::config_path() {
        Some(path) if path.exists() => println!("   Config File: {}", path.display()),
        Some(path) => println!("   Config File: {} (not found, using defaults)", path.display()),
        None => println!("   Config File: unavailable on this platform"),
    }
    let config = loaded.unwrap_or_else(|e| {
        println!("   ✗ {}", e);
        println!("   Continuing with built-in defaults.");
        CliConfig::default()
    });

    let provider_config = match config.provider_config(|name| env::var(name).ok(), flags) {
        Ok(provider_config) => provider_config,
        Err(e) => {
            println!("   ✗ {}", e);
            println!("\nDiagnostics Complete.\n");
            return Ok(());
        }
    };
    println!("   Metal API: {}", provider_config.metal_base_url);
    println!("   Exchange API: {}", provider_config.exchange_base_url);
    println!("   Metal API Key: {}", key_status(provider_config.metal_api_key.is_some()));
    println!("   Exchange API Key: {}", key_status(provider_config.exchange_api_key.is_some()));

    // 3. Network Connectivity
    println!("\n3. Network & Pricing:");
    let base = config.base_currency.unwrap_or_default();
    match LiveRateProvider::new(&provider_config) {
        Ok(provider) => {
            print!("   Requesting gold price in {}... ", base);
            io::stdout().flush()?;
            report_quote(provider.get_metal_unit_price(MetalSymbol::Gold, base).await);

            print!("   Requesting USD->{} rate... ", base);
            io::stdout().flush()?;
            report_quote(provider.get_exchange_rate(Currency::Usd, base).await);
        }
        Err(e) => {
            warn!("Live provider unavailable: {}", e);
            println!("   Skipped: {}", e);
        }
    }

    // 4. Storage
    println!("\n4. Storage:");
    let current_dir = std::env::current_dir()?;
    println!("   Current Directory: {:?}", current_dir);
    println!(
        "   Write Access: {}",
        if !std::fs::metadata(&current_dir)?.permissions().readonly() { "Yes" } else { "No" }
    );

    println!("\nDiagnostics Complete.\n");
    Ok(())
}

fn key_status(present: bool) -> &'static str {
    if present { "set" } else { "missing" }
}

fn report_quote(outcome: Result<RateQuote, ZakatError>) {
    match outcome {
        Ok(quote) if quote.is_fallback => println!("⚠ Connected but no entry for {}", quote.pair),
        Ok(quote) => println!("✓ OK ({:.4})", quote.value),
        Err(e) => {
            println!("✗ FAILED");
            println!("   Error: {}", e);
        }
    }
}

