use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use hwmon::config::{self, Config, OutputFormat};
use hwmon::render::{self, DetailedReport, JsonRenderer, TextRenderer};
use hwmon::sampler::{self, CancelToken, ExitReason, Render};
use hwmon::system::Collector;

#[derive(Parser)]
#[command(name = "hwmon", about = "Terminal hardware monitor")]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seconds between samples
    #[arg(long)]
    interval: Option<f64>,

    /// Output format for monitored samples
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Mount point whose disk usage is reported
    #[arg(long)]
    disk: Option<PathBuf>,

    /// Log filter, e.g. `info` or `hwmon=debug` (overrides RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, default_value_t = false)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy, Debug)]
enum Command {
    /// Print machine identity as JSON
    Snapshot,
    /// Sample periodically until the duration elapses or Ctrl+C
    Monitor {
        /// Stop after this many seconds
        #[arg(long, conflicts_with = "forever")]
        duration: Option<f64>,

        /// Run until interrupted
        #[arg(long, default_value_t = false)]
        forever: bool,
    },
    /// Print a detailed JSON report of one sample
    Report,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let (config, load_error) = config::load_config(cli.config.as_deref());
    let config = apply_cli_overrides(config, &cli);

    hwmon::logging::init(
        cli.log_level.as_deref(),
        &config.logging.level,
        config.logging.json,
    )?;
    if let Some(err) = load_error {
        tracing::warn!(error = %err, "using default config");
    }

    let command = match cli.command {
        Some(command) => command,
        None => match choose_from_menu()? {
            Some(command) => command,
            None => {
                println!("❌ Invalid choice");
                return Ok(());
            }
        },
    };

    let mut collector = Collector::new(&config.general.disk_mount);
    match command {
        Command::Snapshot => {
            let info = collector.hardware_info();
            println!("{}", serde_json::to_string_pretty(&info)?);
            Ok(())
        }
        Command::Report => {
            warm_up().await;
            let sample = sampler::MetricsProvider::sample(&mut collector)
                .wrap_err("failed to collect system metrics")?;
            let report = DetailedReport::from_sample(&sample);
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Command::Monitor { duration, forever } => {
            let mut config = config;
            if forever {
                config.general.duration_secs = None;
            } else if duration.is_some() {
                config.general.duration_secs = duration;
            }
            monitor(&config, &mut collector).await
        }
    }
}

async fn monitor(config: &Config, collector: &mut Collector) -> Result<()> {
    let settings = config
        .sampler_settings()
        .wrap_err("invalid sampler settings")?;
    let format = config.general.format;

    if format == OutputFormat::Text {
        println!("{}", render::banner(&collector.hardware_info()));
    }

    let cancel = CancelToken::new();
    let signal_task = sampler::install_ctrl_c(cancel.clone());

    let mut renderer: Box<dyn Render> = match format {
        OutputFormat::Text => Box::new(TextRenderer::new(io::stdout())),
        OutputFormat::Json => Box::new(JsonRenderer::new(io::stdout())),
    };

    warm_up().await;
    let summary = sampler::run(collector, renderer.as_mut(), &settings, &cancel).await;
    signal_task.abort();

    match summary.reason {
        ExitReason::Cancelled | ExitReason::TimedOut => {
            if format == OutputFormat::Text {
                println!("\n👋 Monitoring stopped");
            }
            Ok(())
        }
        ExitReason::ProviderFatal => Err(eyre!(
            "metrics provider failed after {} ticks: {}",
            summary.ticks,
            summary
                .last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown error".to_string())
        )),
    }
}

/// sysinfo needs two CPU refreshes some time apart before usage is meaningful.
async fn warm_up() {
    tokio::time::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL).await;
}

fn choose_from_menu() -> Result<Option<Command>> {
    println!("Choose an action:");
    println!("1. Show system information");
    println!("2. Live monitor");
    println!("3. Detailed hardware report");
    print!("\nSelect (1-3): ");
    io::stdout().flush()?;

    let mut choice = String::new();
    io::stdin().lock().read_line(&mut choice)?;

    Ok(match choice.trim() {
        "1" => Some(Command::Snapshot),
        "2" => Some(Command::Monitor {
            duration: None,
            forever: false,
        }),
        "3" => Some(Command::Report),
        _ => None,
    })
}

fn apply_cli_overrides(mut config: Config, cli: &Cli) -> Config {
    if let Some(interval) = cli.interval {
        config.general.interval_secs = interval;
    }
    if let Some(format) = cli.format {
        config.general.format = format;
    }
    if let Some(ref disk) = cli.disk {
        config.general.disk_mount = disk.clone();
    }
    if cli.log_json {
        config.logging.json = true;
    }
    config
}
