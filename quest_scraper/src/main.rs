//! # Quest Scraper CLI
//!
//! Reads the approved-input list, fetches each quest helper source, and
//! writes one JSON record per quest.

use clap::Parser;
use quest_compiler::config::constants::batch::MAX_WORKER_THREADS;
use quest_compiler::config::LogBackend;
use quest_compiler::logging::{self, LogLevel};
use quest_compiler::{log_info, run_batch, ApprovedInputs, QuestScraperConfig};
use quest_scraper::{batch_config, build_fetcher, ScraperError};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "quest_scraper", version, about = "Extract quest records from quest helper sources")]
struct Cli {
    /// JSON object mapping quest display names to true/false
    input_list: PathBuf,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for the <key>.json records
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Worker threads; 0 uses one per CPU
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Source root URL
    #[arg(long)]
    base_url: Option<String>,

    /// Read sources from a local checkout instead of HTTP
    #[arg(long, conflicts_with = "base_url")]
    local_root: Option<PathBuf>,

    /// Fetch timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Also write _batch_report.json
    #[arg(long)]
    report: bool,

    /// Log as JSON lines instead of through env_logger
    #[arg(long)]
    structured: bool,

    /// error, warning, info or debug
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            logging::safe_log_error(error.error_code(), &error.to_string());
            logging::print_cargo_style_summary();
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), ScraperError> {
    let mut config = QuestScraperConfig::load(cli.config.as_deref())?;
    apply_overrides(&mut config, &cli)?;
    config.validate()?;

    init_logging(&config)?;
    log_info!("Quest scraper starting",
        "input_list" => cli.input_list.display(),
        "output_dir" => config.batch.output_dir.display()
    );

    let inputs = ApprovedInputs::load(&cli.input_list)?;
    let fetcher = build_fetcher(&config, cli.local_root.clone())?;
    let results = run_batch(&inputs, fetcher.as_ref(), &batch_config(&config))?;

    let skipped: Vec<_> = results.skipped().collect();
    if !skipped.is_empty() {
        eprintln!("Skipped quests:");
        for outcome in skipped {
            eprintln!(
                "  {}: {}",
                outcome.name,
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    println!("{}", results.summary());
    logging::print_cargo_style_summary();
    Ok(())
}

/// CLI flags take precedence over the config file and environment
fn apply_overrides(config: &mut QuestScraperConfig, cli: &Cli) -> Result<(), ScraperError> {
    if let Some(dir) = &cli.output_dir {
        config.batch.output_dir = dir.clone();
    }
    if let Some(threads) = cli.threads {
        config.batch.max_threads = if threads == 0 {
            num_cpus::get().min(MAX_WORKER_THREADS)
        } else {
            threads
        };
    }
    if let Some(base_url) = &cli.base_url {
        config.fetch.source_base_url = base_url.clone();
    }
    if let Some(secs) = cli.timeout {
        config.fetch.timeout = Duration::from_secs(secs);
    }
    if cli.report {
        config.batch.write_report = true;
    }

    if let Some(level) = &cli.log_level {
        config.logging.min_log_level = LogLevel::parse(level).ok_or_else(|| {
            quest_compiler::config::ConfigError::InvalidValue {
                key: "log_level",
                reason: format!("unknown level '{}'", level),
            }
        })?;
    }
    config.logging.backend = if cli.structured || config.logging.backend == LogBackend::Structured {
        LogBackend::Structured
    } else {
        LogBackend::Facade
    };

    Ok(())
}

fn init_logging(config: &QuestScraperConfig) -> Result<(), ScraperError> {
    if config.logging.backend == LogBackend::Facade {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(facade_filter(config.logging.min_log_level)),
        )
        .init();
    }

    logging::config::init_runtime_preferences(config.logging.clone()).map_err(ScraperError::Logging)?;
    logging::init_global_logging().map_err(ScraperError::Logging)
}

fn facade_filter(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warning => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("quest_scraper").chain(args.iter().copied()))
    }

    #[test]
    fn test_overrides_take_precedence() {
        let cli = parse(&[
            "approved.json",
            "--output-dir",
            "out",
            "-j",
            "4",
            "--base-url",
            "http://localhost:8000",
            "--timeout",
            "5",
            "--report",
            "--log-level",
            "debug",
        ]);

        let mut config = QuestScraperConfig::default();
        apply_overrides(&mut config, &cli).unwrap();

        assert_eq!(config.batch.output_dir, PathBuf::from("out"));
        assert_eq!(config.batch.max_threads, 4);
        assert_eq!(config.fetch.source_base_url, "http://localhost:8000");
        assert_eq!(config.fetch.timeout, Duration::from_secs(5));
        assert!(config.batch.write_report);
        assert_eq!(config.logging.min_log_level, LogLevel::Debug);
        assert_eq!(config.logging.backend, LogBackend::Facade);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_threads_means_per_cpu() {
        let mut config = QuestScraperConfig::default();
        apply_overrides(&mut config, &parse(&["approved.json", "--threads", "0"])).unwrap();
        assert!(config.batch.max_threads >= 1);
        assert!(config.batch.max_threads <= MAX_WORKER_THREADS);
    }

    #[test]
    fn test_structured_flag_and_bad_level() {
        let mut config = QuestScraperConfig::default();
        apply_overrides(&mut config, &parse(&["approved.json", "--structured"])).unwrap();
        assert_eq!(config.logging.backend, LogBackend::Structured);

        let err = apply_overrides(&mut config, &parse(&["approved.json", "--log-level", "loud"])).unwrap_err();
        assert!(matches!(err, ScraperError::Config(_)));
    }

    #[test]
    fn test_local_root_conflicts_with_base_url() {
        let result = Cli::try_parse_from([
            "quest_scraper",
            "approved.json",
            "--local-root",
            "checkout",
            "--base-url",
            "http://x",
        ]);
        assert!(result.is_err());
    }
}
