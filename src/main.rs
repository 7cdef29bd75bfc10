use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use devscout::config::{find_config_file, load_config, Config, PacingConfig};
use devscout::github::GitHubClient;
use devscout::models::{CandidateUser, SearchCriteria};
use devscout::scoring::ScoreCalculator;
use devscout::search::Orchestrator;
use devscout::sources::ExtractionChain;
use devscout::ui::{self, SearchProgressBar, Status};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// devscout - find GitHub developers by language and location and discover a contact email
#[derive(Parser, Debug)]
#[command(name = "devscout")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Find GitHub developers, discover a contact email, and rank them by activity", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds (overrides the config file)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

impl OutputFormat {
    fn resolve(self) -> Self {
        match self {
            OutputFormat::Auto if ui::is_terminal() => OutputFormat::Table,
            OutputFormat::Auto => OutputFormat::Json,
            other => other,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search developers and list those with a discoverable email, best score first
    #[command(alias = "s")]
    Search {
        /// Primary language (e.g. "rust")
        #[arg(long, short)]
        language: String,

        /// Location (e.g. "seoul")
        #[arg(long = "location", short = 'L')]
        location: String,

        /// Number of users to request from the search (1-100)
        #[arg(long)]
        limit: Option<u32>,

        /// Milliseconds to wait after each user (0 disables pacing)
        #[arg(long)]
        delay_ms: Option<u64>,
    },

    /// Run the email extraction chain for one user
    #[command(alias = "e")]
    Email {
        /// GitHub login
        username: String,
    },

    /// Compute the popularity score of one user
    Score {
        /// GitHub login
        username: String,
    },

    /// Print the effective configuration (token redacted)
    Config,
}

fn init_tracing(verbose: u8, quiet: bool) {
    let log_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = if quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("devscout={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn resolve_config(cli: &Cli) -> Result<Config> {
    let path = match &cli.config {
        Some(path) => Some(path.clone()),
        None => find_config_file(),
    };
    if let Some(path) = &path {
        tracing::info!("Using config file: {}", path.display());
    }

    let mut config = load_config(path.as_deref()).context("Failed to load configuration")?;
    if let Some(timeout) = cli.timeout {
        config.http.timeout_seconds = timeout;
    }

    config.validate().context("Invalid configuration")
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let mut config = resolve_config(&cli)?;
    let format = cli.output.resolve();

    match cli.command {
        Commands::Search {
            language,
            location,
            limit,
            delay_ms,
        } => {
            if let Some(limit) = limit {
                config.search.page_size = limit;
            }
            if let Some(delay_ms) = delay_ms {
                config.pacing = if delay_ms == 0 {
                    PacingConfig::disabled()
                } else {
                    PacingConfig::fixed(delay_ms)
                };
            }
            let config = config.validate().context("Invalid search options")?;

            let criteria = SearchCriteria::new(language, location);
            let orchestrator =
                Orchestrator::from_config(&config).context("Failed to set up GitHub client")?;

            let show_progress = format == OutputFormat::Table && !cli.quiet;
            let progress = if show_progress {
                SearchProgressBar::new("Searching GitHub users")
            } else {
                SearchProgressBar::hidden()
            };

            let started = Instant::now();
            let candidates = orchestrator
                .search_with_progress(&criteria, |p| {
                    progress.set_length(p.total as u64);
                    progress.advance(p.username, p.found);
                })
                .await;

            if candidates.is_empty() {
                progress.finish_with_error("No developers with a contact email found");
            } else {
                progress.clear();
            }

            if show_progress {
                ui::print_search_header(&criteria, candidates.len(), started.elapsed());
            }
            output_candidates(&candidates, format)?;
        }

        Commands::Email { username } => {
            let client = GitHubClient::new(&config)?;
            let chain = ExtractionChain::github(client);
            let outcome = chain.lookup(&username).await;

            match format {
                OutputFormat::Json => {
                    let failures: Vec<serde_json::Value> = outcome
                        .failures
                        .iter()
                        .map(|f| serde_json::json!({ "source": f.source, "error": f.error.to_string() }))
                        .collect();
                    let body = serde_json::json!({
                        "username": username,
                        "email": outcome.email(),
                        "source": outcome.discovery.as_ref().map(|d| d.source.as_str()),
                        "failures": failures,
                    });
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                _ => {
                    for failure in &outcome.failures {
                        ui::print_status(
                            Status::Warning,
                            &format!("{}: {}", failure.source, failure.error),
                        );
                    }
                    match &outcome.discovery {
                        Some(d) => ui::print_status(
                            Status::Success,
                            &format!("{} <{}> (via {})", username, d.email, d.source),
                        ),
                        None => ui::print_status(
                            Status::Error,
                            &format!("No contact email found for {}", username),
                        ),
                    }
                }
            }
        }

        Commands::Score { username } => {
            let client = GitHubClient::new(&config)?;
            let card = ScoreCalculator::from_config(client, &config)
                .score_user(&username)
                .await;

            match format {
                OutputFormat::Json => {
                    let body = serde_json::json!({ "username": username, "score": card });
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                _ => println!("{}", ui::render_score_card(&username, &card)),
            }
        }

        Commands::Config => {
            let shown = config.redacted();
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&shown)?),
                _ => {
                    ui::print_section("Configuration");
                    println!(
                        "{}",
                        toml::to_string_pretty(&shown).context("Failed to render configuration")?
                    );
                }
            }
        }
    }

    Ok(())
}

fn output_candidates(candidates: &[CandidateUser], format: OutputFormat) -> Result<()> {
    match format.resolve() {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(candidates)?);
        }
        OutputFormat::Plain => {
            if !candidates.is_empty() {
                println!("{}", ui::render_plain(candidates));
            }
        }
        OutputFormat::Table | OutputFormat::Auto => {
            if !candidates.is_empty() {
                println!("{}", ui::render_table(candidates));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_version() {
        let version = env!("CARGO_PKG_VERSION");
        assert!(!version.is_empty());
        let parts: Vec<&str> = version.split('.').collect();
        assert!(parts.len() >= 2);
        assert!(parts[0].parse::<u32>().is_ok());
    }

    #[test]
    fn test_cli_search_command() {
        let cli = Cli::try_parse_from([
            "devscout", "search", "--language", "rust", "-L", "seoul", "--limit", "20",
        ])
        .unwrap();

        match cli.command {
            Commands::Search {
                language,
                location,
                limit,
                delay_ms,
            } => {
                assert_eq!(language, "rust");
                assert_eq!(location, "seoul");
                assert_eq!(limit, Some(20));
                assert_eq!(delay_ms, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_search_requires_filters() {
        assert!(Cli::try_parse_from(["devscout", "search", "--language", "rust"]).is_err());
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::try_parse_from([
            "devscout", "-vv", "--output", "json", "--timeout", "5", "email", "octocat",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.timeout, Some(5));
        assert!(matches!(cli.command, Commands::Email { ref username } if username == "octocat"));
    }

    #[test]
    fn test_cli_score_and_config_commands() {
        let cli = Cli::try_parse_from(["devscout", "score", "octocat", "-q"]).unwrap();
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Score { .. }));

        let cli = Cli::try_parse_from(["devscout", "config", "--config", "custom.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(matches!(cli.command, Commands::Config));
    }

    #[test]
    fn test_output_format_resolve() {
        assert_eq!(OutputFormat::Json.resolve(), OutputFormat::Json);
        assert_eq!(OutputFormat::Plain.resolve(), OutputFormat::Plain);
        assert_ne!(OutputFormat::Auto.resolve(), OutputFormat::Auto);
    }
}
