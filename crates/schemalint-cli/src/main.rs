use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use schemalint_catalog::{PostgresExtractor, SchemaExtractor};
use schemalint_core::{Config, Report};
use schemalint_engine::{process_database, StaticPluginResolver};

mod reporter;

use reporter::{summary_lines, ConsoleReporter};

const DEFAULT_CONFIG: &str = ".schemalintrc.toml";

/// schemalint - lint PostgreSQL schemas against configurable rules
#[derive(Parser)]
#[command(name = "schemalint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: .schemalintrc.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Also write a JSON report to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // A missing .env file is fine
    dotenvy::dotenv().ok();
    init_tracing(cli.verbose);

    eprintln!(
        "{}",
        format!("schemalint v{}", env!("CARGO_PKG_VERSION")).green().bold()
    );

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let config = load_config(&config_path)?;

    if cli.verbose {
        eprintln!("{} {}", "Using config:".cyan(), config_path.display());
        eprintln!(
            "{} {}",
            "Connecting to".cyan(),
            config.connection.describe()
        );
    }

    let extractor = PostgresExtractor::connect(&config.connection)
        .await
        .with_context(|| format!("Failed to connect to {}", config.connection.describe()))?;
    tracing::info!(
        extractor = extractor.name(),
        host = extractor.host(),
        port = extractor.port(),
        database = extractor.database(),
        "Connected"
    );

    // Rules ship with the binary; plugin references have nothing to resolve to
    let plugins = StaticPluginResolver::new();
    let mut reporter = ConsoleReporter::new();
    let outcome = process_database(&config, &extractor, &plugins, &mut reporter).await?;

    for line in summary_lines(&outcome) {
        println!("{}", line);
    }

    if cli.verbose {
        eprintln!(
            "Checked {} schemas ({} rule runs, {} issues)",
            outcome.schemas_checked,
            outcome.rules_run,
            reporter.reported()
        );
    }

    if let Some(output) = &cli.output {
        Report::from_outcome(&outcome)
            .save_to_file(output)
            .with_context(|| format!("Failed to write report to {}", output.display()))?;
        if cli.verbose {
            eprintln!("{} {}", "Report saved to:".green(), output.display());
        }
    }

    if outcome.status() != 0 {
        std::process::exit(outcome.status());
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Read the run configuration, taking the password from `PGPASSWORD` when
/// the file has none
fn load_config(path: &Path) -> Result<Config> {
    let mut config = Config::from_file(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;

    if config.connection.password.is_none() {
        config.connection.password = std::env::var("PGPASSWORD").ok();
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_flags() {
        let cli = Cli::parse_from(["schemalint", "-c", "lint.toml", "--verbose", "-o", "out.json"]);
        assert_eq!(cli.config, Some(PathBuf::from("lint.toml")));
        assert!(cli.verbose);
        assert_eq!(cli.output, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn loads_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[connection]
database = "app"
password = "from-file"

[rules]
name-inflection = ["error", "singular"]

[[schemas]]
name = "public"
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.connection.password.as_deref(), Some("from-file"));
        assert_eq!(config.schema_names(), vec!["public"]);
    }

    #[test]
    fn password_falls_back_to_pgpassword() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[connection]
database = "app"
user = "linter"
"#
        )
        .unwrap();

        std::env::set_var("PGPASSWORD", "from-env");
        let config = load_config(file.path());
        std::env::remove_var("PGPASSWORD");

        let config = config.unwrap();
        assert_eq!(config.connection.password.as_deref(), Some("from-env"));
        assert!(config
            .connection
            .connection_string()
            .contains("password=from-env"));
    }

    #[test]
    fn missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join(DEFAULT_CONFIG)).unwrap_err();
        assert!(err.to_string().starts_with("Failed to load config from"));
    }
}
