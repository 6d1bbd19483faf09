//! HealthPort command-line interface.
//!
//! `scrape` imports a biomarker report into CSV; `redact` de-identifies a
//! clinical PDF report; `extract-text` dumps a PDF's text for checking what a
//! redaction left behind.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use healthport::portal::{ChromeBrowser, ConsoleProgress, Credentials, PortalConfig};
use healthport::{BiomarkerTable, RedactionService, RedactionTarget, ScrapeOrchestrator};

/// Personal health-data import and report de-identification
#[derive(Parser)]
#[command(name = "healthport")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in to the biomarker portal and export the report as CSV
    Scrape {
        /// Portal account email
        #[arg(long, env = "HEALTHPORT_EMAIL")]
        email: String,

        /// Portal account password
        #[arg(long, env = "HEALTHPORT_PASSWORD", hide_env_values = true)]
        password: String,

        /// Client identifier used to name the CSV file
        #[arg(long, value_name = "ID", default_value = "client")]
        id: String,

        /// Output CSV path (defaults to <ID>_functionhealth.csv)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// TOML file overriding portal URLs, selectors and timeouts
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Run the browser with a visible window
        #[arg(long)]
        show_browser: bool,

        /// Path to a Chrome or Chromium executable
        #[arg(long, value_name = "PATH")]
        chrome: Option<PathBuf>,
    },

    /// Remove patient identifiers from a clinical PDF report
    Redact {
        /// Input PDF file path
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Output PDF file path (defaults to <input>_redacted.pdf)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Additional text to redact (can be specified multiple times)
        #[arg(short, long, value_name = "PATTERN")]
        pattern: Vec<String>,
    },

    /// Extract text from a PDF (for debugging and verification)
    ExtractText {
        /// Input PDF file path
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Output text file (optional, defaults to stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "healthport=debug" } else { "healthport=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

struct ScrapeArgs {
    credentials: Credentials,
    id: String,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    show_browser: bool,
    chrome: Option<PathBuf>,
}

fn load_config(args: &ScrapeArgs) -> Result<PortalConfig> {
    let mut config = match &args.config {
        Some(path) => PortalConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PortalConfig::default(),
    };
    if args.show_browser {
        config.browser.headless = false;
    }
    if let Some(chrome) = &args.chrome {
        config.browser.chrome_executable = Some(chrome.clone());
    }
    Ok(config)
}

fn scrape(args: ScrapeArgs) -> Result<()> {
    let config = load_config(&args)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(BiomarkerTable::file_name(&args.id)));

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let orchestrator = ScrapeOrchestrator::new(ChromeBrowser::new(), config);
    let progress = ConsoleProgress::new();

    let outcome = runtime.block_on(orchestrator.run(args.credentials, &progress));
    let table = match outcome {
        Ok(table) => {
            progress.finish();
            table
        }
        Err(e) if e.is_credential_failure() => {
            progress.abandon();
            anyhow::bail!("Login failed: the portal rejected the email or password");
        }
        Err(e) => {
            progress.abandon();
            return Err(e).context("Scrape failed");
        }
    };

    table
        .save_csv(&output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!(
        "✓ Exported {} biomarker(s) → {}",
        table.len(),
        output.display()
    );
    Ok(())
}

/// Default output path: `<stem>_redacted.pdf` next to the input.
fn default_redacted_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".to_string());
    input.with_file_name(format!("{}_redacted.pdf", stem))
}

/// Clinical report targets plus any literal patterns from the command line.
fn build_targets(patterns: &[String]) -> Vec<RedactionTarget> {
    let mut targets = RedactionTarget::clinical_report();
    targets.extend(patterns.iter().map(|p| RedactionTarget::Literal(p.clone())));
    targets
}

fn redact(input: &Path, output: Option<&Path>, patterns: &[String], verbose: bool) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_redacted_path(input));

    let service = RedactionService::with_secure_strategy();
    let result = service
        .redact(input, &output, &build_targets(patterns))
        .with_context(|| "Redaction failed")?;

    if verbose {
        println!("Redaction Summary:");
        println!("  Pages processed: {}", result.pages_processed);
        println!("  Pages modified:  {}", result.pages_modified);
        println!("  Instances redacted: {}", result.instances_redacted);
        println!(
            "  Patient name: {}",
            if result.patient_name_found { "found" } else { "not found" }
        );
    }

    if result.has_redactions() {
        println!(
            "✓ Redacted {} instance(s) → {}",
            result.instances_redacted,
            output.display()
        );
    } else {
        println!("⚠ No identifiers found; copied unchanged → {}", output.display());
    }
    Ok(())
}

fn extract_text(input: &Path, output: Option<&Path>) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }

    let text = RedactionService::with_secure_strategy()
        .extract_text(input)
        .with_context(|| "Text extraction failed")?;

    match output {
        Some(path) => {
            std::fs::write(path, &text)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
            println!("✓ Extracted {} characters → {}", text.len(), path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Scrape {
            email,
            password,
            id,
            output,
            config,
            show_browser,
            chrome,
        } => scrape(ScrapeArgs {
            credentials: Credentials::new(email, password),
            id,
            output,
            config,
            show_browser,
            chrome,
        }),
        Commands::Redact {
            input,
            output,
            pattern,
        } => redact(&input, output.as_deref(), &pattern, cli.verbose),
        Commands::ExtractText { input, output } => extract_text(&input, output.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_building() {
        let targets = build_targets(&[]);
        assert_eq!(targets.len(), 2);
        assert!(matches!(targets[0], RedactionTarget::ClinicalIdentifiers));
        assert!(matches!(targets[1], RedactionTarget::PatientName));

        let targets = build_targets(&[String::from("Dr. Smith")]);
        assert_eq!(targets.len(), 3);
        assert!(matches!(&targets[2], RedactionTarget::Literal(p) if p == "Dr. Smith"));
    }

    #[test]
    fn test_default_redacted_path() {
        assert_eq!(
            default_redacted_path(Path::new("/tmp/scan.pdf")),
            PathBuf::from("/tmp/scan_redacted.pdf")
        );
        assert_eq!(
            default_redacted_path(Path::new("report")),
            PathBuf::from("report_redacted.pdf")
        );
    }

    #[test]
    fn test_cli_parses_scrape_flags() {
        let cli = Cli::try_parse_from([
            "healthport",
            "scrape",
            "--email",
            "me@example.com",
            "--password",
            "pw",
            "--id",
            "42",
            "--show-browser",
        ])
        .unwrap();
        match cli.command {
            Commands::Scrape { id, show_browser, .. } => {
                assert_eq!(id, "42");
                assert!(show_browser);
            }
            _ => panic!("expected scrape"),
        }
    }
}
