//! CLI binary for qrphone.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `IntakeConfig` and prints the outcome.

use anyhow::{Context, Result};
use clap::Parser;
use qrphone::{scan_input, IntakeConfig, Outcome};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Scan a local image
  qrphone contact.png

  # Scan an image from a URL
  qrphone https://example.com/codes/contact.png

  # Machine-readable output
  qrphone --json contact.png

  # Accept WebP uploads too and bound decode time
  qrphone --allow-ext png --allow-ext jpg --allow-ext webp --decode-timeout 5 scan.webp

EXIT STATUS:
  0  a phone number was resolved
  1  the image could not be read (missing file, bad format, download error)
  2  the image was read but no phone number could be resolved

ENVIRONMENT VARIABLES:
  QRPHONE_UPLOAD_DIR        Directory for materialised uploads
  QRPHONE_DOWNLOAD_TIMEOUT  URL download timeout in seconds
  QRPHONE_DECODE_TIMEOUT    Decode timeout in seconds
  RUST_LOG                  Override log filter (e.g. qrphone=debug)
"#;

/// Extract a phone number from a QR code image and identify its country.
#[derive(Parser, Debug)]
#[command(
    name = "qrphone",
    version,
    about = "Extract a phone number from a QR code image and identify its country",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local image path or HTTP/HTTPS URL.
    input: String,

    /// Print the outcome as JSON instead of text.
    #[arg(long, env = "QRPHONE_JSON")]
    json: bool,

    /// Allowed file extension (repeatable). Replaces the default png/jpg/jpeg.
    #[arg(long = "allow-ext", value_name = "EXT")]
    allow_ext: Vec<String>,

    /// Directory uploads are materialised in.
    #[arg(long, env = "QRPHONE_UPLOAD_DIR")]
    upload_dir: Option<PathBuf>,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "QRPHONE_DOWNLOAD_TIMEOUT", default_value_t = 30)]
    download_timeout: u64,

    /// Abort decoding after this many seconds.
    #[arg(long, env = "QRPHONE_DECODE_TIMEOUT")]
    decode_timeout: Option<u64>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "QRPHONE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except the result and errors.
    #[arg(short, long, env = "QRPHONE_QUIET")]
    quiet: bool,
}

fn build_config(cli: &Cli) -> Result<IntakeConfig> {
    let mut builder = IntakeConfig::builder().download_timeout_secs(cli.download_timeout);
    if !cli.allow_ext.is_empty() {
        builder = builder.allowed_extensions(&cli.allow_ext);
    }
    if let Some(ref dir) = cli.upload_dir {
        builder = builder.upload_dir(dir);
    }
    if let Some(secs) = cli.decode_timeout {
        builder = builder.decode_timeout_secs(secs);
    }
    builder.build().context("Invalid configuration")
}

fn print_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Resolved {
            phone_token,
            number,
        } => {
            println!("{} {}", green("✔"), bold("Extracted Phone Number Details"));
            println!("Phone Number: {}", phone_token);
            println!("Country Code: +{}", number.calling_code);
            println!(
                "Country:      {}",
                number.country_name.as_deref().unwrap_or("")
            );
        }
        Outcome::NotFound { reason, .. } => {
            eprintln!("{} {}", red("✘"), reason.user_message());
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let config = build_config(&cli)?;

    // ── Run scan ─────────────────────────────────────────────────────────
    let outcome = scan_input(&cli.input, &config)
        .await
        .with_context(|| format!("Failed to scan '{}'", cli.input))?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&outcome).context("Failed to serialize outcome")?
        );
    } else {
        print_outcome(&outcome);
    }

    Ok(if outcome.is_resolved() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn repeated_allow_ext_replaces_whitelist() {
        let cli = Cli::parse_from([
            "qrphone",
            "--allow-ext",
            "PNG",
            "--allow-ext",
            "webp",
            "scan.webp",
        ]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.allowed_extensions, vec!["png", "webp"]);
    }

    #[test]
    fn zero_decode_timeout_is_rejected() {
        let cli = Cli::parse_from(["qrphone", "--decode-timeout", "0", "qr.png"]);
        assert!(build_config(&cli).is_err());
    }
}
