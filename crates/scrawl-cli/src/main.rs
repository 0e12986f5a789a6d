//! # Scrawl CLI
//!
//! Generates challenge images from the command line.
//!
//! ## Usage
//! ```bash
//! # One image to stdout, the answer on stderr
//! scrawl > challenge.jpg
//!
//! # Fixed text, red 2px border, lossless
//! scrawl --text AB3K --set border.color=red --set border.thickness=2 \
//!        --set strategy.encoder=png -o challenge.png
//!
//! # 1000 challenges on all cores, with a manifest of answers
//! scrawl --count 1000 --out-dir pool/
//! ```

use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use base64::{Engine, engine::general_purpose::STANDARD};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use scrawl::{Producer, ScrawlError, Settings};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod batch;
mod config;

/// Scrawl - challenge image generator
#[derive(Parser, Debug)]
#[command(name = "scrawl")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/scrawl.toml", env = "SCRAWL_CONFIG")]
    config: String,

    /// Override a config key (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    overrides: Vec<String>,

    /// Challenge text (generated when omitted; single image only)
    #[arg(short, long)]
    text: Option<String>,

    /// Output file, "-" for stdout
    #[arg(short, long, default_value = "-")]
    output: String,

    /// Number of challenges; more than one writes a batch to --out-dir
    #[arg(short = 'n', long, default_value = "1", value_parser = clap::value_parser!(u64).range(1..))]
    count: u64,

    /// Output directory for batches
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Worker threads for batches (0 = auto-detect)
    #[arg(long, default_value = "0")]
    threads: usize,

    /// Print a JSON object with the text and a data: URI instead of raw bytes
    #[arg(long)]
    data_uri: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", env = "LOG_LEVEL")]
    log_level: String,

    /// Enable JSON logging output
    #[arg(long, default_value = "false")]
    json_logs: bool,
}

impl Args {
    /// Combinations clap cannot express on its own
    fn validate(&self) -> std::result::Result<(), clap::Error> {
        if self.count > 1 && self.text.is_some() {
            return Err(Args::command().error(
                ErrorKind::ArgumentConflict,
                "--text applies to a single image and cannot be used with --count above 1",
            ));
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct DataUriChallenge {
    text: String,
    image: String,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        let code = err.downcast_ref::<ScrawlError>().map_or(1, ScrawlError::exit_code);
        std::process::exit(code);
    }
}

fn run() -> Result<()> {
    // .env values feed the SCRAWL_* environment source
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    if let Err(err) = args.validate() {
        err.exit();
    }
    init_logging(&args.log_level, args.json_logs)?;

    info!("Starting Scrawl v{}", env!("CARGO_PKG_VERSION"));

    let properties = config::load(&args.config, &args.overrides)?;
    let producer = Producer::new(Settings::new(properties)).context("Failed to build producer")?;

    if args.count > 1 {
        let count = usize::try_from(args.count).context("Count too large")?;
        let entries = batch::run(&producer, count, &args.out_dir, args.threads)?;
        println!(
            "Wrote {} challenges and {} to {}",
            entries.len(),
            batch::MANIFEST_FILE,
            args.out_dir.display()
        );
        return Ok(());
    }

    let text = args.text.unwrap_or_else(|| producer.create_text());

    if args.data_uri {
        let mut bytes = Vec::new();
        producer.create_image(&mut bytes, &text)?;
        let challenge = DataUriChallenge {
            image: format!("data:{};base64,{}", producer.mime_type(), STANDARD.encode(&bytes)),
            text,
        };
        println!("{}", serde_json::to_string(&challenge)?);
        return Ok(());
    }

    if args.output == "-" {
        let stdout = std::io::stdout();
        let mut sink = BufWriter::new(stdout.lock());
        producer.create_image(&mut sink, &text)?;
        sink.flush().context("Failed to flush stdout")?;
        eprintln!("{text}");
    } else {
        let file = std::fs::File::create(&args.output)
            .with_context(|| format!("Failed to create {}", args.output))?;
        let mut sink = BufWriter::new(file);
        producer.create_image(&mut sink, &text)?;
        println!("{text}");
    }

    Ok(())
}

/// Initialize structured logging with tracing, on stderr
fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_args_parse_overrides() {
        let args = Args::parse_from([
            "scrawl",
            "--set",
            "border.color=red",
            "--set",
            "border.thickness=2",
            "-n",
            "4",
        ]);
        assert_eq!(args.overrides, ["border.color=red", "border.thickness=2"]);
        assert_eq!(args.count, 4);
        assert_eq!(args.output, "-");
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_zero_count_is_rejected() {
        let err = Args::try_parse_from(["scrawl", "-n", "0"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_text_with_batch_is_rejected() {
        let args = Args::try_parse_from(["scrawl", "-n", "3", "--text", "AB3K"]).unwrap();
        assert_eq!(args.validate().unwrap_err().kind(), ErrorKind::ArgumentConflict);

        let args = Args::try_parse_from(["scrawl", "-n", "1", "--text", "AB3K"]).unwrap();
        assert!(args.validate().is_ok());
        assert_eq!(args.text.as_deref(), Some("AB3K"));
    }
}
