use anyhow::{bail, Context};
use brewcache::cache::ResidentAssets;
use brewcache::compression::compress;
use brewcache::config::{Config, LoggingConfig};
use brewcache::fingerprint::fingerprint;
use brewcache::transcode::ImageTranscoder;
use brewcache::upload::{UploadGate, Verdict};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Brewcache - content delivery cache and image transcoding pipeline
#[derive(Parser, Debug)]
#[command(name = "brewcache")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate configuration and pre-load resident resources
    Check {
        /// Path to configuration file
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,
    },

    /// Gate, transcode and gzip an image file
    Transcode {
        /// Image to transcode
        input: PathBuf,

        /// Declared content type (image/png, image/jpeg or image/gif)
        #[arg(short = 't', long)]
        content_type: String,

        /// Where to write the gzip stream
        #[arg(short, long)]
        output: PathBuf,

        /// Optional configuration file for upload limits
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the ETag of a file
    Fingerprint {
        file: PathBuf,
    },
}

fn main() {
    let args = Args::parse();

    let result = match args.command {
        Command::Check { config } => check(config),
        Command::Transcode {
            input,
            content_type,
            output,
            config,
        } => transcode(input, &content_type, output, config),
        Command::Fingerprint { file } => print_fingerprint(file),
    };

    if let Err(e) = result {
        tracing::error!(error = %format!("{:#}", e), "Command failed");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn load_config(path: &Path) -> Config {
    Config::from_file(path).unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::process::exit(1);
    })
}

fn check(config_path: PathBuf) -> anyhow::Result<()> {
    let config = load_config(&config_path);
    brewcache::logging::init_subscriber(&config.logging)?;

    tracing::info!(
        config_file = %config_path.display(),
        assets_root = %config.assets.root.display(),
        resident = config.resident.len(),
        upload_max_bytes = config.uploads.max_bytes,
        "Configuration loaded successfully"
    );

    let resident = ResidentAssets::load(&config.resident)?;
    tracing::info!(resident = resident.len(), "Resident resources ready");
    println!("Configuration OK ({} resident resources)", resident.len());
    Ok(())
}

fn transcode(
    input: PathBuf,
    content_type: &str,
    output: PathBuf,
    config_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = config_path
        .as_deref()
        .map(load_config)
        .unwrap_or_default();
    brewcache::logging::init_subscriber(&config.logging)?;

    let data = std::fs::read(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let gate = UploadGate::from_config(&config.uploads);
    let kind = match gate.admit(content_type, Some(data.len() as u64)) {
        Verdict::Accepted(kind) => kind,
        Verdict::Rejected(reason) => bail!("{} ({})", reason.public_message(), reason),
    };

    let transcoded = ImageTranscoder::from_config(&config.uploads).transcode_kind(kind, &data)?;
    let compressed = compress(&transcoded)?;
    std::fs::write(&output, &compressed)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        format = %kind,
        original_bytes = data.len(),
        transcoded_bytes = transcoded.len(),
        compressed_bytes = compressed.len(),
        "Transcode complete"
    );
    Ok(())
}

fn print_fingerprint(file: PathBuf) -> anyhow::Result<()> {
    brewcache::logging::init_subscriber(&LoggingConfig::default())?;
    let data =
        std::fs::read(&file).with_context(|| format!("Failed to read {}", file.display()))?;
    println!("{}", fingerprint(&data));
    Ok(())
}
