use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

pub mod config;
pub mod provider;
pub mod reconcile;
pub mod resolver;

use provider::Service;

/// Audit resources of an AWS service for missing tags and optionally fill them in.
#[derive(Parser, Debug)]
#[command(name = "tagger", version)]
struct Cli {
    /// Service to scan: lambda, cloudwatchlogs or cloudfront
    service: Service,

    /// Comma separated tags to scan for
    tags: String,

    /// AWS region
    #[arg(short, long, default_value = "us-east-1")]
    region: String,

    /// Write tags to the service
    #[arg(short, long)]
    write: bool,

    /// File which holds the mappings to write
    #[arg(short, long, default_value = "tag_config.yaml")]
    file: PathBuf,

    /// Simulate a dry run, used together with --write
    #[arg(short, long)]
    dry_run: bool,

    /// Write the tag even if it is already set
    #[arg(short, long)]
    overwrite: bool,
}

impl Cli {
    fn options(&self) -> reconcile::Options {
        reconcile::Options {
            write: self.write,
            dry_run: self.dry_run,
            overwrite: self.overwrite,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let target_tags = config::parse_tag_list(&cli.tags);
    if target_tags.is_empty() {
        anyhow::bail!("No tags given to scan for");
    }
    if cli.dry_run && !cli.write {
        warn!("--dry-run only has an effect together with --write");
    }

    // The config is only needed to write, and must cover every requested tag
    // before any AWS client is created.
    let tag_config = if cli.write {
        let tag_config = config::parse(&cli.file)
            .with_context(|| format!("Failed to load tag config from {}", cli.file.display()))?;
        tag_config.ensure_tags_present(&target_tags)?;
        Some(tag_config)
    } else {
        None
    };

    info!("Loading {} resources for region {}", cli.service, cli.region);
    let sdk_config = provider::sdk_config(&cli.region).await;
    let provider = provider::for_service(cli.service, &sdk_config);

    let summary = reconcile::run(
        provider.as_ref(),
        &target_tags,
        tag_config.as_ref(),
        cli.options(),
    )
    .await
    .with_context(|| format!("Tagging {} resources failed", cli.service))?;

    info!("Total resources: {}", summary.resource_count);
    info!("Untagged: {}", summary.untagged_count);
    if cli.write {
        info!(
            "Tags written: {}, skipped by dry run: {}",
            summary.tags_written, summary.writes_skipped
        );
    }

    Ok(())
}
