use tracing::{info, warn};

use crate::config::{self, TagConfig};
use crate::provider::{self, TagProvider, Tags};
use crate::resolver::resolve;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("A tag config file is required when writing tags")]
    MissingConfig,

    #[error("{0} is missing from the yaml file. Please add it to the file or omit the tag")]
    MissingConfigTag(String),

    #[error(transparent)]
    Config(config::Error),

    #[error(transparent)]
    Provider(#[from] provider::Error),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub write: bool,
    pub dry_run: bool,
    pub overwrite: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub resource_count: usize,
    /// (resource, tag) pairs still missing the tag once the run is over.
    pub untagged_count: usize,
    pub tags_written: usize,
    /// Tags that resolved but were not written because of `--dry-run`.
    pub writes_skipped: usize,
}

/// Walks every resource of `provider` and fills in `target_tags`.
///
/// `target_tags` is expected sorted. When writing, every target tag must be
/// known to `config`; that is checked before the provider is called at all.
/// All tags resolved for one resource go out in a single write.
pub async fn run(
    provider: &dyn TagProvider,
    target_tags: &[String],
    config: Option<&TagConfig>,
    options: Options,
) -> Result<Summary, Error> {
    let config = match (options.write, config) {
        (true, None) => return Err(Error::MissingConfig),
        (true, Some(config)) => {
            match config.ensure_tags_present(target_tags) {
                Ok(()) => Some(config),
                Err(config::Error::MissingTag(tag)) => return Err(Error::MissingConfigTag(tag)),
                Err(other) => return Err(Error::Config(other)),
            }
        }
        (false, _) => None,
    };

    let resources = provider.list_resources().await?;
    let mut summary = Summary {
        resource_count: resources.len(),
        ..Summary::default()
    };

    for resource in &resources {
        let tagger_id = resource.tagger_id.as_str();
        info!("-----");
        info!("Loading tags for {}", tagger_id);
        let existing = provider.get_tags(tagger_id).await?;
        info!("Found {} tags: {:?}", existing.len(), existing);

        let mut new_tags = Tags::new();
        for target_tag in target_tags {
            info!("Processing tag '{}'.", target_tag);
            let present = existing.contains_key(target_tag);
            if present && !options.overwrite {
                info!("{} already has the tag {}.", tagger_id, target_tag);
                continue;
            }
            if !present {
                info!("{} is missing tag '{}'", tagger_id, target_tag);
            }

            let config = match config {
                Some(config) => config,
                None => {
                    info!("Write is disabled. Tags are not updated. Use --write to activate it. Use --write AND --dry-run for a dry run.");
                    if !present {
                        summary.untagged_count += 1;
                    }
                    continue;
                }
            };

            match resolve(tagger_id, target_tag, config) {
                Some(value) => {
                    new_tags.insert(target_tag.clone(), value);
                }
                None => {
                    info!("No new value for tag '{}' on {}", target_tag, tagger_id);
                    if !present {
                        summary.untagged_count += 1;
                    }
                }
            }
        }

        if new_tags.is_empty() {
            continue;
        }
        if options.dry_run {
            info!("Dry run, would add tags to {}: {:?}", tagger_id, new_tags);
            summary.writes_skipped += new_tags.len();
            continue;
        }

        info!("Adding tags to {}: {:?}", tagger_id, new_tags);
        if let Err(error) = provider.write_tags(tagger_id, &new_tags).await {
            warn!("Failed to write tags to {}", tagger_id);
            return Err(error.into());
        }
        summary.tags_written += new_tags.len();
    }

    info!("-----");
    info!(
        "Processed {} resources, {} tags left untagged",
        summary.resource_count, summary.untagged_count
    );

    Ok(summary)
}
