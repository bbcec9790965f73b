use tracing::{debug, info};

use crate::config::TagConfig;

/// Picks the value of `target_tag` for the resource identified by `tagger_id`.
///
/// Values are tried in ascending order and the first one with a substring
/// contained in `tagger_id` wins, so overlapping patterns always resolve the
/// same way.
pub fn resolve(tagger_id: &str, target_tag: &str, config: &TagConfig) -> Option<String> {
    let values = match config.values(target_tag) {
        Some(values) => values,
        None => {
            info!("Tag {} has no values in the yaml file.", target_tag);
            return None;
        }
    };

    let resolved = values.iter().find_map(|(tag_value, parts)| {
        parts
            .iter()
            .find(|part| tagger_id.contains(part.as_str()))
            .map(|part| {
                debug!("'{}' matched {} for tag {}", part, tagger_id, target_tag);
                tag_value.clone()
            })
    });

    if resolved.is_none() {
        debug!("No pattern for tag {} matched {}", target_tag, tagger_id);
    }

    resolved
}
