use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fs, io, path::Path};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("File {0} not found")]
    FileNotFound(String),

    #[error("Parsing error: {0}")]
    ParsingError(String),

    #[error("{0} is missing from the yaml file. Please add it to the file or omit the tag")]
    MissingTag(String),

    #[error("Unknown error occurred: {0}")]
    Unknown(String),
}

/// Tag value -> substrings that select it when found in a resource identifier.
pub type TagValues = BTreeMap<String, Vec<String>>;

/// Contents of the tag mapping file.
///
/// ```yaml
/// env:
///   prod: [prod, live]
///   dev: [dev]
/// owner:
/// ```
///
/// A tag with a null or empty body is known but has nothing to write.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagConfig {
    tags: BTreeMap<String, Option<TagValues>>,
}

impl TagConfig {
    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains_key(tag)
    }

    /// Returns the value table for `tag`, or `None` when it is absent or empty.
    pub fn values(&self, tag: &str) -> Option<&TagValues> {
        self.tags
            .get(tag)
            .and_then(Option::as_ref)
            .filter(|values| !values.is_empty())
    }

    pub fn ensure_tags_present(&self, tags: &[String]) -> Result<(), Error> {
        match tags.iter().find(|tag| !self.contains(tag)) {
            Some(missing) => Err(Error::MissingTag(missing.clone())),
            None => Ok(()),
        }
    }
}

impl FromIterator<(String, Option<TagValues>)> for TagConfig {
    fn from_iter<I: IntoIterator<Item = (String, Option<TagValues>)>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().collect(),
        }
    }
}

pub fn parse(path: &Path) -> Result<TagConfig, Error> {
    let contents = match fs::read_to_string(path) {
        Ok(raw_contents) => Ok(raw_contents),
        Err(error) => match error.kind() {
            io::ErrorKind::NotFound => Err(Error::FileNotFound(path.display().to_string())),
            _ => Err(Error::Unknown(error.to_string())),
        },
    }?;

    // An empty file deserializes to unit, not to a mapping.
    if contents.trim().is_empty() {
        return Ok(TagConfig::default());
    }

    let config: TagConfig = match serde_yaml::from_str(&contents) {
        Ok(data) => Ok(data),
        Err(error) => Err(Error::ParsingError(error.to_string())),
    }?;

    return Ok(config);
}

/// Splits the comma separated tag argument into a sorted, deduplicated list.
pub fn parse_tag_list(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect();
    tags.sort();
    tags.dedup();
    tags
}
