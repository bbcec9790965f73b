use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_smithy_runtime_api::client::result::SdkError;
use aws_smithy_types::error::display::DisplayErrorContext;
use aws_types::region::Region;

pub mod cloudfront;
pub mod lambda;
pub mod logs;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("Service error ocurred: {0}.")]
    ServiceError(String),

    #[error("Unknown error ocurred: {0}.")]
    UnknownError(String),

    #[error("Tag could not be built: {0}.")]
    InvalidTag(String),
}

impl<E, R> From<SdkError<E, R>> for Error
where
    E: std::error::Error + 'static,
    R: fmt::Debug,
{
    fn from(error: SdkError<E, R>) -> Self {
        match error {
            SdkError::ServiceError(context) => Error::ServiceError(context.into_err().to_string()),
            other => Error::UnknownError(DisplayErrorContext(&other).to_string()),
        }
    }
}

/// Flat tag set, whatever shape the service returns it in.
pub type Tags = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Resource {
    /// ARN or name; the same value is used to read and to write tags.
    pub tagger_id: String,
}

impl Resource {
    pub fn new(tagger_id: impl Into<String>) -> Self {
        Self {
            tagger_id: tagger_id.into(),
        }
    }
}

#[async_trait]
pub trait TagProvider: Send + Sync {
    /// Every resource of the service, sorted by `tagger_id`.
    async fn list_resources(&self) -> Result<Vec<Resource>, Error>;

    async fn get_tags(&self, tagger_id: &str) -> Result<Tags, Error>;

    async fn write_tags(&self, tagger_id: &str, tags: &Tags) -> Result<(), Error>;
}

#[derive(thiserror::Error, Debug, PartialEq)]
#[error("Service {0} is not yet supported. Use one of: lambda, cloudwatchlogs, cloudfront")]
pub struct UnsupportedService(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Lambda,
    CloudWatchLogs,
    CloudFront,
}

impl FromStr for Service {
    type Err = UnsupportedService;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "lambda" => Ok(Service::Lambda),
            "cloudwatchlogs" => Ok(Service::CloudWatchLogs),
            "cloudfront" => Ok(Service::CloudFront),
            other => Err(UnsupportedService(other.to_string())),
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Service::Lambda => "lambda",
            Service::CloudWatchLogs => "cloudwatchlogs",
            Service::CloudFront => "cloudfront",
        };
        f.write_str(name)
    }
}

pub async fn sdk_config(region: &str) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .load()
        .await
}

pub fn for_service(service: Service, sdk_config: &SdkConfig) -> Box<dyn TagProvider> {
    match service {
        Service::Lambda => Box::new(lambda::Functions::new(sdk_config)),
        Service::CloudWatchLogs => Box::new(logs::LogGroups::new(sdk_config)),
        Service::CloudFront => Box::new(cloudfront::Distributions::new(sdk_config)),
    }
}

/// Drops resources without an identifier and sorts the rest.
pub(crate) fn into_sorted_resources<I>(service: Service, ids: I) -> Vec<Resource>
where
    I: IntoIterator<Item = Option<String>>,
{
    let mut resources: Vec<Resource> = ids
        .into_iter()
        .filter_map(|id| {
            if id.is_none() {
                tracing::warn!("Skipping {} resource without an identifier", service);
            }
            id.map(Resource::new)
        })
        .collect();
    resources.sort();
    resources
}
