use async_trait::async_trait;
use aws_config::SdkConfig;
use tracing::debug;

use super::{into_sorted_resources, Error, Resource, Service, TagProvider, Tags};

/// CloudWatch log groups, identified by log group name.
///
/// The name based tag calls are deprecated in favour of the ARN based ones,
/// but the name is what the tags are keyed on here.
pub struct LogGroups {
    client: aws_sdk_cloudwatchlogs::Client,
}

impl LogGroups {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        let client = aws_sdk_cloudwatchlogs::Client::new(sdk_config);
        return Self { client };
    }
}

#[async_trait]
impl TagProvider for LogGroups {
    async fn list_resources(&self) -> Result<Vec<Resource>, Error> {
        let mut paginator = self.client.describe_log_groups().into_paginator().send();

        let mut names = Vec::new();
        while let Some(page) = paginator.next().await {
            let log_groups = page?.log_groups.unwrap_or_default();
            debug!("Loaded a page of {} log groups", log_groups.len());
            names.extend(log_groups.into_iter().map(|group| group.log_group_name));
        }

        Ok(into_sorted_resources(Service::CloudWatchLogs, names))
    }

    #[allow(deprecated)]
    async fn get_tags(&self, tagger_id: &str) -> Result<Tags, Error> {
        let result = self
            .client
            .list_tags_log_group()
            .log_group_name(tagger_id)
            .send()
            .await?;

        Ok(result.tags.unwrap_or_default().into_iter().collect())
    }

    #[allow(deprecated)]
    async fn write_tags(&self, tagger_id: &str, tags: &Tags) -> Result<(), Error> {
        self.client
            .tag_log_group()
            .log_group_name(tagger_id)
            .set_tags(Some(tags.clone().into_iter().collect()))
            .send()
            .await?;

        Ok(())
    }
}
