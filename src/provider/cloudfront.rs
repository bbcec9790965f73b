use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_cloudfront::types::{Tag, Tags as TagSet};
use tracing::debug;

use super::{into_sorted_resources, Error, Resource, Service, TagProvider, Tags};

/// CloudFront distributions, identified by distribution ARN.
pub struct Distributions {
    client: aws_sdk_cloudfront::Client,
}

impl Distributions {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        let client = aws_sdk_cloudfront::Client::new(sdk_config);
        return Self { client };
    }
}

#[async_trait]
impl TagProvider for Distributions {
    async fn list_resources(&self) -> Result<Vec<Resource>, Error> {
        let mut arns = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let result = self
                .client
                .list_distributions()
                .set_marker(marker.take())
                .send()
                .await?;

            let distribution_list = match result.distribution_list {
                Some(list) => list,
                None => break,
            };

            let items = distribution_list.items.unwrap_or_default();
            debug!("Loaded a page of {} distributions", items.len());
            let last_id = items.last().map(|summary| summary.id.clone());
            arns.extend(items.into_iter().map(|summary| Some(summary.arn)));

            if !distribution_list.is_truncated {
                break;
            }
            // Some responses are truncated without a NextMarker.
            marker = distribution_list.next_marker.or(last_id);
            if marker.is_none() {
                break;
            }
        }

        Ok(into_sorted_resources(Service::CloudFront, arns))
    }

    async fn get_tags(&self, tagger_id: &str) -> Result<Tags, Error> {
        let result = self
            .client
            .list_tags_for_resource()
            .resource(tagger_id)
            .send()
            .await?;

        Ok(flatten(result.tags))
    }

    async fn write_tags(&self, tagger_id: &str, tags: &Tags) -> Result<(), Error> {
        self.client
            .tag_resource()
            .resource(tagger_id)
            .tags(to_tag_set(tags)?)
            .send()
            .await?;

        Ok(())
    }
}

fn flatten(tag_set: Option<TagSet>) -> Tags {
    tag_set
        .and_then(|set| set.items)
        .unwrap_or_default()
        .into_iter()
        .map(|tag| (tag.key, tag.value.unwrap_or_default()))
        .collect()
}

fn to_tag_set(tags: &Tags) -> Result<TagSet, Error> {
    let items = tags
        .iter()
        .map(|(key, value)| {
            Tag::builder()
                .key(key)
                .value(value)
                .build()
                .map_err(|error| Error::InvalidTag(error.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TagSet::builder().set_items(Some(items)).build())
}
