use async_trait::async_trait;
use aws_config::SdkConfig;
use tracing::debug;

use super::{into_sorted_resources, Error, Resource, Service, TagProvider, Tags};

/// Lambda functions, identified by their function ARN.
pub struct Functions {
    client: aws_sdk_lambda::Client,
}

impl Functions {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        let client = aws_sdk_lambda::Client::new(sdk_config);
        return Self { client };
    }
}

#[async_trait]
impl TagProvider for Functions {
    async fn list_resources(&self) -> Result<Vec<Resource>, Error> {
        let mut paginator = self.client.list_functions().into_paginator().send();

        let mut arns = Vec::new();
        while let Some(page) = paginator.next().await {
            let functions = page?.functions.unwrap_or_default();
            debug!("Loaded a page of {} functions", functions.len());
            arns.extend(functions.into_iter().map(|function| function.function_arn));
        }

        Ok(into_sorted_resources(Service::Lambda, arns))
    }

    async fn get_tags(&self, tagger_id: &str) -> Result<Tags, Error> {
        let result = self.client.list_tags().resource(tagger_id).send().await?;

        Ok(result.tags.unwrap_or_default().into_iter().collect())
    }

    async fn write_tags(&self, tagger_id: &str, tags: &Tags) -> Result<(), Error> {
        self.client
            .tag_resource()
            .resource(tagger_id)
            .set_tags(Some(tags.clone().into_iter().collect()))
            .send()
            .await?;

        Ok(())
    }
}
