use super::required_id;
use crate::{
    client::BaseClient,
    error::SdsResult,
    models::SdsStream,
};
use log::{debug, info};
use reqwest::Method;
use std::collections::HashMap;

/// Stream API operations
pub struct StreamApi<'a> {
    client: &'a BaseClient,
}

impl<'a> StreamApi<'a> {
    pub fn new(client: &'a BaseClient) -> Self {
        Self { client }
    }

    fn stream_path(stream_id: &str) -> String {
        format!("Streams/{}", urlencoding::encode(stream_id))
    }

    /// Create a stream, or return the existing one with the same id
    ///
    /// # Arguments
    /// * `namespace_id` - Namespace holding the stream
    /// * `stream` - Stream definition; its `Id` names the resource
    pub async fn get_or_create_stream(
        &self,
        namespace_id: &str,
        stream: &SdsStream,
    ) -> SdsResult<SdsStream> {
        let stream_id = required_id(&stream.id, "Stream")?;
        info!("Getting or creating stream: {}", stream_id);
        let url = self.client.namespace_url(namespace_id, &Self::stream_path(stream_id))?;
        let req = self.client.request(Method::POST, url).await?.json(stream);

        self.client.execute(req).await
    }

    /// Create a stream or replace its definition
    pub async fn create_or_update_stream(
        &self,
        namespace_id: &str,
        stream: &SdsStream,
    ) -> SdsResult<()> {
        let stream_id = required_id(&stream.id, "Stream")?;
        info!("Creating or updating stream: {}", stream_id);
        let url = self.client.namespace_url(namespace_id, &Self::stream_path(stream_id))?;
        let req = self.client.request(Method::PUT, url).await?.json(stream);

        self.client.execute_empty(req).await
    }

    pub async fn get_stream(&self, namespace_id: &str, stream_id: &str) -> SdsResult<SdsStream> {
        info!("Getting stream: {}", stream_id);
        let url = self.client.namespace_url(namespace_id, &Self::stream_path(stream_id))?;
        let req = self.client.request(Method::GET, url).await?;

        self.client.execute(req).await
    }

    /// List streams, optionally filtered by a search query
    pub async fn get_streams(
        &self,
        namespace_id: &str,
        query: Option<&str>,
        skip: Option<u32>,
        count: Option<u32>,
    ) -> SdsResult<Vec<SdsStream>> {
        info!("Listing streams in namespace: {}", namespace_id);
        let url = self.client.namespace_url(namespace_id, "Streams")?;
        let req = self.client.request(Method::GET, url).await?;
        let req = BaseClient::with_paging(req, query, skip, count);

        self.client.execute(req).await
    }

    pub async fn delete_stream(&self, namespace_id: &str, stream_id: &str) -> SdsResult<()> {
        info!("Deleting stream: {}", stream_id);
        let url = self.client.namespace_url(namespace_id, &Self::stream_path(stream_id))?;
        let req = self.client.request(Method::DELETE, url).await?;

        self.client.execute_empty(req).await
    }

    /// Change a stream's type to the target type of a stream view, converting
    /// stored events through that view.
    pub async fn update_stream_type(
        &self,
        namespace_id: &str,
        stream_id: &str,
        stream_view_id: &str,
    ) -> SdsResult<()> {
        info!("Updating type of stream {} via view {}", stream_id, stream_view_id);
        let path = format!("{}/Type", Self::stream_path(stream_id));
        let url = self.client.namespace_url(namespace_id, &path)?;
        let req = self
            .client
            .request(Method::PUT, url)
            .await?
            .query(&[("streamViewId", stream_view_id)]);

        self.client.execute_empty(req).await
    }

    /// Replace the tags of a stream
    pub async fn update_tags(
        &self,
        namespace_id: &str,
        stream_id: &str,
        tags: &[String],
    ) -> SdsResult<()> {
        info!("Updating tags of stream: {}", stream_id);
        debug!("Tags: {:?}", tags);
        let path = format!("{}/Tags", Self::stream_path(stream_id));
        let url = self.client.namespace_url(namespace_id, &path)?;
        let req = self.client.request(Method::PUT, url).await?.json(tags);

        self.client.execute_empty(req).await
    }

    pub async fn get_tags(&self, namespace_id: &str, stream_id: &str) -> SdsResult<Vec<String>> {
        info!("Getting tags of stream: {}", stream_id);
        let path = format!("{}/Tags", Self::stream_path(stream_id));
        let url = self.client.namespace_url(namespace_id, &path)?;
        let req = self.client.request(Method::GET, url).await?;

        self.client.execute(req).await
    }

    /// Replace the metadata of a stream
    pub async fn update_metadata(
        &self,
        namespace_id: &str,
        stream_id: &str,
        metadata: &HashMap<String, String>,
    ) -> SdsResult<()> {
        info!("Updating metadata of stream: {}", stream_id);
        debug!("Metadata: {:?}", metadata);
        let path = format!("{}/Metadata", Self::stream_path(stream_id));
        let url = self.client.namespace_url(namespace_id, &path)?;
        let req = self.client.request(Method::PUT, url).await?.json(metadata);

        self.client.execute_empty(req).await
    }

    /// Get one metadata value of a stream
    pub async fn get_metadata_value(
        &self,
        namespace_id: &str,
        stream_id: &str,
        key: &str,
    ) -> SdsResult<String> {
        info!("Getting metadata {} of stream: {}", key, stream_id);
        let path = format!(
            "{}/Metadata/{}",
            Self::stream_path(stream_id),
            urlencoding::encode(key)
        );
        let url = self.client.namespace_url(namespace_id, &path)?;
        let req = self.client.request(Method::GET, url).await?;

        self.client.execute(req).await
    }
}
