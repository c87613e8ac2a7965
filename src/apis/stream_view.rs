use super::required_id;
use crate::{
    client::BaseClient,
    error::SdsResult,
    models::{SdsStreamView, SdsStreamViewMap},
};
use log::{debug, info};
use reqwest::Method;

/// Stream view API operations
pub struct StreamViewApi<'a> {
    client: &'a BaseClient,
}

impl<'a> StreamViewApi<'a> {
    pub fn new(client: &'a BaseClient) -> Self {
        Self { client }
    }

    fn view_path(stream_view_id: &str) -> String {
        format!("StreamViews/{}", urlencoding::encode(stream_view_id))
    }

    /// Create a stream view, or return the existing one with the same id
    pub async fn get_or_create_stream_view(
        &self,
        namespace_id: &str,
        stream_view: &SdsStreamView,
    ) -> SdsResult<SdsStreamView> {
        let view_id = required_id(&stream_view.id, "Stream view")?;
        info!("Getting or creating stream view: {}", view_id);
        let url = self.client.namespace_url(namespace_id, &Self::view_path(view_id))?;
        let req = self.client.request(Method::POST, url).await?.json(stream_view);

        self.client.execute(req).await
    }

    /// Create a stream view or replace its definition
    pub async fn create_or_update_stream_view(
        &self,
        namespace_id: &str,
        stream_view: &SdsStreamView,
    ) -> SdsResult<()> {
        let view_id = required_id(&stream_view.id, "Stream view")?;
        info!("Creating or updating stream view: {}", view_id);
        let url = self.client.namespace_url(namespace_id, &Self::view_path(view_id))?;
        let req = self.client.request(Method::PUT, url).await?.json(stream_view);

        self.client.execute_empty(req).await
    }

    pub async fn get_stream_view(
        &self,
        namespace_id: &str,
        stream_view_id: &str,
    ) -> SdsResult<SdsStreamView> {
        info!("Getting stream view: {}", stream_view_id);
        let url = self
            .client
            .namespace_url(namespace_id, &Self::view_path(stream_view_id))?;
        let req = self.client.request(Method::GET, url).await?;

        self.client.execute(req).await
    }

    /// Get the mapping the service resolved for a stream view, including
    /// source properties with no target.
    pub async fn get_stream_view_map(
        &self,
        namespace_id: &str,
        stream_view_id: &str,
    ) -> SdsResult<SdsStreamViewMap> {
        info!("Getting stream view map: {}", stream_view_id);
        let path = format!("{}/Map", Self::view_path(stream_view_id));
        let url = self.client.namespace_url(namespace_id, &path)?;
        let req = self.client.request(Method::GET, url).await?;

        let map: SdsStreamViewMap = self.client.execute(req).await?;
        debug!(
            "Stream view map has {} properties",
            map.properties().map_or(0, |p| p.len())
        );
        Ok(map)
    }

    pub async fn delete_stream_view(&self, namespace_id: &str, stream_view_id: &str) -> SdsResult<()> {
        info!("Deleting stream view: {}", stream_view_id);
        let url = self
            .client
            .namespace_url(namespace_id, &Self::view_path(stream_view_id))?;
        let req = self.client.request(Method::DELETE, url).await?;

        self.client.execute_empty(req).await
    }
}
