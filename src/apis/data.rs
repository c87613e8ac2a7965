use crate::{
    client::BaseClient,
    error::SdsResult,
    models::SdsBoundaryType,
};
use log::{debug, info};
use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};

/// Stream data API operations.
///
/// Events are caller-defined types whose JSON shape matches the stream's
/// SDS type. Index values are passed as strings, in the form the service
/// accepts for the stream's index (numbers, timestamps, ...).
pub struct DataApi<'a> {
    client: &'a BaseClient,
}

impl<'a> DataApi<'a> {
    pub fn new(client: &'a BaseClient) -> Self {
        Self { client }
    }

    fn data_path(stream_id: &str, suffix: &str) -> String {
        format!("Streams/{}/Data{}", urlencoding::encode(stream_id), suffix)
    }

    /// Insert events; fails if an event already exists at one of the indexes
    pub async fn insert_values<T: Serialize>(
        &self,
        namespace_id: &str,
        stream_id: &str,
        events: &[T],
    ) -> SdsResult<()> {
        info!("Inserting {} events into stream: {}", events.len(), stream_id);
        let url = self.client.namespace_url(namespace_id, &Self::data_path(stream_id, ""))?;
        let req = self.client.request(Method::POST, url).await?.json(events);

        self.client.execute_empty(req).await
    }

    /// Write events, creating or overwriting them
    pub async fn update_values<T: Serialize>(
        &self,
        namespace_id: &str,
        stream_id: &str,
        events: &[T],
    ) -> SdsResult<()> {
        info!("Updating {} events in stream: {}", events.len(), stream_id);
        let url = self.client.namespace_url(namespace_id, &Self::data_path(stream_id, ""))?;
        let req = self.client.request(Method::PUT, url).await?.json(events);

        self.client.execute_empty(req).await
    }

    /// Overwrite existing events; fails if an index holds no event
    pub async fn replace_values<T: Serialize>(
        &self,
        namespace_id: &str,
        stream_id: &str,
        events: &[T],
    ) -> SdsResult<()> {
        info!("Replacing {} events in stream: {}", events.len(), stream_id);
        let url = self.client.namespace_url(namespace_id, &Self::data_path(stream_id, ""))?;
        let req = self
            .client
            .request(Method::PUT, url)
            .await?
            .query(&[("allowCreate", "false")])
            .json(events);

        self.client.execute_empty(req).await
    }

    pub async fn get_first_value<T: DeserializeOwned>(
        &self,
        namespace_id: &str,
        stream_id: &str,
    ) -> SdsResult<Option<T>> {
        info!("Getting first event of stream: {}", stream_id);
        let url = self
            .client
            .namespace_url(namespace_id, &Self::data_path(stream_id, "/First"))?;
        let req = self.client.request(Method::GET, url).await?;

        self.client.execute(req).await
    }

    pub async fn get_last_value<T: DeserializeOwned>(
        &self,
        namespace_id: &str,
        stream_id: &str,
    ) -> SdsResult<Option<T>> {
        info!("Getting last event of stream: {}", stream_id);
        let url = self
            .client
            .namespace_url(namespace_id, &Self::data_path(stream_id, "/Last"))?;
        let req = self.client.request(Method::GET, url).await?;

        self.client.execute(req).await
    }

    /// Stored events between two indexes, inclusive
    pub async fn get_window_values<T: DeserializeOwned>(
        &self,
        namespace_id: &str,
        stream_id: &str,
        start: &str,
        end: &str,
    ) -> SdsResult<Vec<T>> {
        info!("Getting events {}..{} of stream: {}", start, end, stream_id);
        let url = self.client.namespace_url(namespace_id, &Self::data_path(stream_id, ""))?;
        let req = self
            .client
            .request(Method::GET, url)
            .await?
            .query(&[("startIndex", start), ("endIndex", end)]);

        self.client.execute(req).await
    }

    /// Events between two indexes that match a filter expression,
    /// e.g. `Radians lt 50`
    pub async fn get_window_filtered_values<T: DeserializeOwned>(
        &self,
        namespace_id: &str,
        stream_id: &str,
        start: &str,
        end: &str,
        boundary_type: SdsBoundaryType,
        filter: &str,
    ) -> SdsResult<Vec<T>> {
        info!("Getting filtered events {}..{} of stream: {}", start, end, stream_id);
        debug!("Filter: {}", filter);
        let url = self.client.namespace_url(namespace_id, &Self::data_path(stream_id, ""))?;
        let boundary = boundary_type.value().to_string();
        let req = self.client.request(Method::GET, url).await?.query(&[
            ("startIndex", start),
            ("endIndex", end),
            ("boundaryType", boundary.as_str()),
            ("filter", filter),
        ]);

        self.client.execute(req).await
    }

    /// `count` events starting at `start`, optionally read through a stream view
    ///
    /// # Arguments
    /// * `skip` - Events to skip after `start`
    /// * `reversed` - Walk the index backwards from `start`
    /// * `boundary_type` - Whether a value is calculated at `start` when none is stored
    /// * `stream_view_id` - Stream view to map events through
    #[allow(clippy::too_many_arguments)]
    pub async fn get_range_values<T: DeserializeOwned>(
        &self,
        namespace_id: &str,
        stream_id: &str,
        start: &str,
        skip: u32,
        count: u32,
        reversed: bool,
        boundary_type: SdsBoundaryType,
        stream_view_id: Option<&str>,
    ) -> SdsResult<Vec<T>> {
        info!("Getting {} events from {} of stream: {}", count, start, stream_id);
        let url = self
            .client
            .namespace_url(namespace_id, &Self::data_path(stream_id, "/Transform"))?;
        let mut req = self.client.request(Method::GET, url).await?.query(&[
            ("startIndex", start.to_string()),
            ("skip", skip.to_string()),
            ("count", count.to_string()),
            ("reversed", reversed.to_string()),
            ("boundaryType", boundary_type.value().to_string()),
        ]);

        if let Some(view) = stream_view_id {
            req = req.query(&[("streamViewId", view)]);
        }

        self.client.execute(req).await
    }

    /// Delete the event at an index
    pub async fn remove_value(&self, namespace_id: &str, stream_id: &str, index: &str) -> SdsResult<()> {
        info!("Removing event {} from stream: {}", index, stream_id);
        let url = self.client.namespace_url(namespace_id, &Self::data_path(stream_id, ""))?;
        let req = self
            .client
            .request(Method::DELETE, url)
            .await?
            .query(&[("index", index)]);

        self.client.execute_empty(req).await
    }

    /// Delete all events between two indexes, inclusive
    pub async fn remove_window_values(
        &self,
        namespace_id: &str,
        stream_id: &str,
        start: &str,
        end: &str,
    ) -> SdsResult<()> {
        info!("Removing events {}..{} from stream: {}", start, end, stream_id);
        let url = self.client.namespace_url(namespace_id, &Self::data_path(stream_id, ""))?;
        let req = self
            .client
            .request(Method::DELETE, url)
            .await?
            .query(&[("startIndex", start), ("endIndex", end)]);

        self.client.execute_empty(req).await
    }
}
