use super::required_id;
use crate::{
    client::BaseClient,
    error::SdsResult,
    models::SdsType,
};
use log::info;
use reqwest::Method;

/// Type API operations
pub struct TypeApi<'a> {
    client: &'a BaseClient,
}

impl<'a> TypeApi<'a> {
    pub fn new(client: &'a BaseClient) -> Self {
        Self { client }
    }

    fn type_path(type_id: &str) -> String {
        format!("Types/{}", urlencoding::encode(type_id))
    }

    /// Create a type, or return the existing one with the same id
    ///
    /// # Arguments
    /// * `namespace_id` - Namespace holding the type
    /// * `sds_type` - Type definition; its `Id` names the resource
    pub async fn get_or_create_type(
        &self,
        namespace_id: &str,
        sds_type: &SdsType,
    ) -> SdsResult<SdsType> {
        let type_id = required_id(&sds_type.id, "Type")?;
        info!("Getting or creating type: {}", type_id);
        let url = self.client.namespace_url(namespace_id, &Self::type_path(type_id))?;
        let req = self.client.request(Method::POST, url).await?.json(sds_type);

        self.client.execute(req).await
    }

    /// Get a type by id
    pub async fn get_type(&self, namespace_id: &str, type_id: &str) -> SdsResult<SdsType> {
        info!("Getting type: {}", type_id);
        let url = self.client.namespace_url(namespace_id, &Self::type_path(type_id))?;
        let req = self.client.request(Method::GET, url).await?;

        self.client.execute(req).await
    }

    /// List types, optionally filtered by a search query
    pub async fn get_types(
        &self,
        namespace_id: &str,
        query: Option<&str>,
        skip: Option<u32>,
        count: Option<u32>,
    ) -> SdsResult<Vec<SdsType>> {
        info!("Listing types in namespace: {}", namespace_id);
        let url = self.client.namespace_url(namespace_id, "Types")?;
        let req = self.client.request(Method::GET, url).await?;
        let req = BaseClient::with_paging(req, query, skip, count);

        self.client.execute(req).await
    }

    /// Delete a type
    pub async fn delete_type(&self, namespace_id: &str, type_id: &str) -> SdsResult<()> {
        info!("Deleting type: {}", type_id);
        let url = self.client.namespace_url(namespace_id, &Self::type_path(type_id))?;
        let req = self.client.request(Method::DELETE, url).await?;

        self.client.execute_empty(req).await
    }
}
