use crate::{
    apis::{DataApi, StreamApi, StreamViewApi, TypeApi},
    auth::{Authentication, ClientCredentials},
    config::SdsConfig,
    error::{SdsError, SdsResult},
    models::SdsErrorResponse,
};
use log::debug;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use url::Url;

const ACCEPT_VERBOSITY: &str = "accept-verbosity";

/// Base SDS client: owns the HTTP client, the authentication and the
/// service coordinates every API group builds its URLs from.
#[derive(Clone)]
pub struct BaseClient {
    client: Client,
    url: String,
    uri_api: String,
    api_version: String,
    tenant: String,
    accept_verbosity: bool,
    auth: Arc<dyn Authentication>,
}

impl BaseClient {
    /// Create a client authenticated with OAuth2 client credentials.
    ///
    /// A token is acquired before this returns, so bad credentials or an
    /// unreachable identity service fail here rather than on first use.
    pub async fn new(
        api_version: impl Into<String>,
        tenant: impl Into<String>,
        url: impl AsRef<str>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        accept_verbosity: bool,
    ) -> SdsResult<Self> {
        let client = Self::default_http_client()?;
        let credentials =
            ClientCredentials::new(client.clone(), url.as_ref(), client_id, client_secret);
        credentials.token().await?;

        let mut base = Self::with_auth(client, api_version, tenant, url, credentials)?;
        base.accept_verbosity = accept_verbosity;
        Ok(base)
    }

    /// Create a client from loaded settings
    pub async fn from_config(config: &SdsConfig) -> SdsResult<Self> {
        Self::new(
            config.api_version.as_str(),
            config.tenant_id.as_str(),
            &config.resource,
            config.client_id.as_str(),
            config.client_key.as_str(),
            config.accept_verbosity,
        )
        .await
    }

    /// Create a client with custom reqwest client and authentication.
    /// No network calls are made.
    pub fn with_auth(
        client: Client,
        api_version: impl Into<String>,
        tenant: impl Into<String>,
        url: impl AsRef<str>,
        auth: impl Authentication + 'static,
    ) -> SdsResult<Self> {
        let url = url.as_ref().trim_end_matches('/').to_string();
        Url::parse(&url)?;
        let api_version = api_version.into();
        let uri_api = format!("{}/api/{}", url, api_version);

        Ok(Self {
            client,
            url,
            uri_api,
            api_version,
            tenant: tenant.into(),
            accept_verbosity: false,
            auth: Arc::new(auth),
        })
    }

    fn default_http_client() -> SdsResult<Client> {
        Ok(Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?)
    }

    /// Base service URL
    pub fn uri(&self) -> &str {
        &self.url
    }

    /// Base URL plus API version, `{url}/api/{version}`
    pub fn uri_api(&self) -> &str {
        &self.uri_api
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    pub fn accept_verbosity(&self) -> bool {
        self.accept_verbosity
    }

    pub fn set_accept_verbosity(&mut self, accept_verbosity: bool) {
        self.accept_verbosity = accept_verbosity;
    }

    /// Get Type API
    pub fn types(&self) -> TypeApi<'_> {
        TypeApi::new(self)
    }

    /// Get Stream API
    pub fn streams(&self) -> StreamApi<'_> {
        StreamApi::new(self)
    }

    /// Get Stream View API
    pub fn stream_views(&self) -> StreamViewApi<'_> {
        StreamViewApi::new(self)
    }

    /// Get Data API
    pub fn data(&self) -> DataApi<'_> {
        DataApi::new(self)
    }

    /// Headers every SDS call carries: bearer token, JSON content type and
    /// accept, and `Accept-Verbosity: verbose` when verbosity is on.
    pub async fn sds_headers(&self) -> SdsResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        self.auth.apply_auth(&mut headers).await?;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if self.accept_verbosity {
            headers.insert(
                HeaderName::from_static(ACCEPT_VERBOSITY),
                HeaderValue::from_static("verbose"),
            );
        }

        Ok(headers)
    }

    /// URL of a resource inside a namespace of this client's tenant
    pub fn namespace_url(&self, namespace_id: &str, path: &str) -> SdsResult<Url> {
        let url = format!(
            "{}/Tenants/{}/Namespaces/{}/{}",
            self.uri_api,
            urlencoding::encode(&self.tenant),
            urlencoding::encode(namespace_id),
            path.trim_start_matches('/')
        );
        Ok(Url::parse(&url)?)
    }

    /// Build a request to the given URL with SDS headers
    pub async fn request(&self, method: reqwest::Method, url: Url) -> SdsResult<RequestBuilder> {
        debug!("HTTP {} {}", method, url);
        let headers = self.sds_headers().await?;
        Ok(self.client.request(method, url).headers(headers))
    }

    /// Execute a request and deserialize the JSON response
    pub async fn execute<T>(&self, request: RequestBuilder) -> SdsResult<T>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(response.json::<T>().await?)
        } else {
            Self::handle_error_response(status, response).await
        }
    }

    /// Execute a request whose success response carries no body of interest
    pub async fn execute_empty(&self, request: RequestBuilder) -> SdsResult<()> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else {
            Self::handle_error_response(status, response).await
        }
    }

    /// Handle error responses
    async fn handle_error_response<T>(status: StatusCode, response: Response) -> SdsResult<T> {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<SdsErrorResponse>(&body)
            .ok()
            .and_then(|error| error.summary())
            .unwrap_or(body);
        debug!("SDS responded {}: {}", status, message);

        match status {
            StatusCode::UNAUTHORIZED => Err(SdsError::auth_error(message)),
            StatusCode::FORBIDDEN => Err(SdsError::PermissionDenied(message)),
            StatusCode::NOT_FOUND => Err(SdsError::ObjectNotFound(message)),
            StatusCode::BAD_REQUEST => Err(SdsError::invalid_param(message)),
            _ => Err(SdsError::service_error(status.as_u16(), message)),
        }
    }

    /// Add query, skip and count parameters to a listing request
    pub fn with_paging(
        request: RequestBuilder,
        query: Option<&str>,
        skip: Option<u32>,
        count: Option<u32>,
    ) -> RequestBuilder {
        let mut req = request;

        if let Some(query) = query {
            req = req.query(&[("query", query)]);
        }

        if let Some(skip) = skip {
            req = req.query(&[("skip", skip.to_string())]);
        }

        if let Some(count) = count {
            req = req.query(&[("count", count.to_string())]);
        }

        req
    }
}
