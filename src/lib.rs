/*
 * SDS Client - Rust client for the OSIsoft Sequential Data Store (OCS)
 */

// Internal modules
mod client;
pub mod models;
mod apis;
mod error;
mod auth;
mod config;

// Re-export public types and interfaces
pub use client::BaseClient;
pub use models::*;
pub use apis::*;
pub use error::{SdsError, SdsResult};
pub use auth::{Authentication, BearerAuth, ClientCredentials, TokenSession, REFRESH_MARGIN_SECS};
pub use config::SdsConfig;

// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        BaseClient,
        BearerAuth, ClientCredentials,
        SdsError, SdsResult, SdsConfig,
        SdsObject,
        // Common model types
        SdsType, SdsTypeProperty, SdsTypeCode,
        SdsStream, SdsStreamIndex, SdsStreamPropertyOverride,
        SdsStreamView, SdsStreamViewProperty, SdsStreamViewMap,
        SdsBoundaryType, SdsInterpolationMode,
    };
}
