pub mod types;
pub mod stream;
pub mod stream_view;
pub mod data;

// Re-export all APIs
pub use types::TypeApi;
pub use stream::StreamApi;
pub use stream_view::StreamViewApi;
pub use data::DataApi;

use crate::error::{SdsError, SdsResult};

/// Id naming a resource in its URL; unset or empty ids would address the collection instead
fn required_id<'a>(id: &'a Option<String>, kind: &str) -> SdsResult<&'a str> {
    id.as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| SdsError::invalid_param(format!("{} has no Id", kind)))
}
