//! Response envelope types for the content service API.
//!
//! Every response is wrapped in the same `{success, data, message?,
//! meta?}` shape; `meta` carries pagination on list endpoints.

use serde::{Deserialize, Serialize};

/// Uniform wrapper around every content service response.
///
/// The client guarantees the HTTP-layer contract only; callers check
/// `success`/`data` semantics themselves.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub meta: Option<Meta>,
}

/// Pagination metadata on list responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

/// Best-effort parse of a 4xx error body.
///
/// The service is not obligated to return a well-formed body on errors;
/// anything unparsable collapses to the default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<serde_json::Value>,
}
