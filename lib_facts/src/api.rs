//! # API Description
//!
//! Base address, versions and endpoints of the dog facts service.

use std::fmt;

/// Production base URL; every endpoint path is joined below it.
pub const DEFAULT_BASE_URL: &str = "https://dog-facts-api.herokuapp.com/api";

/// Query parameter carrying the requested number of facts.
pub const COUNT_QUERY_NAME: &str = "number";

/// Versions of the API the client knows how to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiVersion {
    #[default]
    V1,
}

impl ApiVersion {
    /// The path segment for this version.
    pub fn segment(&self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1",
        }
    }

    /// Parses a path segment such as `"v1"`.
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment.trim().to_ascii_lowercase().as_str() {
            "v1" => Some(ApiVersion::V1),
            _ => None,
        }
    }
}

/// Server endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// List of dog facts.
    GetFacts,
}

impl Endpoint {
    /// Path of the endpoint below the version segment.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::GetFacts => "resources/dogs",
        }
    }

    /// Joins `{base}/{version}/{path}` without validating the result.
    pub fn url_string(&self, base_url: &str, version: ApiVersion) -> String {
        format!("{}/{}/{}", base_url.trim_end_matches('/'), version.segment(), self.path())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
