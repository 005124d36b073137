// Origin trust filtering - decides whose traffic the worker may observe
//
// Trust is a plain string prefix match against the serialized origin, so a
// trusted entry `https://cdn.example` also admits `https://cdn.example.evil`.

use serde::Serialize;

use crate::http::Request;

/// Result of classifying a request origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OriginClass {
    /// Same origin as the pages the worker controls
    SameOrigin,
    /// Cross-origin, but starts with a trusted prefix
    Trusted,
    /// Anything else; never fetched, cached or inspected
    Untrusted,
}

impl OriginClass {
    pub fn is_trusted(&self) -> bool {
        !matches!(self, OriginClass::Untrusted)
    }
}

/// Static list of trusted cross-origin prefixes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrustSet {
    prefixes: Vec<String>,
}

impl TrustSet {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// True if the origin starts with any trusted prefix
    pub fn is_trusted(&self, origin: &str) -> bool {
        self.prefixes
            .iter()
            .any(|prefix| origin.starts_with(prefix.as_str()))
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

/// Classify a serialized request origin against the page origin and trust set
pub fn classify_origin(request_origin: &str, page_origin: &str, trust_set: &TrustSet) -> OriginClass {
    if request_origin == page_origin {
        OriginClass::SameOrigin
    } else if trust_set.is_trusted(request_origin) {
        OriginClass::Trusted
    } else {
        OriginClass::Untrusted
    }
}

/// Page origin plus trust set, applied to intercepted requests
#[derive(Debug, Clone)]
pub struct OriginFilter {
    page_origin: String,
    trust_set: TrustSet,
}

impl OriginFilter {
    pub fn new(page_origin: impl Into<String>, trust_set: TrustSet) -> Self {
        Self {
            page_origin: page_origin.into(),
            trust_set,
        }
    }

    pub fn classify(&self, request: &Request) -> OriginClass {
        classify_origin(&request.origin(), &self.page_origin, &self.trust_set)
    }

    pub fn page_origin(&self) -> &str {
        &self.page_origin
    }

    pub fn trust_set(&self) -> &TrustSet {
        &self.trust_set
    }
}
