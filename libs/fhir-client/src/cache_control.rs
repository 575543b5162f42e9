//! Per-request cache-control directive

/// Cache directive sent with a single search request.
///
/// The default directive sends no `Cache-Control` header, so the server
/// applies its normal response caching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheControl {
    /// Ask the server not to answer from a cached response
    pub no_cache: bool,
    /// Ask the server not to store the response in its cache
    pub no_store: bool,
}

impl CacheControl {
    /// Directive that bypasses any intermediate response cache.
    pub fn no_cache() -> Self {
        Self {
            no_cache: true,
            ..Self::default()
        }
    }

    /// `no_cache()` when `bypass` is set, the default directive otherwise.
    pub fn bypass(bypass: bool) -> Self {
        if bypass {
            Self::no_cache()
        } else {
            Self::default()
        }
    }

    /// Value for the `Cache-Control` request header, if one should be sent.
    pub fn header_value(&self) -> Option<String> {
        let mut directives = Vec::new();
        if self.no_cache {
            directives.push("no-cache");
        }
        if self.no_store {
            directives.push("no-store");
        }

        if directives.is_empty() {
            None
        } else {
            Some(directives.join(", "))
        }
    }
}
