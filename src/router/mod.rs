// Router module
//
// Classifies an intercepted request into the strategy that serves it. Rules
// are evaluated in order and the first match wins; the live-data check runs
// before the trust filter so the live-data host is bypassed even when it is
// also a trusted origin.

use http::Method;
use std::fmt;

use crate::config::Settings;
use crate::http::Request;
use crate::security::{OriginClass, OriginFilter};

/// Why the worker let a request pass through untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbstainReason {
    /// Not http or https (e.g. `chrome-extension:`, `data:`)
    UnsupportedScheme,
    /// Cross-origin and not in the trust set
    UntrustedOrigin,
    /// The store only holds GET identities
    UnsupportedMethod,
    /// The worker does not control clients yet
    NotActivated,
}

impl AbstainReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            AbstainReason::UnsupportedScheme => "unsupported_scheme",
            AbstainReason::UntrustedOrigin => "untrusted_origin",
            AbstainReason::UnsupportedMethod => "unsupported_method",
            AbstainReason::NotActivated => "not_activated",
        }
    }
}

impl fmt::Display for AbstainReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Abstain(AbstainReason),
    /// Live data: network with no store involvement
    NetworkOnly,
    /// Navigations and documents
    NetworkFirst,
    /// Static assets
    CacheFirst,
}

impl Route {
    /// Label used in logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Abstain(_) => "abstain",
            Route::NetworkOnly => "network_only",
            Route::NetworkFirst => "network_first",
            Route::CacheFirst => "cache_first",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Abstain(reason) => write!(f, "abstain({})", reason),
            other => f.write_str(other.as_str()),
        }
    }
}

pub struct StrategyRouter {
    origin_filter: OriginFilter,
    live_data_host: Option<String>,
}

impl StrategyRouter {
    pub fn new(origin_filter: OriginFilter, live_data_host: Option<String>) -> Self {
        Self {
            origin_filter,
            live_data_host: live_data_host.map(|h| h.to_ascii_lowercase()),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            OriginFilter::new(settings.page_origin.clone(), settings.trust_set.clone()),
            settings.live_data_host.clone(),
        )
    }

    pub fn route(&self, request: &Request) -> Route {
        if !request.is_http() {
            return Route::Abstain(AbstainReason::UnsupportedScheme);
        }

        // Exact hostname match; `url` already lowercases hosts
        if let (Some(live), Some(host)) = (self.live_data_host.as_deref(), request.hostname()) {
            if host == live {
                return Route::NetworkOnly;
            }
        }

        if self.origin_filter.classify(request) == OriginClass::Untrusted {
            return Route::Abstain(AbstainReason::UntrustedOrigin);
        }

        if request.method() != Method::GET {
            return Route::Abstain(AbstainReason::UnsupportedMethod);
        }

        if request.is_navigation() {
            Route::NetworkFirst
        } else {
            Route::CacheFirst
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::http::{Destination, RequestMode};
    use rstest::rstest;

    fn router() -> StrategyRouter {
        StrategyRouter::from_settings(&Settings::from_config(&Config::default()).unwrap())
    }

    #[rstest]
    #[case("chrome-extension://abcdef/script.js", Route::Abstain(AbstainReason::UnsupportedScheme))]
    #[case("data:text/plain,hello", Route::Abstain(AbstainReason::UnsupportedScheme))]
    #[case("https://sheets.googleapis.com/v4/spreadsheets/x/values/A1", Route::NetworkOnly)]
    #[case("https://evil.example/x.js", Route::Abstain(AbstainReason::UntrustedOrigin))]
    #[case("https://riep31.github.io/css/style.css", Route::CacheFirst)]
    #[case("https://cdn.jsdelivr.net/npm/chart.js", Route::CacheFirst)]
    #[case("https://cdnjs.cloudflare.com/ajax/libs/x.js", Route::CacheFirst)]
    fn test_routes_get_subresources(#[case] url: &str, #[case] expected: Route) {
        let request = Request::get(url).unwrap();
        assert_eq!(router().route(&request), expected);
    }

    #[rstest]
    #[case(RequestMode::Navigate, Destination::Document)]
    #[case(RequestMode::Navigate, Destination::Empty)]
    #[case(RequestMode::Cors, Destination::Document)]
    fn test_navigations_are_network_first(#[case] mode: RequestMode, #[case] destination: Destination) {
        let request = Request::get("https://riep31.github.io/dashboard.html")
            .unwrap()
            .with_mode(mode)
            .with_destination(destination);
        assert_eq!(router().route(&request), Route::NetworkFirst);
    }

    #[test]
    fn test_live_data_wins_over_navigation() {
        let request = Request::navigate("https://sheets.googleapis.com/").unwrap();
        assert_eq!(router().route(&request), Route::NetworkOnly);
    }

    #[test]
    fn test_live_data_match_is_exact() {
        // A subdomain of the live-data host is not live data; it is also untrusted
        let request = Request::get("https://x.sheets.googleapis.com/values").unwrap();
        assert_eq!(
            router().route(&request),
            Route::Abstain(AbstainReason::UntrustedOrigin)
        );
    }

    #[test]
    fn test_live_data_post_is_still_network_only() {
        let request = Request::get("https://sheets.googleapis.com/v4/x:append")
            .unwrap()
            .with_method(Method::POST);
        assert_eq!(router().route(&request), Route::NetworkOnly);
    }

    #[test]
    fn test_non_get_same_origin_abstains() {
        let request = Request::get("https://riep31.github.io/api")
            .unwrap()
            .with_method(Method::POST);
        assert_eq!(
            router().route(&request),
            Route::Abstain(AbstainReason::UnsupportedMethod)
        );
    }

    #[test]
    fn test_untrusted_check_precedes_method_check() {
        let request = Request::get("https://evil.example/submit")
            .unwrap()
            .with_method(Method::POST);
        assert_eq!(
            router().route(&request),
            Route::Abstain(AbstainReason::UntrustedOrigin)
        );
    }

    #[test]
    fn test_prefix_trust_admits_lookalike_origin() {
        // Prefix matching is kept as-is; see DESIGN.md
        let request = Request::get("https://riep31.github.io.evil.example/x.js").unwrap();
        assert_eq!(router().route(&request), Route::CacheFirst);
    }

    #[test]
    fn test_disabled_live_data_host_falls_through() {
        let mut config = Config::default();
        config.origins.live_data_host = None;
        let router = StrategyRouter::from_settings(&Settings::from_config(&config).unwrap());
        let request = Request::get("https://sheets.googleapis.com/values").unwrap();
        // Still a trusted origin, so it is treated as an asset
        assert_eq!(router.route(&request), Route::CacheFirst);
    }

    #[test]
    fn test_route_labels() {
        assert_eq!(Route::CacheFirst.to_string(), "cache_first");
        assert_eq!(
            Route::Abstain(AbstainReason::NotActivated).to_string(),
            "abstain(not_activated)"
        );
    }
}
