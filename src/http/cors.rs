//! CORS policy
//!
//! Permissive by default: any origin is echoed back with credentials allowed.
//! An explicit comma-separated origin list narrows it down.

use hyper::header::{
    HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_EXPOSE_HEADERS,
    ACCESS_CONTROL_MAX_AGE, VARY,
};

use crate::config::CorsConfig;

pub const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS, PATCH";
const PREFLIGHT_MAX_AGE: &str = "3600";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    /// `*` pattern; the request origin is reflected
    Any,
    List(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct CorsPolicy {
    origins: AllowedOrigins,
}

impl CorsPolicy {
    pub fn from_config(config: &CorsConfig) -> Self {
        Self::parse(&config.allowed_origins)
    }

    /// Parse `*` or `https://a.example,https://b.example`
    pub fn parse(allowed_origins: &str) -> Self {
        let entries: Vec<String> = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(|o| o.trim_end_matches('/').to_string())
            .collect();

        let origins = if entries.is_empty() || entries.iter().any(|o| o == "*") {
            AllowedOrigins::Any
        } else {
            AllowedOrigins::List(entries)
        };
        Self { origins }
    }

    pub fn allows(&self, origin: &str) -> bool {
        match &self.origins {
            AllowedOrigins::Any => true,
            AllowedOrigins::List(list) => list.iter().any(|o| o == origin),
        }
    }

    /// Add CORS headers for `origin` to a response, if the origin is allowed
    ///
    /// `requested_headers` is the preflight's `Access-Control-Request-Headers`;
    /// it is echoed so any header is accepted. Returns whether headers were set.
    pub fn apply(
        &self,
        origin: Option<&str>,
        requested_headers: Option<&str>,
        is_preflight: bool,
        headers: &mut HeaderMap,
    ) -> bool {
        let Some(origin) = origin.filter(|o| self.allows(o)) else {
            return false;
        };
        let Ok(origin_value) = HeaderValue::from_str(origin) else {
            return false;
        };

        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin_value);
        headers.insert(ACCESS_CONTROL_ALLOW_CREDENTIALS, HeaderValue::from_static("true"));
        headers.insert(ACCESS_CONTROL_EXPOSE_HEADERS, HeaderValue::from_static("*"));
        headers.append(VARY, HeaderValue::from_static("Origin"));

        if is_preflight {
            headers.insert(
                ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(ALLOWED_METHODS),
            );
            let allow_headers = requested_headers
                .and_then(|h| HeaderValue::from_str(h).ok())
                .unwrap_or_else(|| HeaderValue::from_static("*"));
            headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, allow_headers);
            headers.insert(
                ACCESS_CONTROL_MAX_AGE,
                HeaderValue::from_static(PREFLIGHT_MAX_AGE),
            );
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_reflects_origin() {
        let policy = CorsPolicy::parse("*");
        let mut headers = HeaderMap::new();
        assert!(policy.apply(Some("http://localhost:5173"), None, false, &mut headers));
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "http://localhost:5173");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert!(!headers.contains_key(ACCESS_CONTROL_ALLOW_METHODS));
    }

    #[test]
    fn test_explicit_list() {
        let policy = CorsPolicy::parse(" https://casa.example , https://app.example/ ");
        assert!(policy.allows("https://casa.example"));
        assert!(policy.allows("https://app.example"));
        assert!(!policy.allows("https://evil.example"));

        let mut headers = HeaderMap::new();
        assert!(!policy.apply(Some("https://evil.example"), None, false, &mut headers));
        assert!(headers.is_empty());
    }

    #[test]
    fn test_empty_config_means_any() {
        assert!(CorsPolicy::parse("").allows("http://anything"));
    }

    #[test]
    fn test_preflight_headers() {
        let policy = CorsPolicy::parse("*");
        let mut headers = HeaderMap::new();
        policy.apply(
            Some("http://localhost:3000"),
            Some("content-type, authorization"),
            true,
            &mut headers,
        );
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_METHODS], ALLOWED_METHODS);
        assert_eq!(
            headers[ACCESS_CONTROL_ALLOW_HEADERS],
            "content-type, authorization"
        );
        assert_eq!(headers[ACCESS_CONTROL_MAX_AGE], "3600");
    }

    #[test]
    fn test_no_origin_no_headers() {
        let mut headers = HeaderMap::new();
        assert!(!CorsPolicy::parse("*").apply(None, None, false, &mut headers));
        assert!(headers.is_empty());
    }
}
