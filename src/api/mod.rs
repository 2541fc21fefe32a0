pub mod download;
pub mod meta;
pub mod pages;
pub mod update;

use axum::http::header;
use axum::http::HeaderMap;

/// Public base URL of this server, derived from the request's Host header.
/// Ends with a slash.
///
/// Plain http is assumed only for loopback-style hosts; anything reachable
/// under a real name is taken to sit behind TLS.
pub(crate) fn base_url(headers: &HeaderMap) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("localhost");
    let scheme = if host.contains("localhost") || host.contains("127.0.0.1") || host.contains("[::]")
    {
        "http"
    } else {
        "https"
    };
    format!("{scheme}://{host}/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(host: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_str(host).unwrap());
        headers
    }

    #[test]
    fn test_base_url_local_hosts_are_http() {
        assert_eq!(base_url(&headers("localhost:3030")), "http://localhost:3030/");
        assert_eq!(base_url(&headers("127.0.0.1:8080")), "http://127.0.0.1:8080/");
    }

    #[test]
    fn test_base_url_public_hosts_are_https() {
        assert_eq!(
            base_url(&headers("updates.example.com")),
            "https://updates.example.com/"
        );
    }

    #[test]
    fn test_base_url_without_host_header() {
        assert_eq!(base_url(&HeaderMap::new()), "http://localhost/");
    }
}
