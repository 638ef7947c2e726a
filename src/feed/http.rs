//! HTTP implementation of [`Fetcher`].
//!
//! One blocking GET per call via [`reqwest::blocking`].  Redirects follow
//! reqwest's default policy (at most 10 hops).  There is no retry; a failed
//! cycle is reported and the user reloads.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Url;

use super::{Fetcher, NetworkError};

/// Fetches feed bytes over HTTP(S).
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client))
    }

    /// Wrap an already-configured client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, NetworkError> {
        let parsed = Url::parse(url).map_err(|e| NetworkError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let response = self
            .client
            .get(parsed)
            .send()
            .map_err(|e| request_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // A zero-length body is not a network failure; the parser decides.
        let body = response.bytes().map_err(|e| {
            if e.is_timeout() {
                NetworkError::Timeout { url: url.to_string() }
            } else {
                NetworkError::Body {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        Ok(body.to_vec())
    }
}

fn request_error(url: &str, err: reqwest::Error) -> NetworkError {
    if err.is_timeout() {
        NetworkError::Timeout { url: url.to_string() }
    } else {
        NetworkError::Transport {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve exactly one connection with a canned response, optionally
    /// stalling before answering.  Returns the URL to request.
    fn serve_once(response: &'static str, stall: Option<Duration>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 4096];
            let mut request = Vec::new();
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap_or(0);
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            if let Some(stall) = stall {
                thread::sleep(stall);
            }
            let _ = stream.write_all(response.as_bytes());
        });

        format!("http://{addr}/feed")
    }

    fn fetcher(timeout: Duration) -> HttpFetcher {
        let client = Client::builder().timeout(timeout).no_proxy().build().unwrap();
        HttpFetcher::with_client(client)
    }

    #[test]
    fn returns_body_on_success() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Length: 15\r\nConnection: close\r\n\r\n{\"features\":[]}",
            None,
        );

        let body = fetcher(Duration::from_secs(5)).fetch(&url).unwrap();
        assert_eq!(body, b"{\"features\":[]}");
    }

    #[test]
    fn empty_body_is_not_an_error() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            None,
        );

        let body = fetcher(Duration::from_secs(5)).fetch(&url).unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn non_success_status_is_network_error() {
        let url = serve_once(
            "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            None,
        );

        let err = fetcher(Duration::from_secs(5)).fetch(&url).unwrap_err();
        assert!(matches!(err, NetworkError::Status { status: 503, .. }));
    }

    #[test]
    fn relative_url_is_rejected_without_a_request() {
        let err = fetcher(Duration::from_secs(5)).fetch("quakes.json").unwrap_err();
        assert!(matches!(err, NetworkError::InvalidUrl { .. }));
    }

    #[test]
    fn refused_connection_is_transport_error() {
        let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        // The listener is dropped, so nothing accepts on this port.
        let err = fetcher(Duration::from_secs(5))
            .fetch(&format!("http://{addr}/feed"))
            .unwrap_err();
        assert!(matches!(err, NetworkError::Transport { .. }));
    }

    #[test]
    fn slow_server_times_out() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            Some(Duration::from_secs(2)),
        );

        let err = fetcher(Duration::from_millis(200)).fetch(&url).unwrap_err();
        assert!(matches!(err, NetworkError::Timeout { .. }));
    }
}
