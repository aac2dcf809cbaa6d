//! HTTP listing endpoint.

use super::decode_listing;
use crate::model::{FetchError, RawDocument};
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Join an API base and a listing path with exactly one slash.
pub fn listing_url(api_base: &str, listing_path: &str) -> String {
    let base = api_base.trim_end_matches('/');
    let path = listing_path.trim_start_matches('/');
    format!("{base}/{path}")
}

/// Blocking `GET` client for the listing endpoint.
#[derive(Clone)]
pub struct HttpListing {
    api_base: String,
    url: String,
    timeout: Duration,
    agent: ureq::Agent,
}

impl fmt::Debug for HttpListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpListing")
            .field("url", &self.url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl HttpListing {
    /// Create a client for `{api_base}{listing_path}`.
    ///
    /// `timeout` bounds the whole request including reading the body.
    pub fn new(api_base: &str, listing_path: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            api_base: api_base.to_string(),
            url: listing_url(api_base, listing_path),
            timeout,
            agent,
        }
    }

    /// Fully resolved listing URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Base URL that document urls are resolved against.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Fetch and decode the listing.
    ///
    /// No retry is attempted.
    ///
    /// # Errors
    ///
    /// - `FetchError::Status` for any non-2xx response
    /// - `FetchError::Transport` when no response was received
    /// - `FetchError::Decode` when the body is not a listing
    pub fn fetch(&self) -> Result<Vec<RawDocument>, FetchError> {
        debug!(url = %self.url, "Requesting listing");
        match self.agent.get(&self.url).call() {
            Ok(response) => decode_listing(response.into_reader(), &self.url),
            Err(ureq::Error::Status(status, _)) => Err(FetchError::Status {
                url: self.url.clone(),
                status,
            }),
            Err(err) => Err(FetchError::Transport {
                url: self.url.clone(),
                reason: err.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// Serve exactly one HTTP response on an ephemeral port.
    ///
    /// Returns the base address and a handle yielding the request line.
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = format!("http://{}", listener.local_addr().expect("addr"));

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept");
            let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
            let mut request_line = String::new();
            let _ = reader.read_line(&mut request_line);

            let mut header = String::new();
            loop {
                header.clear();
                let _ = reader.read_line(&mut header);
                if header == "\r\n" || header.is_empty() {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {status_line}\r\n\
                 Content-Type: application/json\r\n\
                 Content-Length: {}\r\n\
                 Connection: close\r\n\
                 \r\n\
                 {body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
            request_line
        });

        (addr, handle)
    }

    #[test]
    fn listing_url_joins_with_single_slash() {
        assert_eq!(
            listing_url("http://localhost:8080", "/api/pdfs"),
            "http://localhost:8080/api/pdfs"
        );
        assert_eq!(
            listing_url("http://localhost:8080/", "api/pdfs"),
            "http://localhost:8080/api/pdfs"
        );
        assert_eq!(listing_url("http://h/", "/x"), "http://h/x");
    }

    #[test]
    fn fetch_decodes_successful_response() {
        let (addr, server) = serve_once(
            "200 OK",
            r#"[{"Name":"a.pdf","Size":1048576,"ModTime":"2025-01-01T00:00:00Z","URL":"/pdfs/a.pdf"}]"#,
        );

        let listing = HttpListing::new(&addr, "/api/pdfs", Duration::from_secs(5));
        let raws = listing.fetch().expect("listing");

        assert_eq!(raws.len(), 1);
        assert_eq!(raws[0].name.as_deref(), Some("a.pdf"));

        let request_line = server.join().expect("server thread");
        assert!(
            request_line.starts_with("GET /api/pdfs "),
            "unexpected request line: {request_line}"
        );
    }

    #[test]
    fn fetch_treats_null_body_as_empty() {
        let (addr, server) = serve_once("200 OK", "null");
        let raws = HttpListing::new(&addr, "/api/pdfs", Duration::from_secs(5))
            .fetch()
            .expect("null listing");
        assert!(raws.is_empty());
        server.join().expect("server thread");
    }

    #[test]
    fn fetch_maps_error_status() {
        let (addr, server) = serve_once("500 Internal Server Error", "failed to read pdf directory");
        let listing = HttpListing::new(&addr, "/api/pdfs", Duration::from_secs(5));

        let err = listing.fetch().expect_err("500 must fail");
        assert_eq!(
            err,
            FetchError::Status {
                url: format!("{addr}/api/pdfs"),
                status: 500,
            }
        );
        server.join().expect("server thread");
    }

    #[test]
    fn fetch_maps_unparseable_body_to_decode_error() {
        let (addr, server) = serve_once("200 OK", "<html>not json</html>");
        let err = HttpListing::new(&addr, "/api/pdfs", Duration::from_secs(5))
            .fetch()
            .expect_err("html is not a listing");
        assert!(matches!(err, FetchError::Decode { .. }), "got {err:?}");
        server.join().expect("server thread");
    }

    #[test]
    fn fetch_maps_refused_connection_to_transport_error() {
        // Bind then drop to get a port nothing listens on
        let port = TcpListener::bind("127.0.0.1:0")
            .expect("bind")
            .local_addr()
            .expect("addr")
            .port();
        let listing = HttpListing::new(
            &format!("http://127.0.0.1:{port}"),
            "/api/pdfs",
            Duration::from_secs(2),
        );

        let err = listing.fetch().expect_err("nothing listening");
        assert!(matches!(err, FetchError::Transport { .. }), "got {err:?}");
    }

    #[test]
    fn debug_shows_url_without_agent_internals() {
        let listing = HttpListing::new("http://h", "/api/pdfs", Duration::from_secs(1));
        let debug = format!("{listing:?}");
        assert!(debug.contains("http://h/api/pdfs"));
        assert!(debug.starts_with("HttpListing"));
    }
}
