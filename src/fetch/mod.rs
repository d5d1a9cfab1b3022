mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::Result;
use reqwest::StatusCode;
use reqwest::header::{HeaderName, HeaderValue};

/// Status and body of a completed GET request.
#[derive(Debug)]
pub struct Fetched {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl Fetched {
    /// The body as lossy UTF-8, cut to at most `max_chars` characters.
    pub fn body_snippet(&self, max_chars: usize) -> String {
        String::from_utf8_lossy(&self.body)
            .chars()
            .take(max_chars)
            .collect()
    }
}

/// Issues a GET for `url` with the given extra headers.
///
/// Non-success statuses are returned, not raised; only transport failures
/// and invalid URLs or headers are errors.
pub async fn fetch<C: HttpClient>(
    client: &C,
    url: &str,
    headers: &[(&str, &str)],
) -> Result<Fetched> {
    let mut req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    for (name, value) in headers {
        req.headers_mut().insert(
            HeaderName::from_bytes(name.as_bytes())?,
            HeaderValue::from_str(value)?,
        );
    }

    let resp = client.execute(req).await?;
    let status = resp.status();
    let body = resp.bytes().await?.to_vec();

    Ok(Fetched { status, body })
}
