use async_trait::async_trait;
use reqwest::{Request, Response};

/// Minimal HTTP seam so lookup providers can be layered (auth, timeouts)
/// and swapped out in tests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
