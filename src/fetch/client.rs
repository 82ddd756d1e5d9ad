use async_trait::async_trait;
use reqwest::{Request, Response};

/// HTTP seam so snapshot downloads can be mocked in tests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
