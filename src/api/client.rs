use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};

use super::error::ApiError;
use super::types::{
    ChatRequest, ChatResponse, DetailsRequest, DetailsResponse, MovieDetails, PosterImage,
};

/// The recommendation service as seen by the client.
///
/// Every call carries its own deadline; exceeding it yields `ApiError::Timeout`.
#[async_trait]
pub trait RecommendationBackend: Send + Sync {
    /// Base URL of the service, shown to the user when it can't be reached.
    fn base_url(&self) -> &str;

    /// `POST /chat`
    async fn chat(&self, request: &ChatRequest, timeout: Duration)
    -> Result<ChatResponse, ApiError>;

    /// `POST /movie/details`. `Ok(None)` when the backend has no record.
    async fn movie_details(
        &self,
        request: &DetailsRequest,
        timeout: Duration,
    ) -> Result<Option<MovieDetails>, ApiError>;

    /// Download a poster image.
    async fn poster(&self, url: &str, timeout: Duration) -> Result<PosterImage, ApiError>;
}

/// reqwest-backed implementation talking to the real service.
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        warn!("Backend error: {} - {}", status, body);
        Err(ApiError::from_status(status, body))
    }
}

#[async_trait]
impl RecommendationBackend for HttpBackend {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn chat(
        &self,
        request: &ChatRequest,
        timeout: Duration,
    ) -> Result<ChatResponse, ApiError> {
        info!(
            "POST /chat: session={}, text_len={}, threshold={}, top_k={}",
            request.session_id,
            request.text.len(),
            request.rating_threshold,
            request.top_k
        );

        let response = self
            .client
            .post(format!("{}/chat", self.base_url))
            .timeout(timeout)
            .json(request)
            .send()
            .await?;
        debug!("/chat response status: {}", response.status());

        let response = Self::check_status(response).await?;
        let chat: ChatResponse = response.json().await?;
        info!(
            "/chat returned {} movies, {} genre scores",
            chat.movies.as_ref().map_or(0, Vec::len),
            chat.genre_scores.as_ref().map_or(0, Vec::len)
        );
        Ok(chat)
    }

    async fn movie_details(
        &self,
        request: &DetailsRequest,
        timeout: Duration,
    ) -> Result<Option<MovieDetails>, ApiError> {
        debug!("POST /movie/details: title={:?}", request.title);

        let response = self
            .client
            .post(format!("{}/movie/details", self.base_url))
            .timeout(timeout)
            .json(request)
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        let details: DetailsResponse = response.json().await?;
        Ok(details.details)
    }

    async fn poster(&self, url: &str, timeout: Duration) -> Result<PosterImage, ApiError> {
        debug!("GET poster {}", url);

        let response = self.client.get(url).timeout(timeout).send().await?;
        let response = Self::check_status(response).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?;

        Ok(PosterImage {
            url: url.to_string(),
            content_type,
            bytes: bytes.to_vec(),
        })
    }
}
