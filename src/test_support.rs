//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::api::{
    ApiError, ChatRequest, ChatResponse, DetailsRequest, MovieDetails, PosterImage,
    RecommendationBackend,
};
use crate::core::state::{App, ChatSettings};

/// In-memory backend with canned responses and call counters.
pub struct ScriptedBackend {
    chat: Mutex<Option<Result<ChatResponse, ApiError>>>,
    details: HashMap<String, Result<Option<MovieDetails>, ApiError>>,
    delay: Option<Duration>,
    details_delays: HashMap<String, Duration>,
    details_calls: AtomicUsize,
    poster_calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            chat: Mutex::new(None),
            details: HashMap::new(),
            delay: None,
            details_delays: HashMap::new(),
            details_calls: AtomicUsize::new(0),
            poster_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_chat(self, result: Result<ChatResponse, ApiError>) -> Self {
        *self.chat.lock().unwrap() = Some(result);
        self
    }

    pub fn with_details(mut self, title: &str, details: Option<MovieDetails>) -> Self {
        self.details.insert(title.to_string(), Ok(details));
        self
    }

    pub fn with_details_error(mut self, title: &str, error: ApiError) -> Self {
        self.details.insert(title.to_string(), Err(error));
        self
    }

    /// Every call sleeps this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Details lookups for `title` sleep this long before answering.
    pub fn with_details_delay(mut self, title: &str, delay: Duration) -> Self {
        self.details_delays.insert(title.to_string(), delay);
        self
    }

    pub fn details_calls(&self) -> usize {
        self.details_calls.load(Ordering::SeqCst)
    }

    pub fn poster_calls(&self) -> usize {
        self.poster_calls.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl RecommendationBackend for ScriptedBackend {
    fn base_url(&self) -> &str {
        "http://scripted"
    }

    async fn chat(&self, _request: &ChatRequest, _timeout: Duration) -> Result<ChatResponse, ApiError> {
        self.pause().await;
        self.chat
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok(ChatResponse::default()))
    }

    async fn movie_details(
        &self,
        request: &DetailsRequest,
        _timeout: Duration,
    ) -> Result<Option<MovieDetails>, ApiError> {
        self.details_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if let Some(delay) = self.details_delays.get(&request.title) {
            tokio::time::sleep(*delay).await;
        }
        self.details.get(&request.title).cloned().unwrap_or(Ok(None))
    }

    async fn poster(&self, url: &str, _timeout: Duration) -> Result<PosterImage, ApiError> {
        self.poster_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        Ok(PosterImage {
            url: url.to_string(),
            content_type: Some("image/jpeg".to_string()),
            bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
        })
    }
}

/// Creates a test App with default settings and a fixed session id.
pub fn test_app() -> App {
    App::new(
        "session_test0000".to_string(),
        ChatSettings {
            service_url: "http://localhost:8000".to_string(),
            rating_threshold: 7.0,
            top_k: 5,
        },
    )
}

/// A fresh, empty directory under the system temp dir.
pub fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("moodreel-test-{}", uuid::Uuid::new_v4().simple()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
