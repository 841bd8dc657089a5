//! # Worker
//!
//! Performs the `Effect`s emitted by `core::action::update()` against the
//! backend and translates their results back into `Action`s. Tasks never
//! touch `App` directly; the reducer stays the single writer of every cache.
//!
//! Every effect yields a stream of actions. Most yield at most one; a
//! prefetch yields one `DetailsLoaded` per candidate, in completion order.

pub mod prefetch;

use std::path::PathBuf;
use std::sync::Arc;

use futures::future;
use futures::stream::{self, BoxStream, StreamExt};
use log::{info, warn};

use crate::api::{ApiError, RecommendationBackend};
use crate::core::action::{Action, Effect};
use crate::core::config::Timeouts;
use crate::core::session;

#[derive(Clone)]
pub struct Worker {
    backend: Arc<dyn RecommendationBackend>,
    timeouts: Timeouts,
    session_path: Option<PathBuf>,
}

impl Worker {
    pub fn new(
        backend: Arc<dyn RecommendationBackend>,
        timeouts: Timeouts,
        session_path: Option<PathBuf>,
    ) -> Self {
        Self {
            backend,
            timeouts,
            session_path,
        }
    }

    /// Run one effect, yielding each resulting action as soon as it exists.
    pub fn run(&self, effect: Effect) -> BoxStream<'static, Action> {
        match effect {
            Effect::Prefetch(items) => {
                prefetch::prefetch_details(self.backend.clone(), items, self.timeouts).boxed()
            }
            effect => {
                let worker = self.clone();
                stream::once(async move { worker.complete(effect).await })
                    .filter_map(future::ready)
                    .boxed()
            }
        }
    }

    async fn complete(&self, effect: Effect) -> Option<Action> {
        match effect {
            Effect::SendChat { epoch, request } => {
                let result = with_deadline(
                    self.timeouts.chat,
                    self.backend.chat(&request, self.timeouts.chat),
                )
                .await;
                Some(Action::ChatCompleted { epoch, result })
            }
            Effect::FetchDetails { key, request } => {
                let result = with_deadline(
                    self.timeouts.details,
                    self.backend.movie_details(&request, self.timeouts.details),
                )
                .await;
                Some(Action::DetailsLoaded { key, result })
            }
            Effect::LoadPoster(url) => {
                let result = with_deadline(
                    self.timeouts.poster,
                    self.backend.poster(&url, self.timeouts.poster),
                )
                .await;
                Some(Action::PosterLoaded { url, result })
            }
            Effect::PersistSession(id) => {
                match &self.session_path {
                    Some(path) => match session::save(path, &id) {
                        Ok(()) => info!("Persisted session {}", id),
                        Err(e) => warn!("Failed to persist session id: {}", e),
                    },
                    None => warn!("No session path, session {} not persisted", id),
                }
                None
            }
            // Prefetch is streamed by `run`; Quit is handled by the UI loop.
            Effect::Prefetch(_) | Effect::Quit => None,
        }
    }
}

/// Bound a backend call by `limit` even if the transport ignores its own timeout.
async fn with_deadline<T>(
    limit: std::time::Duration,
    call: impl Future<Output = Result<T, ApiError>>,
) -> Result<T, ApiError> {
    tokio::time::timeout(limit, call)
        .await
        .unwrap_or(Err(ApiError::Timeout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ChatRequest, ChatResponse, Movie, MovieDetails, Year};
    use crate::core::action::{PrefetchItem, update};
    use crate::core::cache::{DetailsKey, details_request};
    use crate::test_support::{ScriptedBackend, scratch_dir, test_app};
    use std::time::Duration;

    fn worker(backend: Arc<ScriptedBackend>) -> Worker {
        Worker::new(backend, Timeouts::default(), None)
    }

    #[tokio::test]
    async fn send_chat_reports_completion_with_epoch() {
        let backend = Arc::new(ScriptedBackend::new().with_chat(Ok(ChatResponse {
            reply: Some("hi".into()),
            ..Default::default()
        })));
        let action = worker(backend)
            .run(Effect::SendChat {
                epoch: 7,
                request: ChatRequest {
                    text: "hello".into(),
                    session_id: "session_x".into(),
                    rating_threshold: 7.0,
                    top_k: 5,
                },
            })
            .next()
            .await;

        match action {
            Some(Action::ChatCompleted { epoch, result }) => {
                assert_eq!(epoch, 7);
                assert_eq!(result.unwrap().reply.as_deref(), Some("hi"));
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[tokio::test]
    async fn slow_backend_times_out() {
        let backend = Arc::new(ScriptedBackend::new().with_delay(Duration::from_millis(200)));
        let timeouts = Timeouts {
            details: Duration::from_millis(20),
            ..Timeouts::default()
        };
        let worker = Worker::new(backend, timeouts, None);
        let movie = Movie::new("Up", Some(Year::Numeric(2009)));

        let action = worker
            .run(Effect::FetchDetails {
                key: DetailsKey::for_movie(&movie),
                request: details_request(&movie),
            })
            .next()
            .await;
        assert!(matches!(
            action,
            Some(Action::DetailsLoaded { result: Err(ApiError::Timeout), .. })
        ));
    }

    #[tokio::test]
    async fn persist_session_writes_file() {
        let dir = scratch_dir();
        let path = dir.join("session_id");
        let worker = Worker::new(
            Arc::new(ScriptedBackend::new()),
            Timeouts::default(),
            Some(path.clone()),
        );

        let actions: Vec<Action> = worker
            .run(Effect::PersistSession("session_abc".into()))
            .collect()
            .await;
        assert!(actions.is_empty());
        assert_eq!(std::fs::read_to_string(path).unwrap(), "session_abc");
    }

    #[tokio::test]
    async fn repeated_selection_hits_network_once() {
        let backend = Arc::new(ScriptedBackend::new().with_details(
            "Up",
            Some(MovieDetails {
                title: "Up".into(),
                ..Default::default()
            }),
        ));
        let worker = worker(backend.clone());
        let mut app = test_app();
        let up = Movie::new("Up", Some(Year::Numeric(2009)));

        for _ in 0..2 {
            let effects = update(
                &mut app,
                Action::SelectMovie {
                    movie: up.clone(),
                    index: 0,
                    list: vec![up.clone()],
                },
            );
            for effect in effects {
                let mut results = worker.run(effect);
                while let Some(action) = results.next().await {
                    update(&mut app, action);
                }
            }
        }

        assert_eq!(backend.details_calls(), 1);
        assert_eq!(
            app.highlight.details.as_ref().map(|d| d.title.as_str()),
            Some("Up")
        );
    }

    #[tokio::test]
    async fn prefetch_delivers_fast_results_before_slow_ones() {
        let backend = Arc::new(
            ScriptedBackend::new()
                .with_details("Coco", Some(MovieDetails { title: "Coco".into(), ..Default::default() }))
                .with_details("Heat", Some(MovieDetails { title: "Heat".into(), ..Default::default() }))
                .with_details_delay("Heat", Duration::from_secs(30)),
        );
        let timeouts = Timeouts {
            prefetch: Duration::from_millis(500),
            ..Timeouts::default()
        };
        let worker = Worker::new(backend, timeouts, None);
        let items = ["Heat", "Coco"]
            .iter()
            .map(|t| {
                let movie = Movie::new(*t, Some(Year::Numeric(2000)));
                PrefetchItem {
                    key: DetailsKey::for_movie(&movie),
                    request: details_request(&movie),
                }
            })
            .collect();

        let mut results = worker.run(Effect::Prefetch(items));

        let first = tokio::time::timeout(Duration::from_millis(200), results.next())
            .await
            .expect("fast record must not wait for the slow one");
        match first {
            Some(Action::DetailsLoaded { key, result: Ok(Some(details)) }) => {
                assert_eq!(key.title, "Coco");
                assert_eq!(details.title, "Coco");
            }
            other => panic!("unexpected first action: {other:?}"),
        }

        match results.next().await {
            Some(Action::DetailsLoaded { key, result: Err(ApiError::Timeout) }) => {
                assert_eq!(key.title, "Heat");
            }
            other => panic!("unexpected second action: {other:?}"),
        }
        assert!(results.next().await.is_none());
    }
}
