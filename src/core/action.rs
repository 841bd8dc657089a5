//! # Actions
//!
//! Everything that can happen in Moodreel becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! Backend responds? That's `Action::ChatCompleted { .. }`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns the `Effect`s the caller must perform. No I/O
//! happens here; the worker runs effects and feeds results back as actions.
//!
//! ```text
//! State + Action  →  update()  →  New State + [Effect]
//! ```

use log::{debug, info, warn};

use crate::api::{ApiError, ChatRequest, ChatResponse, DetailsRequest, Movie, MovieDetails, PosterImage};
use crate::core::cache::{DetailsKey, details_request};
use crate::core::message::{CLEARED_GREETING, Message, NEW_CHAT_GREETING};
use crate::core::session::new_session_id;
use crate::core::state::App;

/// Maximum number of candidates warmed per recommendation list.
pub const PREFETCH_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct PrefetchItem {
    pub key: DetailsKey,
    pub request: DetailsRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Submit(String),
    ChatCompleted {
        epoch: u64,
        result: Result<ChatResponse, ApiError>,
    },
    ClearChat,
    NewChat,
    SelectMovie {
        movie: Movie,
        index: usize,
        list: Vec<Movie>,
    },
    NextHighlight,
    PrevHighlight,
    ToggleHighlight,
    DetailsLoaded {
        key: DetailsKey,
        result: Result<Option<MovieDetails>, ApiError>,
    },
    PosterLoaded {
        url: String,
        result: Result<PosterImage, ApiError>,
    },
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SendChat { epoch: u64, request: ChatRequest },
    FetchDetails { key: DetailsKey, request: DetailsRequest },
    Prefetch(Vec<PrefetchItem>),
    LoadPoster(String),
    PersistSession(String),
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Vec<Effect> {
    match action {
        Action::Submit(text) => submit(app, &text),
        Action::ChatCompleted { epoch, result } => chat_completed(app, epoch, result),
        Action::ClearChat => {
            reset_conversation(app, CLEARED_GREETING);
            Vec::new()
        }
        Action::NewChat => {
            let previous = std::mem::take(&mut app.session_id);
            let mut id = new_session_id();
            while id == previous {
                id = new_session_id();
            }
            info!("New chat: session {} → {}", previous, id);
            app.session_id = id.clone();
            reset_conversation(app, NEW_CHAT_GREETING);
            app.highlight.clear();
            vec![Effect::PersistSession(id)]
        }
        Action::SelectMovie { movie, index, list } => {
            app.highlight.select(index, &list);
            // The explicit movie wins over whatever the index resolves to.
            request_details(app, &movie)
        }
        Action::NextHighlight => match app.highlight.next().cloned() {
            Some(movie) => request_details(app, &movie),
            None => Vec::new(),
        },
        Action::PrevHighlight => match app.highlight.prev().cloned() {
            Some(movie) => request_details(app, &movie),
            None => Vec::new(),
        },
        Action::ToggleHighlight => {
            app.highlight.toggle_visible();
            app.status_message = if app.highlight.visible {
                "Highlight panel shown".to_string()
            } else {
                "Highlight panel hidden".to_string()
            };
            Vec::new()
        }
        Action::DetailsLoaded { key, result } => {
            app.details_cache.finish_fetch(&key);
            store_details(app, key, result)
        }
        Action::PosterLoaded { url, result } => {
            match result {
                Ok(image) => app.posters.insert(image),
                Err(e) => {
                    warn!("Poster load failed for {}: {}", url, e);
                    app.posters.mark_failed(&url);
                }
            }
            Vec::new()
        }
        Action::Quit => vec![Effect::Quit],
    }
}

fn submit(app: &mut App, text: &str) -> Vec<Effect> {
    let text = text.trim();
    if text.is_empty() || app.is_loading {
        return Vec::new();
    }

    app.messages.push(Message::user(text));
    app.error = None;
    app.is_loading = true;

    vec![Effect::SendChat {
        epoch: app.epoch,
        request: ChatRequest {
            text: text.to_string(),
            session_id: app.session_id.clone(),
            rating_threshold: app.settings.rating_threshold,
            top_k: app.settings.top_k,
        },
    }]
}

fn chat_completed(
    app: &mut App,
    epoch: u64,
    result: Result<ChatResponse, ApiError>,
) -> Vec<Effect> {
    app.is_loading = false;

    if epoch != app.epoch {
        info!("Dropping chat response from epoch {} (now {})", epoch, app.epoch);
        return Vec::new();
    }

    match result {
        Ok(response) => {
            let message = Message::from_response(response);
            let movies = message.movies.clone();
            app.messages.push(message);

            if movies.is_empty() {
                return Vec::new();
            }
            app.highlight.reset_to(&movies);
            let mut effects = request_details(app, &movies[0]);
            effects.extend(prefetch(app, &movies));
            effects
        }
        Err(e) => {
            warn!("Chat request failed: {}", e);
            let text = e.user_message(&app.settings.service_url);
            app.messages.push(Message::error(text.clone()));
            app.error = Some(text);
            Vec::new()
        }
    }
}

fn reset_conversation(app: &mut App, greeting: &str) {
    app.messages = vec![Message::greeting(greeting)];
    app.error = None;
    app.epoch += 1;
}

/// Show `movie`'s details, from cache when possible, otherwise by fetching.
fn request_details(app: &mut App, movie: &Movie) -> Vec<Effect> {
    if movie.title.trim().is_empty() {
        // Nothing to look up; a pending fetch for the previous movie is now stale.
        app.highlight.details = None;
        app.highlight.loading = false;
        return Vec::new();
    }
    let key = DetailsKey::for_movie(movie);

    if let Some(details) = app.details_cache.get(&key).cloned() {
        debug!("Details cache hit: {}", key);
        app.highlight.loading = false;
        app.highlight.details = Some(details);
        return poster_effect(app).into_iter().collect();
    }

    app.highlight.details = None;
    app.highlight.loading = true;

    if app.details_cache.begin_fetch(&key) {
        vec![Effect::FetchDetails {
            key,
            request: details_request(movie),
        }]
    } else {
        // Already being fetched; the pending response will be applied on arrival.
        debug!("Details fetch already in flight: {}", key);
        Vec::new()
    }
}

/// Cache a details response and apply it if it is for the highlighted movie.
///
/// Records for other movies (prefetches, superseded selections) are cached
/// and get their poster preloaded, but never touch the display.
fn store_details(
    app: &mut App,
    key: DetailsKey,
    result: Result<Option<MovieDetails>, ApiError>,
) -> Vec<Effect> {
    let is_current = app.highlight.current_key().as_ref() == Some(&key);

    let details = match result {
        Ok(Some(details)) => details,
        Ok(None) => {
            debug!("No details available for {}", key);
            if is_current {
                app.highlight.details = None;
                app.highlight.loading = false;
            }
            return Vec::new();
        }
        Err(e) => {
            warn!("Details fetch failed for {}: {}", key, e);
            if is_current {
                app.highlight.details = None;
                app.highlight.loading = false;
            }
            return Vec::new();
        }
    };

    let poster_url = details.poster().map(str::to_string);
    if is_current {
        app.highlight.details = Some(details.clone());
        app.highlight.loading = false;
    } else {
        debug!("Caching details for {} without displaying", key);
    }
    app.details_cache.insert(key, details);

    match poster_url {
        Some(url) if app.posters.begin_load(&url) => vec![Effect::LoadPoster(url)],
        _ => Vec::new(),
    }
}

fn poster_effect(app: &mut App) -> Option<Effect> {
    let url = app.highlight.details.as_ref()?.poster()?.to_string();
    app.posters.begin_load(&url).then_some(Effect::LoadPoster(url))
}

fn prefetch(app: &mut App, movies: &[Movie]) -> Vec<Effect> {
    let items: Vec<PrefetchItem> = movies
        .iter()
        .take(PREFETCH_LIMIT)
        .filter(|m| !m.title.trim().is_empty())
        .filter_map(|m| {
            let key = DetailsKey::for_movie(m);
            app.details_cache
                .begin_fetch(&key)
                .then(|| PrefetchItem {
                    key,
                    request: details_request(m),
                })
        })
        .collect();

    if items.is_empty() {
        Vec::new()
    } else {
        debug!("Prefetching {} candidates", items.len());
        vec![Effect::Prefetch(items)]
    }
}
