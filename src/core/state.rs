//! # Application State
//!
//! Core business state for Moodreel. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── messages: Vec<Message>        // conversation, insertion order
//! ├── session_id: String            // opaque backend correlation token
//! ├── is_loading: bool              // a /chat request is in flight
//! ├── error: Option<String>         // banner text from the last failure
//! ├── epoch: u64                    // bumped by clear/new chat
//! ├── highlight: Highlight          // highlighted movie + its details
//! ├── details_cache: DetailsCache   // title|year → MovieDetails
//! ├── posters: PosterStore          // url → downloaded poster
//! └── settings: ChatSettings        // threshold, top_k, service url
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! This keeps things predictable, so no surprise mutations.

use crate::core::cache::{DetailsCache, PosterStore};
use crate::core::config::ResolvedConfig;
use crate::core::highlight::Highlight;
use crate::core::message::{Message, WELCOME_GREETING};

/// Parameters sent with every recommendation request.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSettings {
    pub service_url: String,
    pub rating_threshold: f64,
    pub top_k: u32,
}

impl ChatSettings {
    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self {
            service_url: config.base_url.clone(),
            rating_threshold: config.rating_threshold,
            top_k: config.top_k,
        }
    }
}

pub struct App {
    pub messages: Vec<Message>,
    pub session_id: String,
    pub is_loading: bool,
    pub error: Option<String>,
    pub status_message: String,
    /// Conversation generation; responses issued under an older epoch are dropped.
    pub epoch: u64,
    pub highlight: Highlight,
    pub details_cache: DetailsCache,
    pub posters: PosterStore,
    pub settings: ChatSettings,
}

impl App {
    pub fn new(session_id: String, settings: ChatSettings) -> Self {
        Self {
            messages: vec![Message::greeting(WELCOME_GREETING)],
            session_id,
            is_loading: false,
            error: None,
            status_message: String::new(),
            epoch: 0,
            highlight: Highlight::new(),
            details_cache: DetailsCache::new(),
            posters: PosterStore::new(),
            settings,
        }
    }

    pub fn from_config(session_id: String, config: &ResolvedConfig) -> Self {
        Self::new(session_id, ChatSettings::from_config(config))
    }

    pub fn poster_ready(&self) -> bool {
        self.highlight.poster_ready(&self.posters)
    }

    /// Show the info/highlight panels once there is anything to show.
    pub fn show_panels(&self) -> bool {
        self.highlight.has_content()
    }
}
