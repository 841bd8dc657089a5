//! # Chat Messages
//!
//! One entry in the conversation. Messages are immutable once appended;
//! the list only grows, except for a full reset on clear/new chat.

use std::collections::BTreeMap;

use chrono::{DateTime, Local};

use crate::api::{ChatResponse, GenreScore, Movie};

pub const WELCOME_GREETING: &str = "Hi! I'm your emotion-aware movie recommender. Tell me how you're feeling or what kind of movie you want, and I'll suggest some great films! 🎬";
pub const CLEARED_GREETING: &str = "Chat cleared! How can I help you find a movie today? 🎬";
pub const NEW_CHAT_GREETING: &str = "New chat started. How are you feeling today? 🎬";
const EMPTY_REPLY_FALLBACK: &str = "I couldn't process that request. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Local>,
    pub movies: Vec<Movie>,
    pub genre_scores: Vec<GenreScore>,
    pub ml_scores: BTreeMap<String, f64>,
    pub is_error: bool,
}

impl Message {
    fn new(sender: Sender, text: String) -> Self {
        Self {
            sender,
            text,
            timestamp: Local::now(),
            movies: Vec::new(),
            genre_scores: Vec::new(),
            ml_scores: BTreeMap::new(),
            is_error: false,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text.into())
    }

    pub fn greeting(text: &str) -> Self {
        Self::new(Sender::Bot, text.to_string())
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::new(Sender::Bot, text.into())
        }
    }

    /// Build the bot bubble for a successful `/chat` response.
    pub fn from_response(response: ChatResponse) -> Self {
        let text = response
            .reply
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| EMPTY_REPLY_FALLBACK.to_string());
        Self {
            movies: response.movies.unwrap_or_default(),
            genre_scores: response.genre_scores.unwrap_or_default(),
            ml_scores: response.ml_scores.unwrap_or_default(),
            ..Self::new(Sender::Bot, text)
        }
    }

    pub fn is_bot(&self) -> bool {
        self.sender == Sender::Bot
    }

    /// Bot reply that found no movies but still detected genre preferences.
    pub fn has_genres_without_movies(&self) -> bool {
        self.is_bot() && !self.is_error && self.movies.is_empty() && !self.genre_scores.is_empty()
    }

    /// Highest-scoring emotions, strongest first.
    pub fn dominant_emotions(&self, k: usize) -> Vec<(&str, f64)> {
        let mut scores: Vec<(&str, f64)> = self
            .ml_scores
            .iter()
            .map(|(emotion, score)| (emotion.as_str(), *score))
            .collect();
        scores.sort_by(|a, b| b.1.total_cmp(&a.1));
        scores.truncate(k);
        scores
    }

    /// `HH:MM` in local time.
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}
