//! # Highlight Navigator
//!
//! Tracks which movie from the latest recommendation list is shown in the
//! detail/poster panels. Index arithmetic wraps in both directions and is a
//! no-op on an empty list.

use crate::api::{Movie, MovieDetails};
use crate::core::cache::{DetailsKey, PosterStore};

#[derive(Debug)]
pub struct Highlight {
    pub movies: Vec<Movie>,
    pub index: usize,
    pub details: Option<MovieDetails>,
    pub loading: bool,
    pub visible: bool,
}

impl Default for Highlight {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlight {
    pub fn new() -> Self {
        Self {
            movies: Vec::new(),
            index: 0,
            details: None,
            loading: false,
            visible: true,
        }
    }

    pub fn current(&self) -> Option<&Movie> {
        self.movies.get(self.index)
    }

    pub fn current_key(&self) -> Option<DetailsKey> {
        self.current().map(DetailsKey::for_movie)
    }

    /// Replace the list (if `list` is non-empty) and point at `index`.
    ///
    /// An out-of-range index is clamped to the last movie.
    pub fn select(&mut self, index: usize, list: &[Movie]) {
        if !list.is_empty() {
            self.movies = list.to_vec();
        }
        self.index = index.min(self.movies.len().saturating_sub(1));
        self.visible = true;
    }

    /// Start a fresh list at its first movie.
    pub fn reset_to(&mut self, movies: &[Movie]) {
        self.movies = movies.to_vec();
        self.index = 0;
    }

    pub fn next(&mut self) -> Option<&Movie> {
        let len = self.movies.len();
        if len == 0 {
            return None;
        }
        self.index = (self.index + 1) % len;
        self.current()
    }

    pub fn prev(&mut self) -> Option<&Movie> {
        let len = self.movies.len();
        if len == 0 {
            return None;
        }
        self.index = (self.index + len - 1) % len;
        self.current()
    }

    pub fn toggle_visible(&mut self) {
        self.visible = !self.visible;
    }

    pub fn clear(&mut self) {
        self.movies.clear();
        self.index = 0;
        self.details = None;
        self.loading = false;
    }

    /// Whether the side panels should be shown at all.
    pub fn has_content(&self) -> bool {
        !self.movies.is_empty() || self.details.is_some()
    }

    /// Poster URL present AND its image has been downloaded and decoded.
    pub fn poster_ready(&self, posters: &PosterStore) -> bool {
        self.details
            .as_ref()
            .and_then(MovieDetails::poster)
            .is_some_and(|url| posters.is_ready(url))
    }
}
