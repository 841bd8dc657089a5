//! # Details & Poster Caches
//!
//! Page-lifetime memoization for `/movie/details` lookups and downloaded
//! posters. Entries are never evicted. Both caches also track which keys
//! have a request in flight so the same record is never fetched twice
//! concurrently.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::api::{DetailsRequest, Movie, MovieDetails, PosterImage};

/// Composite cache key: `title|year`, year empty when unknown.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DetailsKey {
    pub title: String,
    pub year: String,
}

impl DetailsKey {
    pub fn for_movie(movie: &Movie) -> Self {
        Self {
            title: movie.title.clone(),
            year: movie.display_year(),
        }
    }
}

impl fmt::Display for DetailsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.title, self.year)
    }
}

/// Request body for a movie's details lookup.
pub fn details_request(movie: &Movie) -> DetailsRequest {
    DetailsRequest {
        title: movie.title.clone(),
        year: movie.year.clone(),
    }
}

#[derive(Debug, Default)]
pub struct DetailsCache {
    entries: HashMap<DetailsKey, MovieDetails>,
    in_flight: HashSet<DetailsKey>,
}

impl DetailsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &DetailsKey) -> Option<&MovieDetails> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &DetailsKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Store a record. A later write for the same key overwrites the earlier one.
    pub fn insert(&mut self, key: DetailsKey, details: MovieDetails) {
        self.entries.insert(key, details);
    }

    pub fn is_in_flight(&self, key: &DetailsKey) -> bool {
        self.in_flight.contains(key)
    }

    /// Mark `key` as being fetched. Returns false if a fetch is already
    /// running or the record is cached, in which case no request is needed.
    pub fn begin_fetch(&mut self, key: &DetailsKey) -> bool {
        if self.contains(key) {
            return false;
        }
        self.in_flight.insert(key.clone())
    }

    pub fn finish_fetch(&mut self, key: &DetailsKey) {
        self.in_flight.remove(key);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where a poster download stands, as far as the panel is concerned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PosterStatus<'a> {
    Ready(&'a PosterImage),
    Loading,
    /// Download failed or the bytes are not an image
    Unavailable,
}

/// Preloaded posters keyed by URL.
#[derive(Debug, Default)]
pub struct PosterStore {
    images: HashMap<String, PosterImage>,
    in_flight: HashSet<String>,
    failed: HashSet<String>,
}

impl PosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Option<&PosterImage> {
        self.images.get(url)
    }

    /// A poster counts as ready only once its bytes decode as an image.
    pub fn is_ready(&self, url: &str) -> bool {
        self.images.get(url).is_some_and(PosterImage::is_decodable)
    }

    pub fn status(&self, url: &str) -> PosterStatus<'_> {
        match self.images.get(url) {
            Some(image) if image.is_decodable() => PosterStatus::Ready(image),
            Some(_) => PosterStatus::Unavailable,
            None if self.failed.contains(url) => PosterStatus::Unavailable,
            None => PosterStatus::Loading,
        }
    }

    pub fn is_failed(&self, url: &str) -> bool {
        self.failed.contains(url)
    }

    pub fn insert(&mut self, image: PosterImage) {
        self.in_flight.remove(&image.url);
        self.failed.remove(&image.url);
        self.images.insert(image.url.clone(), image);
    }

    /// Claim `url` for download. A failed download may be claimed again.
    pub fn begin_load(&mut self, url: &str) -> bool {
        if self.images.contains_key(url) || !self.in_flight.insert(url.to_string()) {
            return false;
        }
        self.failed.remove(url);
        true
    }

    pub fn mark_failed(&mut self, url: &str) {
        self.in_flight.remove(url);
        self.failed.insert(url.to_string());
    }
}
