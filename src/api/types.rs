//! Wire types for the recommendation backend.
//!
//! Response payloads are opaque: every field is optional on the wire and
//! missing values fall back to defaults rather than failing the request.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Release year as the backend sends it. Usually a number, sometimes a string.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum Year {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Year::Numeric(y) => write!(f, "{y}"),
            Year::Text(s) => f.write_str(s.trim()),
        }
    }
}

impl From<i64> for Year {
    fn from(y: i64) -> Self {
        Year::Numeric(y)
    }
}

/// A recommended movie as returned by `/chat`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Movie {
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "releaseYear", skip_serializing_if = "Option::is_none")]
    pub year: Option<Year>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
}

impl Movie {
    pub fn new(title: impl Into<String>, year: Option<Year>) -> Self {
        Self {
            title: title.into(),
            year,
            genre: None,
        }
    }

    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "Untitled Movie"
        } else {
            &self.title
        }
    }

    pub fn display_genre(&self) -> &str {
        match self.genre.as_deref() {
            Some(g) if !g.trim().is_empty() => g,
            _ => "Unknown Genre",
        }
    }

    /// Year as shown in the UI; empty when unknown.
    pub fn display_year(&self) -> String {
        self.year.as_ref().map(|y| y.to_string()).unwrap_or_default()
    }
}

/// Relevance tag between a detected emotion and a genre class.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct GenreScore {
    #[serde(default)]
    pub genre_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl GenreScore {
    /// Human label for an ontology URI: `emo:FeelGood_genre` → `Feel Good`.
    pub fn label(&self) -> String {
        let Some(uri) = self.genre_uri.as_deref() else {
            return "Genre".to_string();
        };
        let stripped = uri.replacen("emo:", "", 1).replacen("_genre", "", 1);

        let mut label = String::with_capacity(stripped.len() + 4);
        for c in stripped.chars() {
            if c.is_ascii_uppercase() {
                label.push(' ');
            }
            label.push(c);
        }

        let label = label.trim();
        if label.is_empty() {
            "Genre".to_string()
        } else {
            label.to_string()
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub text: String,
    pub session_id: String,
    pub rating_threshold: f64,
    pub top_k: u32,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ChatResponse {
    #[serde(default)]
    pub reply: Option<String>,
    #[serde(default)]
    pub movies: Option<Vec<Movie>>,
    #[serde(default)]
    pub genre_scores: Option<Vec<GenreScore>>,
    #[serde(default)]
    pub ml_scores: Option<BTreeMap<String, f64>>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DetailsRequest {
    pub title: String,
    pub year: Option<Year>,
}

/// Supplementary metadata for one movie.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct MovieDetails {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: Option<Year>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub cast: Vec<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub tmdb_id: Option<i64>,
}

impl MovieDetails {
    pub fn tmdb_url(&self) -> Option<String> {
        self.tmdb_id
            .map(|id| format!("https://www.themoviedb.org/movie/{id}"))
    }

    /// Poster URL if one is present and non-blank.
    pub fn poster(&self) -> Option<&str> {
        self.poster_url.as_deref().filter(|u| !u.trim().is_empty())
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct DetailsResponse {
    #[serde(default)]
    pub details: Option<MovieDetails>,
}

/// A downloaded poster held in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct PosterImage {
    pub url: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl PosterImage {
    /// True when the payload looks like an image we could hand to a decoder.
    pub fn is_decodable(&self) -> bool {
        if self.bytes.is_empty() {
            return false;
        }
        if self
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("image/"))
        {
            return true;
        }
        has_image_signature(&self.bytes)
    }

    pub fn size_kib(&self) -> usize {
        self.bytes.len().div_ceil(1024)
    }
}

fn has_image_signature(bytes: &[u8]) -> bool {
    const SIGNATURES: &[&[u8]] = &[
        b"\x89PNG\r\n\x1a\n",
        b"\xFF\xD8\xFF",
        b"GIF87a",
        b"GIF89a",
        b"RIFF",
    ];
    SIGNATURES.iter().any(|sig| bytes.starts_with(sig))
}
