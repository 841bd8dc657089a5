//! Recommendation backend client: wire types, errors, and the HTTP transport.

pub mod client;
pub mod error;
pub mod types;

pub use client::{HttpBackend, RecommendationBackend};
pub use error::ApiError;
pub use types::{
    ChatRequest, ChatResponse, DetailsRequest, DetailsResponse, GenreScore, Movie, MovieDetails,
    PosterImage, Year,
};
