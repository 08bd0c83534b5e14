//! Film records produced by the crawl
//!
//! A [`FilmRecord`] is assembled once per listing item and never modified
//! afterwards. Missing fields are filled with fixed placeholder strings or
//! empty sequences so that every key is always present in the result file.

mod service;

pub use service::StreamService;

use serde::{Deserialize, Serialize};

/// Title used when the listing item carries no image `alt` text
pub const UNKNOWN_TITLE: &str = "Titre inconnu";

/// Release date used when the detail page has none
pub const NO_RELEASE_DATE: &str = "Date non disponible";

/// Description used when the detail page has none
pub const NO_DESCRIPTION: &str = "Description non disponible";

/// A playback source for a film on an allow-listed streaming service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamLink {
    pub service: StreamService,
    pub url: String,
}

/// Metadata extracted from a film's detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilmDetails {
    /// Genres in document order
    pub genres: Vec<String>,

    pub release_date: String,

    /// Actors in document order
    pub actors: Vec<String>,

    pub description: String,
}

impl Default for FilmDetails {
    fn default() -> Self {
        Self {
            genres: Vec::new(),
            release_date: NO_RELEASE_DATE.to_string(),
            actors: Vec::new(),
            description: NO_DESCRIPTION.to_string(),
        }
    }
}

/// One film as written to the result file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilmRecord {
    pub title: String,
    pub image_url: String,
    pub genres: Vec<String>,
    pub release_date: String,
    pub actors: Vec<String>,
    pub description: String,
    pub links: Vec<StreamLink>,
}

impl FilmRecord {
    /// Combines listing-page fields with detail-page metadata and stream links
    pub fn new(
        title: String,
        image_url: String,
        details: FilmDetails,
        links: Vec<StreamLink>,
    ) -> Self {
        Self {
            title,
            image_url,
            genres: details.genres,
            release_date: details.release_date,
            actors: details.actors,
            description: details.description,
            links,
        }
    }
}
