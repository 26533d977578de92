//! Place Explorer: browse hotels, restaurants and landmarks around a map viewport
//!
//! The pipeline runs one way: viewport settles → debounce → places search →
//! place list → markers. [`explorer::PlaceExplorer`] holds the state; the
//! binary wires it to an iced map canvas.

pub mod config;
pub mod debounce;
pub mod error;
pub mod explorer;
pub mod filters;
pub mod geo;
pub mod markers;
pub mod places;

pub use config::ExplorerConfig;
pub use error::{ConfigError, PlacesError};
pub use explorer::{PlaceExplorer, RequestSeq, SearchAction};
pub use places::{Place, PlacesClient, SearchIntent};
