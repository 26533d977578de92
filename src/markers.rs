//! Projection of the place list into map markers

use crate::geo::LatLng;
use crate::places::Place;

pub const UNNAMED_PLACE: &str = "Unnamed Place";
pub const LOADING_TEXT: &str = "Loading places...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerIcon {
    Hotel,
    Restaurant,
    Landmark,
}

impl MarkerIcon {
    /// Accommodation wins over restaurant; anything else is a landmark
    pub fn for_categories(categories: &[String]) -> Self {
        if categories.iter().any(|c| c.contains("accommodation")) {
            MarkerIcon::Hotel
        } else if categories.iter().any(|c| c.contains("restaurant")) {
            MarkerIcon::Restaurant
        } else {
            MarkerIcon::Landmark
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            MarkerIcon::Hotel => "🏨",
            MarkerIcon::Restaurant => "🍽️",
            MarkerIcon::Landmark => "🏛️",
        }
    }

    /// Accent color as 0xRRGGBB
    pub fn accent(&self) -> u32 {
        match self {
            MarkerIcon::Hotel => 0xff4b4b,
            MarkerIcon::Restaurant => 0xffa500,
            MarkerIcon::Landmark => 0x4488ff,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub title: String,
    /// Primary category, e.g. `tourism › attraction`
    pub breadcrumb: Option<String>,
    pub address: Option<String>,
}

impl Popup {
    pub fn for_place(place: &Place) -> Self {
        Self {
            title: place
                .name
                .clone()
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| UNNAMED_PLACE.to_string()),
            breadcrumb: place.categories.first().map(|c| breadcrumb(c)),
            address: place.formatted.clone().filter(|a| !a.is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// The place's `place_id`
    pub key: String,
    pub position: LatLng,
    pub icon: MarkerIcon,
    pub popup: Popup,
}

pub fn breadcrumb(category: &str) -> String {
    category.replace('.', " › ")
}

pub fn marker_for(place: &Place) -> Marker {
    Marker {
        key: place.place_id.clone(),
        position: place.position(),
        icon: MarkerIcon::for_categories(&place.categories),
        popup: Popup::for_place(place),
    }
}

/// One marker per place, in list order
pub fn render(places: &[Place]) -> Vec<Marker> {
    places.iter().map(marker_for).collect()
}

pub fn status_text(count: usize) -> String {
    format!("Showing {} place{}", count, if count == 1 { "" } else { "s" })
}
