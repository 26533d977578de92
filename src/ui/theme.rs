//! Theme configuration

use iced::Color;
use place_explorer::markers::MarkerIcon;

/// Light map theme colors
pub struct MapTheme;

impl MapTheme {
    pub const LAND: Color = Color::from_rgb(0.93, 0.92, 0.88);
    pub const GRID: Color = Color::from_rgb(0.85, 0.84, 0.80);
    pub const PANEL: Color = Color::WHITE;
    pub const PRIMARY: Color = Color::from_rgb(0.13, 0.59, 0.95);
    pub const TEXT: Color = Color::from_rgb(0.2, 0.2, 0.2);
    pub const TEXT_MUTED: Color = Color::from_rgb(0.4, 0.4, 0.4);
    pub const TEXT_FAINT: Color = Color::from_rgb(0.6, 0.6, 0.6);
    pub const SHADOW: Color = Color::from_rgba(0.0, 0.0, 0.0, 0.2);
}

pub fn accent(icon: MarkerIcon) -> Color {
    let rgb = icon.accent();
    Color::from_rgb8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}
