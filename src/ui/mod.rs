//! Widgets for the explorer window

pub mod filter_panel;
pub mod map_canvas;
pub mod theme;
