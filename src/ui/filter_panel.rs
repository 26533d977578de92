//! Category toggles with a live place count

use iced::widget::text::Shaping;
use iced::widget::{checkbox, column, container, horizontal_rule, text, Column};
use iced::{Background, Border, Element, Length, Padding, Shadow, Vector};

use place_explorer::filters::{Category, SearchFilters};
use place_explorer::markers;

use super::theme::MapTheme;

/// Filter panel component
pub fn view<'a, Message: Clone + 'a>(
    filters: &SearchFilters,
    place_count: usize,
    on_toggle: impl Fn(Category) -> Message + 'a,
) -> Element<'a, Message> {
    let on_toggle = std::rc::Rc::new(on_toggle);

    let toggles = Category::ALL.into_iter().map(|category| -> Element<'a, Message> {
        let on_toggle = on_toggle.clone();
        checkbox(
            format!("{} {}", category.glyph(), category.label()),
            filters.is_enabled(category),
        )
        .on_toggle(move |_| on_toggle(category))
        .text_shaping(Shaping::Advanced)
        .size(18)
        .text_size(14)
        .spacing(8)
        .into()
    });

    let stats = container(
        text(markers::status_text(place_count))
            .size(13)
            .color(MapTheme::TEXT_MUTED),
    )
    .padding(Padding {
        top: 12.0,
        ..Padding::ZERO
    })
    .width(Length::Fill);

    container(
        column![
            text("Filter Places").size(16).color(MapTheme::TEXT),
            Column::with_children(toggles).spacing(8),
            horizontal_rule(1),
            stats,
        ]
        .spacing(10),
    )
    .padding(15)
    .width(220)
    .style(|_theme| container::Style {
        background: Some(Background::Color(MapTheme::PANEL)),
        border: Border::default().rounded(8),
        shadow: Shadow {
            color: MapTheme::SHADOW,
            offset: Vector::new(0.0, 2.0),
            blur_radius: 10.0,
        },
        ..Default::default()
    })
    .into()
}

/// Floating "Loading places..." badge
pub fn loading_badge<'a, Message: 'a>() -> Element<'a, Message> {
    container(
        text(markers::LOADING_TEXT)
            .size(14)
            .color(iced::Color::WHITE),
    )
    .padding(Padding::from([8.0, 15.0]))
    .style(|_theme| container::Style {
        background: Some(Background::Color(MapTheme::PRIMARY)),
        border: Border::default().rounded(4),
        shadow: Shadow {
            color: MapTheme::SHADOW,
            offset: Vector::new(0.0, 2.0),
            blur_radius: 8.0,
        },
        ..Default::default()
    })
    .into()
}
