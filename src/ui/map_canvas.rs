//! Map canvas: plots the viewport, its markers and the open popup
//!
//! Gestures map onto app messages: dragging pans, releasing a drag or
//! scrolling the wheel settles the map, and a click without movement selects
//! the marker under the cursor (or clears the selection).

use iced::alignment;
use iced::mouse;
use iced::widget::canvas::{self, event, Frame, Path, Stroke};
use iced::widget::text::Shaping;
use iced::{Color, Pixels, Point, Rectangle, Renderer, Size, Theme};

use place_explorer::geo::{project, Viewport};
use place_explorer::markers::Marker;

use super::theme::{accent, MapTheme};
use crate::app::Message;

const MARKER_RADIUS: f32 = 15.0;
const TILE_PX: f64 = 256.0;
/// Cursor travel below this still counts as a click
const CLICK_SLOP: f32 = 3.0;

pub struct MapCanvas<'a> {
    pub viewport: &'a Viewport,
    pub markers: &'a [Marker],
    pub selected: Option<&'a str>,
}

#[derive(Debug, Default)]
pub struct Gesture {
    pressed_at: Option<Point>,
    last: Option<Point>,
    dragging: bool,
}

impl MapCanvas<'_> {
    /// Viewport sized to the canvas as actually laid out
    fn fitted(&self, bounds: Rectangle) -> Viewport {
        let mut viewport = *self.viewport;
        viewport.resize(bounds.width as f64, bounds.height as f64);
        viewport
    }

    fn screen_position(viewport: &Viewport, marker: &Marker) -> Point {
        let (x, y) = viewport.to_screen(&marker.position);
        Point::new(x as f32, y as f32)
    }

    /// Topmost marker under `point`; later markers are drawn on top
    fn hit(&self, viewport: &Viewport, point: Point) -> Option<&Marker> {
        self.markers
            .iter()
            .rev()
            .find(|m| Self::screen_position(viewport, m).distance(point) <= MARKER_RADIUS)
    }

    fn draw_grid(&self, frame: &mut Frame, viewport: &Viewport) {
        let c = project(&viewport.center, viewport.zoom);
        let left = c.x - viewport.width / 2.0;
        let top = c.y - viewport.height / 2.0;
        let stroke = Stroke::default().with_color(MapTheme::GRID).with_width(1.0);

        let mut x = (left / TILE_PX).ceil() * TILE_PX;
        while x < left + viewport.width {
            let sx = (x - left) as f32;
            frame.stroke(
                &Path::line(Point::new(sx, 0.0), Point::new(sx, viewport.height as f32)),
                stroke,
            );
            x += TILE_PX;
        }
        let mut y = (top / TILE_PX).ceil() * TILE_PX;
        while y < top + viewport.height {
            let sy = (y - top) as f32;
            frame.stroke(
                &Path::line(Point::new(0.0, sy), Point::new(viewport.width as f32, sy)),
                stroke,
            );
            y += TILE_PX;
        }
    }

    fn draw_marker(frame: &mut Frame, at: Point, marker: &Marker, selected: bool) {
        let dot = Path::circle(at, MARKER_RADIUS);
        frame.fill(&dot, Color::WHITE);
        frame.stroke(
            &dot,
            Stroke::default()
                .with_color(accent(marker.icon))
                .with_width(if selected { 4.0 } else { 2.0 }),
        );
        frame.fill_text(canvas::Text {
            content: marker.icon.glyph().to_string(),
            position: at,
            color: MapTheme::TEXT,
            size: Pixels(18.0),
            horizontal_alignment: alignment::Horizontal::Center,
            vertical_alignment: alignment::Vertical::Center,
            shaping: Shaping::Advanced,
            ..canvas::Text::default()
        });
    }

    fn draw_popup(frame: &mut Frame, anchor: Point, marker: &Marker, bounds: Size) {
        let popup = &marker.popup;
        let mut lines: Vec<(String, f32, Color)> = vec![(popup.title.clone(), 14.0, MapTheme::TEXT)];
        if let Some(breadcrumb) = &popup.breadcrumb {
            lines.push((breadcrumb.clone(), 12.0, MapTheme::TEXT_MUTED));
        }
        if let Some(address) = &popup.address {
            lines.push((format!("📍 {}", address), 11.0, MapTheme::TEXT_FAINT));
        }

        let widest = lines
            .iter()
            .map(|(s, size, _)| s.chars().count() as f32 * size * 0.55)
            .fold(0.0, f32::max);
        let width = (widest + 20.0).clamp(120.0, 320.0);
        let height = lines.iter().map(|(_, size, _)| size + 6.0).sum::<f32>() + 14.0;

        let x = (anchor.x - width / 2.0).clamp(4.0, (bounds.width - width - 4.0).max(4.0));
        let y = (anchor.y - MARKER_RADIUS - 10.0 - height).max(4.0);

        let shadow = Path::rectangle(Point::new(x + 1.0, y + 2.0), Size::new(width, height));
        frame.fill(&shadow, MapTheme::SHADOW);
        let card = Path::rectangle(Point::new(x, y), Size::new(width, height));
        frame.fill(&card, Color::WHITE);

        let mut cursor_y = y + 10.0;
        for (content, size, color) in lines {
            frame.fill_text(canvas::Text {
                content,
                position: Point::new(x + 10.0, cursor_y),
                color,
                size: Pixels(size),
                shaping: Shaping::Advanced,
                ..canvas::Text::default()
            });
            cursor_y += size + 6.0;
        }
    }
}

impl canvas::Program<Message> for MapCanvas<'_> {
    type State = Gesture;

    fn update(
        &self,
        state: &mut Gesture,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> (event::Status, Option<Message>) {
        let position = cursor.position_in(bounds);

        match event {
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let Some(position) = position else {
                    return (event::Status::Ignored, None);
                };
                state.pressed_at = Some(position);
                state.last = Some(position);
                state.dragging = false;
                (event::Status::Captured, None)
            }
            canvas::Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                let (Some(last), Some(position)) = (state.last, position) else {
                    return (event::Status::Ignored, None);
                };
                if !state.dragging {
                    let travel = state.pressed_at.map_or(0.0, |p| p.distance(position));
                    if travel < CLICK_SLOP {
                        return (event::Status::Captured, None);
                    }
                    state.dragging = true;
                }
                state.last = Some(position);
                let (dx, dy) = (last.x - position.x, last.y - position.y);
                (
                    event::Status::Captured,
                    Some(Message::MapPanned(dx as f64, dy as f64)),
                )
            }
            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                let pressed = state.pressed_at.take();
                state.last = None;
                if std::mem::take(&mut state.dragging) {
                    return (event::Status::Captured, Some(Message::MoveEnd));
                }
                match (pressed, position) {
                    (Some(_), Some(position)) => {
                        let viewport = self.fitted(bounds);
                        let key = self.hit(&viewport, position).map(|m| m.key.clone());
                        (event::Status::Captured, Some(Message::MarkerSelected(key)))
                    }
                    _ => (event::Status::Ignored, None),
                }
            }
            canvas::Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                if position.is_none() {
                    return (event::Status::Ignored, None);
                }
                let y = match delta {
                    mouse::ScrollDelta::Lines { y, .. } => y,
                    mouse::ScrollDelta::Pixels { y, .. } => y / 50.0,
                };
                if y == 0.0 {
                    return (event::Status::Captured, None);
                }
                (
                    event::Status::Captured,
                    Some(Message::MapZoomed(y.signum() as f64)),
                )
            }
            _ => (event::Status::Ignored, None),
        }
    }

    fn draw(
        &self,
        _state: &Gesture,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let viewport = self.fitted(bounds);
        let mut frame = Frame::new(renderer, bounds.size());

        frame.fill_rectangle(Point::ORIGIN, bounds.size(), MapTheme::LAND);
        self.draw_grid(&mut frame, &viewport);

        let mut popup = None;
        for marker in self.markers {
            let at = Self::screen_position(&viewport, marker);
            let selected = self.selected == Some(marker.key.as_str());
            Self::draw_marker(&mut frame, at, marker, selected);
            if selected {
                popup = Some((at, marker));
            }
        }
        if let Some((at, marker)) = popup {
            Self::draw_popup(&mut frame, at, marker, bounds.size());
        }

        frame.fill_text(canvas::Text {
            content: format!(
                "{:.5}, {:.5} · z{:.0}",
                viewport.center.lat, viewport.center.lon, viewport.zoom
            ),
            position: Point::new(8.0, bounds.height - 8.0),
            color: MapTheme::TEXT_MUTED,
            size: Pixels(12.0),
            vertical_alignment: alignment::Vertical::Bottom,
            ..canvas::Text::default()
        });

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        state: &Gesture,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if state.dragging {
            return mouse::Interaction::Grabbing;
        }
        match cursor.position_in(bounds) {
            Some(position) if self.hit(&self.fitted(bounds), position).is_some() => {
                mouse::Interaction::Pointer
            }
            Some(_) => mouse::Interaction::Grab,
            None => mouse::Interaction::default(),
        }
    }
}
