//! Core application state and Iced Application implementation
//!
//! Map gestures and keys become "movement settled" events, which feed the
//! debounced search in [`PlaceExplorer`]. Fetches run as iced tasks on the
//! tokio executor and report back tagged with their request sequence.

use iced::alignment;
use iced::keyboard::{self, key::Named, Key};
use iced::widget::{canvas, column, container, stack};
use iced::{window, Element, Event, Length, Size, Subscription, Task, Theme};

use place_explorer::debounce::{Debouncer, Ticket};
use place_explorer::filters::Category;
use place_explorer::geo::Viewport;
use place_explorer::markers::Marker;
use place_explorer::{ExplorerConfig, Place, PlaceExplorer, PlacesClient, PlacesError, RequestSeq, SearchAction};

use crate::ui::{filter_panel, map_canvas::MapCanvas};

/// Pixels moved per arrow key press
const KEY_PAN_PX: f64 = 100.0;

pub const INITIAL_WINDOW: Size = Size::new(1100.0, 750.0);

// ============================================================================
// Application State
// ============================================================================

pub struct ExplorerApp {
    explorer: PlaceExplorer,
    client: PlacesClient,
    viewport: Viewport,
    /// Rendered from the current place list; rebuilt when it changes
    markers: Vec<Marker>,
    selected: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Message {
    /// Drag in progress, not settled yet
    MapPanned(f64, f64),
    MapZoomed(f64),
    MoveEnd,
    QuietPeriodElapsed(Ticket),
    PlacesLoaded(RequestSeq, Result<Vec<Place>, PlacesError>),
    ToggleFilter(Category),
    MarkerSelected(Option<String>),
    IcedEvent(Event),
}

impl ExplorerApp {
    pub fn new(config: ExplorerConfig, client: PlacesClient) -> (Self, Task<Message>) {
        let viewport = Viewport::new(
            config.initial_center,
            config.initial_zoom,
            INITIAL_WINDOW.width as f64,
            INITIAL_WINDOW.height as f64,
        );
        let app = Self {
            explorer: PlaceExplorer::new(config.quiet_period()),
            client,
            viewport,
            markers: Vec::new(),
            selected: None,
        };
        // First search without waiting for the user to pan
        (app, Task::done(Message::MoveEnd))
    }

    pub fn title(&self) -> String {
        String::from("Place Explorer")
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::MapPanned(dx, dy) => {
                self.viewport.pan_by(dx, dy);
                Task::none()
            }

            Message::MapZoomed(delta) => {
                let before = self.viewport.zoom;
                self.viewport.zoom_by(delta);
                if self.viewport.zoom == before {
                    return Task::none();
                }
                self.update(Message::MoveEnd)
            }

            Message::MoveEnd => {
                let ticket = self.explorer.viewport_settled();
                Task::perform(
                    Debouncer::wait(self.explorer.quiet_period(), ticket),
                    Message::QuietPeriodElapsed,
                )
            }

            Message::QuietPeriodElapsed(ticket) => {
                match self.explorer.quiet_period_elapsed(ticket, &self.viewport) {
                    SearchAction::Fetch { seq, intent } => {
                        let client = self.client.clone();
                        Task::perform(
                            async move { client.search(&intent).await },
                            move |result| Message::PlacesLoaded(seq, result),
                        )
                    }
                    SearchAction::Cleared => {
                        self.refresh_markers();
                        Task::none()
                    }
                    SearchAction::Superseded => Task::none(),
                }
            }

            Message::PlacesLoaded(seq, result) => {
                if self.explorer.apply_response(seq, result) {
                    self.refresh_markers();
                }
                Task::none()
            }

            Message::ToggleFilter(category) => {
                self.explorer.toggle_filter(category);
                Task::none()
            }

            Message::MarkerSelected(key) => {
                self.selected = key;
                Task::none()
            }

            Message::IcedEvent(event) => match event {
                Event::Keyboard(keyboard::Event::KeyPressed { key, .. }) => self.handle_key(key),
                Event::Window(window::Event::Resized(size)) => {
                    // Not a movement: the new size applies to the next search
                    self.viewport.resize(size.width as f64, size.height as f64);
                    Task::none()
                }
                _ => Task::none(),
            },
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let map = canvas(MapCanvas {
            viewport: &self.viewport,
            markers: &self.markers,
            selected: self.selected.as_deref(),
        })
        .width(Length::Fill)
        .height(Length::Fill);

        let mut overlay = column![filter_panel::view(
            self.explorer.filters(),
            self.explorer.places().len(),
            Message::ToggleFilter,
        )]
        .spacing(10)
        .align_x(alignment::Horizontal::Right);

        if self.explorer.is_loading() {
            overlay = overlay.push(filter_panel::loading_badge());
        }

        stack![
            map,
            container(overlay)
                .width(Length::Fill)
                .align_x(alignment::Horizontal::Right)
                .padding(10),
        ]
        .into()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        iced::event::listen().map(Message::IcedEvent)
    }

    pub fn theme(&self) -> Theme {
        Theme::Light
    }

    // ========================================================================
    // Business Logic
    // ========================================================================

    fn handle_key(&mut self, key: Key) -> Task<Message> {
        match key.as_ref() {
            Key::Named(Named::ArrowLeft) => self.viewport.pan_by(-KEY_PAN_PX, 0.0),
            Key::Named(Named::ArrowRight) => self.viewport.pan_by(KEY_PAN_PX, 0.0),
            Key::Named(Named::ArrowUp) => self.viewport.pan_by(0.0, -KEY_PAN_PX),
            Key::Named(Named::ArrowDown) => self.viewport.pan_by(0.0, KEY_PAN_PX),
            Key::Named(Named::Escape) => {
                self.selected = None;
                return Task::none();
            }
            Key::Character("+") | Key::Character("=") => return self.update(Message::MapZoomed(1.0)),
            Key::Character("-") => return self.update(Message::MapZoomed(-1.0)),
            _ => return Task::none(),
        }
        self.update(Message::MoveEnd)
    }

    fn refresh_markers(&mut self) {
        self.markers = self.explorer.markers();
        if let Some(key) = &self.selected {
            if !self.markers.iter().any(|m| &m.key == key) {
                self.selected = None;
            }
        }
    }
}
