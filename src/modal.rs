use std::fmt::Write;

use crate::dataset::{CountryRecord, TripEntry};
use crate::surface::escape;

pub const HOME_MESSAGE: &str = "This is where I'm from!";
pub const NO_TRIPS_MESSAGE: &str = "No specific trips recorded.";
pub const HOME_BADGE: &str = "Home";
pub const CITY_SEPARATOR: &str = " → ";

#[derive(Debug, Clone, PartialEq)]
pub enum ModalBody {
    Trips(Vec<TripEntry>),
    HomeMessage,
    NoTrips,
}

/// What the overlay shows for one country.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalContent {
    pub code: String,
    pub title: String,
    pub home_badge: bool,
    pub body: ModalBody,
}

impl ModalContent {
    pub fn for_country(code: &str, record: &CountryRecord) -> Self {
        let body = if !record.trips.is_empty() {
            ModalBody::Trips(record.trips.clone())
        } else if record.home {
            ModalBody::HomeMessage
        } else {
            ModalBody::NoTrips
        };
        Self {
            code: code.to_string(),
            title: record.name.clone(),
            home_badge: record.home,
            body,
        }
    }

    /// Title and trip-list markup for the overlay.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        let _ = write!(out, r#"<h2 class="modal-title">{}"#, escape(&self.title));
        if self.home_badge {
            let _ = write!(out, r#" <span class="home-badge">{HOME_BADGE}</span>"#);
        }
        out.push_str("</h2>\n<div class=\"modal-trips\">\n");

        match &self.body {
            ModalBody::Trips(trips) => {
                for trip in trips {
                    out.push_str("<div class=\"trip\">");
                    let _ = write!(out, r#"<div class="trip-dates">{}</div>"#, escape(&trip.dates));
                    if let Some(cities) = trip.cities.as_ref().filter(|c| !c.is_empty()) {
                        let _ = write!(
                            out,
                            r#"<div class="trip-cities">{}</div>"#,
                            escape(&cities.join(CITY_SEPARATOR))
                        );
                    }
                    if let Some(notes) = trip.notes.as_ref().filter(|n| !n.is_empty()) {
                        let _ = write!(out, r#"<div class="trip-notes">{}</div>"#, escape(notes));
                    }
                    out.push_str("</div>\n");
                }
            }
            ModalBody::HomeMessage => {
                let _ = writeln!(out, r#"<p class="home-message">{}</p>"#, escape(HOME_MESSAGE));
            }
            ModalBody::NoTrips => {
                let _ = writeln!(out, r#"<p class="no-trips">{NO_TRIPS_MESSAGE}</p>"#);
            }
        }
        out.push_str("</div>\n");
        out
    }
}

/// Background scrolling is disabled while the modal is up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollLock {
    locked: bool,
}

impl ScrollLock {
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    fn lock(&mut self) {
        self.locked = true;
    }

    fn unlock(&mut self) {
        self.locked = false;
    }
}

/// Owns the single modal: at most one open, reopening replaces content.
#[derive(Debug, Clone, Default)]
pub struct ModalPresenter {
    content: Option<ModalContent>,
    scroll: ScrollLock,
}

impl ModalPresenter {
    pub fn open(&mut self, code: &str, record: &CountryRecord) -> &ModalContent {
        self.scroll.lock();
        self.content.insert(ModalContent::for_country(code, record))
    }

    pub fn close(&mut self) {
        if self.content.take().is_some() {
            tracing::debug!("modal closed");
        }
        // Always restore scrolling, whatever path closed the modal
        self.scroll.unlock();
    }

    pub fn is_open(&self) -> bool {
        self.content.is_some()
    }

    pub fn content(&self) -> Option<&ModalContent> {
        self.content.as_ref()
    }

    pub fn selected(&self) -> Option<&str> {
        self.content.as_ref().map(|c| c.code.as_str())
    }

    pub fn scroll_locked(&self) -> bool {
        self.scroll.is_locked()
    }
}

/// Hover label shown next to the pointer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tooltip {
    pub visible: bool,
    pub label: String,
    pub home: bool,
    pub x: f64,
    pub y: f64,
}

impl Tooltip {
    pub const OFFSET_X: f64 = 10.0;
    pub const OFFSET_Y: f64 = -28.0;

    pub fn show(&mut self, label: &str, home: bool, pointer: (f64, f64)) {
        self.visible = true;
        self.label = label.to_string();
        self.home = home;
        self.move_to(pointer);
    }

    pub fn move_to(&mut self, (px, py): (f64, f64)) {
        self.x = px + Self::OFFSET_X;
        self.y = py + Self::OFFSET_Y;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn to_html(&self) -> String {
        let class = if self.home { "map-tooltip home" } else { "map-tooltip" };
        let display = if self.visible { "block" } else { "none" };
        format!(
            r#"<div class="{class}" style="left: {:.0}px; top: {:.0}px; display: {display}">{}</div>"#,
            self.x,
            self.y,
            escape(&self.label)
        )
    }
}
