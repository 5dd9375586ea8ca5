//! Sketch-style world map of visited countries.
//!
//! The pipeline is load ([`loader`]) → project ([`projection`]) → draw
//! ([`render`]) onto a [`surface::DrawSurface`], with [`map::TravelsMap`]
//! driving zoom, tooltip, modal and re-render events on top.

pub mod config;
pub mod dataset;
pub mod error;
pub mod geo;
pub mod interaction;
pub mod loader;
pub mod logging;
pub mod map;
pub mod modal;
pub mod projection;
pub mod reactor;
pub mod render;
pub mod sketch;
pub mod surface;
pub mod theme;
pub mod topology;
pub mod zoom;

pub use dataset::{CountryRecord, Settings, TravelsPayload, TripEntry};
pub use error::{Error, Result};
pub use loader::{Source, WorldData};
pub use map::{MapEvent, TravelsMap};
pub use render::CountryStyle;
pub use surface::{DrawSurface, SvgSurface};
pub use theme::ColorScheme;
