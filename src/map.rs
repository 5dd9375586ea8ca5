use std::time::{Duration, Instant};

use crate::dataset::{Dataset, Settings, TravelsPayload};
use crate::interaction::Interaction;
use crate::loader::WorldData;
use crate::modal::{ModalContent, ModalPresenter, Tooltip};
use crate::projection::NaturalEarth;
use crate::reactor::{Reaction, Reactor, RESIZE_DEBOUNCE};
use crate::render::{RenderEngine, RenderInput, RenderState, RenderStats};
use crate::sketch::HachureOptions;
use crate::surface::DrawSurface;
use crate::theme::{ColorScheme, ThemeColors, ThemeSource};
use crate::zoom::{ViewTransform, ZoomBehavior};

/// Tick spacing while a zoom transition is running (~60 fps).
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Everything the map knows, with one writer per field:
/// `world` is written once at construction, `colors`/`scheme` by the theme
/// reaction, `viewport`/`projection` by the resize reaction, `render_state`
/// by the render pass.
#[derive(Debug, Clone)]
pub struct MapViewState {
    pub payload: TravelsPayload,
    world: WorldData,
    pub viewport: (f64, f64),
    pub scheme: ColorScheme,
    pub colors: ThemeColors,
    pub projection: NaturalEarth,
    pub render_state: RenderState,
}

impl MapViewState {
    pub fn world(&self) -> &WorldData {
        &self.world
    }

    pub fn dataset(&self) -> &Dataset {
        &self.payload.countries
    }

    pub fn settings(&self) -> &Settings {
        &self.payload.settings
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    PointerEnter { id: String, x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerLeave { id: String },
    Click { id: String },
    /// Hover at a screen point; the country is found by hit-testing.
    PointerAt { x: f64, y: f64 },
    ClickAt { x: f64, y: f64 },
    KeyDown(String),
    BackdropClick,
    CloseClick,
    ZoomIn,
    ZoomOut,
    ZoomReset,
    Wheel { delta_y: f64, x: f64, y: f64 },
    Pinch { factor: f64, x: f64, y: f64 },
    Drag { dx: f64, dy: f64 },
    Resize { width: f64, height: f64 },
    ThemeChanged(ColorScheme),
}

/// The travels map widget: render pass plus its interactive state machines.
pub struct TravelsMap {
    state: MapViewState,
    theme: Box<dyn ThemeSource>,
    engine: RenderEngine,
    zoom: ZoomBehavior,
    interaction: Interaction,
    modal: ModalPresenter,
    reactor: Reactor,
    renders: usize,
    last_stats: RenderStats,
}

impl TravelsMap {
    pub fn new(
        payload: TravelsPayload,
        world: WorldData,
        theme: Box<dyn ThemeSource>,
        viewport: (f64, f64),
        scheme: ColorScheme,
    ) -> Self {
        let (width, height) = viewport;
        let colors = ThemeColors::resolve(theme.as_ref(), scheme);
        let projection = NaturalEarth::fit(width, height, &payload.settings);
        Self {
            state: MapViewState {
                payload,
                world,
                viewport,
                scheme,
                colors,
                projection,
                render_state: RenderState::default(),
            },
            theme,
            engine: RenderEngine::default(),
            zoom: ZoomBehavior::new(width, height),
            interaction: Interaction::default(),
            modal: ModalPresenter::default(),
            reactor: Reactor::new(RESIZE_DEBOUNCE),
            renders: 0,
            last_stats: RenderStats::default(),
        }
    }

    pub fn with_hachure(mut self, hachure: HachureOptions) -> Self {
        self.engine = RenderEngine::new(hachure);
        self
    }

    pub fn with_debounce(mut self, quiet: Duration) -> Self {
        self.reactor = Reactor::new(quiet);
        self
    }

    pub fn state(&self) -> &MapViewState {
        &self.state
    }

    pub fn view_transform(&self) -> ViewTransform {
        self.zoom.transform()
    }

    pub fn zoom(&self) -> &ZoomBehavior {
        &self.zoom
    }

    pub fn tooltip(&self) -> &Tooltip {
        self.interaction.tooltip()
    }

    pub fn modal(&self) -> Option<&ModalContent> {
        self.modal.content()
    }

    pub fn scroll_locked(&self) -> bool {
        self.modal.scroll_locked()
    }

    /// Number of completed render passes.
    pub fn render_count(&self) -> usize {
        self.renders
    }

    pub fn last_stats(&self) -> RenderStats {
        self.last_stats
    }

    /// Full redraw. Prior nodes are cleared first; the view transform is reapplied.
    pub fn render(&mut self, surface: &mut dyn DrawSurface) -> RenderStats {
        let input = RenderInput {
            world: &self.state.world,
            dataset: &self.state.payload.countries,
            projection: &self.state.projection,
            colors: &self.state.colors,
        };
        let (render_state, stats) = self.engine.render(&input, surface);
        self.state.render_state = render_state;
        self.interaction.reset();
        self.apply_transform(surface);

        self.renders += 1;
        self.last_stats = stats;
        tracing::info!(
            drawn = stats.drawn,
            visited = stats.visited,
            home = stats.home,
            skipped = stats.skipped,
            "map rendered"
        );
        stats
    }

    fn apply_transform(&self, surface: &mut dyn DrawSurface) {
        let root = surface.root();
        surface.set_attribute(root, "transform", &self.zoom.transform().to_svg());
    }

    /// Dispatch one event. Returns whether anything visible changed.
    pub fn handle(&mut self, event: MapEvent, now: Instant, surface: &mut dyn DrawSurface) -> bool {
        tracing::trace!(?event, "map event");
        let state = &self.state;
        match event {
            MapEvent::PointerEnter { id, x, y } => self.interaction.pointer_enter(
                &id,
                (x, y),
                &state.render_state,
                &state.payload.countries,
                surface,
            ),
            MapEvent::PointerMove { x, y } => self.interaction.pointer_move((x, y)),
            MapEvent::PointerLeave { id } => self.interaction.pointer_leave(&id),
            MapEvent::Click { id } => self.interaction.click(
                &id,
                &state.render_state,
                &state.payload.countries,
                &mut self.modal,
            ),
            MapEvent::PointerAt { x, y } => self.interaction.pointer_at(
                (x, y),
                &self.zoom.transform(),
                &state.render_state,
                &state.payload.countries,
                surface,
            ),
            MapEvent::ClickAt { x, y } => self.interaction.click_at(
                (x, y),
                &self.zoom.transform(),
                &state.render_state,
                &state.payload.countries,
                &mut self.modal,
            ),
            MapEvent::KeyDown(key) => {
                if key == "Escape" && self.modal.is_open() {
                    self.modal.close();
                    true
                } else {
                    false
                }
            }
            MapEvent::BackdropClick | MapEvent::CloseClick => {
                let was_open = self.modal.is_open();
                self.modal.close();
                was_open
            }
            MapEvent::ZoomIn => {
                self.zoom.zoom_in(now);
                true
            }
            MapEvent::ZoomOut => {
                self.zoom.zoom_out(now);
                true
            }
            MapEvent::ZoomReset => {
                self.zoom.reset(now);
                true
            }
            MapEvent::Wheel { delta_y, x, y } => {
                self.zoom.wheel(delta_y, (x, y));
                self.apply_transform(surface);
                true
            }
            MapEvent::Pinch { factor, x, y } => {
                self.zoom.pinch(factor, (x, y));
                self.apply_transform(surface);
                true
            }
            MapEvent::Drag { dx, dy } => {
                self.zoom.drag(dx, dy);
                self.apply_transform(surface);
                true
            }
            MapEvent::Resize { width, height } => {
                self.reactor.resized(width, height, now);
                false
            }
            MapEvent::ThemeChanged(scheme) => {
                self.reactor.theme_changed(scheme);
                false
            }
        }
    }

    /// Drive timers: zoom transitions and pending re-renders.
    pub fn tick(&mut self, now: Instant, surface: &mut dyn DrawSurface) -> bool {
        let mut changed = false;
        if self.zoom.tick(now) {
            self.apply_transform(surface);
            changed = true;
        }
        if let Some(reaction) = self.reactor.poll(now) {
            self.react(reaction, surface);
            changed = true;
        }
        changed
    }

    /// Earliest instant at which [`tick`](Self::tick) has work to do.
    /// While a zoom transition runs that is the next frame after `now`.
    pub fn next_deadline(&self, now: Instant) -> Option<Instant> {
        let frame = self.zoom.is_animating().then(|| now + FRAME_INTERVAL);
        match (frame, self.reactor.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn react(&mut self, reaction: Reaction, surface: &mut dyn DrawSurface) {
        if let Some(scheme) = reaction.theme {
            tracing::debug!(?scheme, "colour scheme changed");
            self.state.scheme = scheme;
            self.state.colors = ThemeColors::resolve(self.theme.as_ref(), scheme);
        }
        if let Some((width, height)) = reaction.resize {
            tracing::debug!(width, height, "viewport resized");
            self.state.viewport = (width, height);
            self.state.projection = NaturalEarth::fit(width, height, &self.state.payload.settings);
            surface.set_size(width, height);
            // The projection baseline moved, so the old view no longer applies
            self.zoom.set_viewport(width, height);
            self.zoom.reset_immediate();
        }
        self.render(surface);
    }
}
