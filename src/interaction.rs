use crate::dataset::Dataset;
use crate::modal::{ModalPresenter, Tooltip};
use crate::render::{RenderState, RenderedCountry};
use crate::sketch::Point;
use crate::surface::DrawSurface;
use crate::zoom::ViewTransform;

/// Hover and click handling for sketched countries. Never touches geometry
/// or classification; only reads what the render engine produced.
#[derive(Debug, Clone, Default)]
pub struct Interaction {
    tooltip: Tooltip,
    hovered: Option<String>,
}

fn interactive<'a>(state: &'a RenderState, id: &str) -> Option<&'a RenderedCountry> {
    state.get(id).filter(|e| e.style.is_interactive())
}

impl Interaction {
    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    /// Show the tooltip and raise the shape so its border is not occluded.
    pub fn pointer_enter(
        &mut self,
        id: &str,
        pointer: Point,
        state: &RenderState,
        dataset: &Dataset,
        surface: &mut dyn DrawSurface,
    ) -> bool {
        let Some(entry) = interactive(state, id) else {
            return false;
        };
        let Some(record) = entry.code.as_deref().and_then(|c| dataset.get(c)) else {
            return false;
        };

        surface.raise(entry.node);
        self.tooltip.show(&record.name, record.home, pointer);
        self.hovered = Some(entry.id.clone());
        true
    }

    pub fn pointer_move(&mut self, pointer: Point) -> bool {
        if self.hovered.is_none() {
            return false;
        }
        self.tooltip.move_to(pointer);
        true
    }

    pub fn pointer_leave(&mut self, id: &str) -> bool {
        if self.hovered.as_deref() != Some(id) {
            return false;
        }
        self.hovered = None;
        self.tooltip.hide();
        true
    }

    /// Hover by screen position: resolves the country under the pointer
    /// through the view transform and derives enter/move/leave.
    pub fn pointer_at(
        &mut self,
        pointer: Point,
        view: &ViewTransform,
        state: &RenderState,
        dataset: &Dataset,
        surface: &mut dyn DrawSurface,
    ) -> bool {
        let (mx, my) = view.invert(pointer);
        let under = state
            .hit_test(mx, my)
            .filter(|e| e.style.is_interactive())
            .map(|e| e.id.clone());

        match (self.hovered.clone(), under) {
            (Some(current), Some(id)) if current == id => self.pointer_move(pointer),
            (current, Some(id)) => {
                if let Some(current) = current {
                    self.pointer_leave(&current);
                }
                self.pointer_enter(&id, pointer, state, dataset, surface)
            }
            (Some(current), None) => self.pointer_leave(&current),
            (None, None) => false,
        }
    }

    /// Hide the tooltip and open the modal for a sketched country.
    pub fn click(
        &mut self,
        id: &str,
        state: &RenderState,
        dataset: &Dataset,
        modal: &mut ModalPresenter,
    ) -> bool {
        let Some(entry) = interactive(state, id) else {
            return false;
        };
        self.tooltip.hide();
        self.hovered = None;

        let Some(code) = entry.code.as_deref() else {
            tracing::warn!(id, "clicked country has no alpha-3 code");
            return false;
        };
        match dataset.get(code) {
            Some(record) => {
                modal.open(code, record);
                tracing::debug!(code, "modal opened");
                true
            }
            None => {
                tracing::warn!(code, "no travel record for clicked country");
                false
            }
        }
    }

    pub fn click_at(
        &mut self,
        pointer: Point,
        view: &ViewTransform,
        state: &RenderState,
        dataset: &Dataset,
        modal: &mut ModalPresenter,
    ) -> bool {
        let (mx, my) = view.invert(pointer);
        match state.hit_test(mx, my).map(|e| e.id.clone()) {
            Some(id) => self.click(&id, state, dataset, modal),
            None => false,
        }
    }

    /// Forget hover state after a re-render invalidated the nodes.
    pub fn reset(&mut self) {
        self.hovered = None;
        self.tooltip.hide();
    }
}
