//! PopupManager: owns the one live popup
//!
//! Each popup gets a fresh id. A fetch result carries the handle it was
//! started for; if that id is no longer current the result is dropped instead
//! of being written into a detached or reused popup.

use std::fmt::Debug;

use super::hover::{HoverController, Scheduler};
use super::placement::{place_popup, PopupGeometry, Placement, Rect, Viewport};
use super::render::Renderer;
use crate::fetch::{ErrorKind, Outcome, ProfessorRecord};

pub type PopupId = u64;

/// Where popups physically live (a DOM node in the browser, a recorder in tests).
pub trait PopupSurface {
    fn attach(&mut self, id: PopupId, placement: Placement, html: &str);
    fn replace_content(&mut self, id: PopupId, html: &str);
    fn reposition(&mut self, id: PopupId, placement: Placement);
    fn detach(&mut self, id: PopupId);
    /// Rendered height, when the surface can measure it.
    fn measured_height(&self, id: PopupId) -> Option<f64>;
}

/// Ticket for one popup instance
#[derive(Debug, Clone, PartialEq)]
pub struct PopupHandle<K> {
    pub id: PopupId,
    pub anchor: K,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PopupState {
    Loading,
    Loaded(ProfessorRecord),
    Error(ErrorKind, Option<String>),
}

impl PopupState {
    fn from_outcome(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Success(record) => PopupState::Loaded(record.clone()),
            other => match other.error_kind() {
                Some(kind) => PopupState::Error(kind, other.detail().map(str::to_string)),
                None => PopupState::Loading,
            },
        }
    }
}

#[derive(Debug)]
struct LivePopup<K> {
    handle: PopupHandle<K>,
    state: PopupState,
    anchor_rect: Rect,
    viewport: Viewport,
}

pub struct PopupManager<S, K> {
    surface: S,
    renderer: Renderer,
    geometry: PopupGeometry,
    next_id: PopupId,
    current: Option<LivePopup<K>>,
}

impl<S: PopupSurface, K: Clone + PartialEq + Debug> PopupManager<S, K> {
    pub fn new(surface: S, renderer: Renderer, geometry: PopupGeometry) -> Self {
        Self {
            surface,
            renderer,
            geometry,
            next_id: 0,
            current: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_handle(&self) -> Option<&PopupHandle<K>> {
        self.current.as_ref().map(|live| &live.handle)
    }

    pub fn current_state(&self) -> Option<&PopupState> {
        self.current.as_ref().map(|live| &live.state)
    }

    /// True while `handle` still names the attached popup.
    pub fn is_current(&self, handle: &PopupHandle<K>) -> bool {
        self.current
            .as_ref()
            .is_some_and(|live| live.handle.id == handle.id)
    }

    /// Replace whatever is open with a Loading popup for `anchor`.
    pub fn create(&mut self, anchor: K, name: &str, anchor_rect: Rect, viewport: Viewport) -> PopupHandle<K> {
        self.destroy_current();

        self.next_id += 1;
        let handle = PopupHandle {
            id: self.next_id,
            anchor,
            name: name.to_string(),
        };

        let placement = place_popup(anchor_rect, viewport, self.geometry, self.geometry.max_height);
        self.surface
            .attach(handle.id, placement, &self.renderer.render_loading(name));

        self.current = Some(LivePopup {
            handle: handle.clone(),
            state: PopupState::Loading,
            anchor_rect,
            viewport,
        });
        self.fit_to_content();

        console_log!("[PopupManager] opened #{} for {:?}", handle.id, handle.name);
        handle
    }

    /// Detach the live popup, if any.
    pub fn destroy_current(&mut self) -> Option<PopupHandle<K>> {
        let live = self.current.take()?;
        self.surface.detach(live.handle.id);
        console_log!("[PopupManager] closed #{}", live.handle.id);
        Some(live.handle)
    }

    /// Close for any reason other than the dismiss timer: detach whatever is
    /// attached and bring the hover machine back to idle, so no popup is left
    /// without an owner to dismiss it.
    pub fn close_and_reset<T: Scheduler>(&mut self, hover: &mut HoverController<K>, timers: &mut T) -> Option<PopupHandle<K>>
    where
        K: Copy + Eq,
    {
        let closed = self.destroy_current();
        hover.popup_closed(timers);
        closed
    }

    /// Render a settled lookup into the popup it was started for.
    /// Returns false when that popup is gone.
    pub fn settle(&mut self, handle: &PopupHandle<K>, outcome: &Outcome) -> bool {
        if !self.is_current(handle) {
            console_log!(
                "[PopupManager] discarding {} for stale popup #{}",
                outcome.label(),
                handle.id
            );
            return false;
        }

        let html = self.renderer.render_outcome(&handle.name, outcome);
        self.surface.replace_content(handle.id, &html);
        if let Some(live) = self.current.as_mut() {
            live.state = PopupState::from_outcome(outcome);
        }
        self.fit_to_content();
        true
    }

    /// Re-run placement with the measured height so short popups hug the anchor.
    fn fit_to_content(&mut self) {
        let Some(live) = self.current.as_ref() else {
            return;
        };
        let Some(height) = self.surface.measured_height(live.handle.id) else {
            return;
        };
        let placement = place_popup(live.anchor_rect, live.viewport, self.geometry, height);
        self.surface.reposition(live.handle.id, placement);
    }
}
