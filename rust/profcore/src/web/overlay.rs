//! ProfOverlay: the page-level controller
//!
//! Owns every piece of process-wide state (detected set, hover machine,
//! current popup, timers) in one `OverlayState` behind `Rc<RefCell<..>>`.
//! Browser callbacks hold a `Weak` to it and never keep a borrow across an
//! `.await`.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, spawn_local};
use web_sys::{Element, Event, Window};

use super::document::DomDocument;
use super::surface::{DomSurface, PopupEvent};
use super::timer::BrowserScheduler;
use super::transport::FetchTransport;
use crate::config::OverlayConfig;
use crate::detect::{normalize_text, Annotator, HostDocument};
use crate::fetch::DataFetcher;
use crate::popup::{
    HoverAction, HoverController, PopupGeometry, PopupManager, Rect, Renderer, TimerToken, Viewport,
};

type Shared = Rc<RefCell<OverlayState>>;
type WeakShared = Weak<RefCell<OverlayState>>;

struct OverlayState {
    window: Window,
    document: DomDocument,
    annotator: Annotator<u32>,
    hover: HoverController<u32>,
    timers: BrowserScheduler,
    popups: PopupManager<DomSurface, u32>,
    fetcher: Rc<DataFetcher<FetchTransport>>,
}

/// Run `f` against the state unless it is gone or already borrowed
/// (a DOM event dispatched synchronously from inside another handler).
fn with_state<R>(weak: &WeakShared, f: impl FnOnce(&mut OverlayState) -> R) -> Option<R> {
    let state = weak.upgrade()?;
    let result = match state.try_borrow_mut() {
        Ok(mut guard) => Some(f(&mut *guard)),
        Err(_) => {
            console_warn!("[ProfOverlay] re-entrant event ignored");
            None
        }
    };
    result
}

fn viewport(window: &Window) -> Viewport {
    let read = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Viewport {
        width: read(window.inner_width()),
        height: read(window.inner_height()),
    }
}

fn anchor_rect(element: &Element) -> Rect {
    let r = element.get_bounding_client_rect();
    Rect {
        left: r.left(),
        top: r.top(),
        right: r.right(),
        bottom: r.bottom(),
    }
}

impl OverlayState {
    fn build(config: OverlayConfig) -> Result<Shared, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let fetcher = Rc::new(DataFetcher::new(
            FetchTransport::new(window.clone()),
            &config.service_base_url,
            config.fetch_timeout_ms,
        ));
        let geometry = PopupGeometry {
            width: config.popup_width,
            max_height: config.popup_max_height,
            margin: config.viewport_margin,
        };

        Ok(Rc::new_cyclic(|weak: &WeakShared| {
            let on_timer = {
                let weak = weak.clone();
                move |token| OverlayState::on_timer(&weak, token)
            };
            let on_popup = {
                let weak = weak.clone();
                move |event| OverlayState::on_popup_event(&weak, event)
            };
            RefCell::new(OverlayState {
                timers: BrowserScheduler::new(window.clone(), on_timer),
                popups: PopupManager::new(
                    DomSurface::new(document.clone(), geometry, on_popup),
                    Renderer::from_config(&config),
                    geometry,
                ),
                hover: HoverController::new(config.hover_delay_ms, config.dismiss_grace_ms),
                annotator: Annotator::new(),
                document: DomDocument::new(document),
                window,
                fetcher,
            })
        }))
    }

    /// Detection pass; wires hover listeners onto the new names.
    fn rescan(state: &Shared) -> usize {
        let fresh = {
            let mut guard = state.borrow_mut();
            let s = &mut *guard;
            let (fresh, stats) = s.annotator.detect(&s.document);
            if !fresh.is_empty() {
                console_log!(
                    "[ProfOverlay] {} new instructor name(s) ({} labels, {} cells probed)",
                    fresh.len(),
                    stats.labels_found,
                    stats.cells_probed
                );
            }
            fresh
                .into_iter()
                .map(|candidate| {
                    let key = s.document.key(&candidate.node);
                    (candidate.node, key)
                })
                .collect::<Vec<_>>()
        };

        let weak = Rc::downgrade(state);
        for (element, key) in &fresh {
            Self::wire_anchor(&weak, element, *key);
        }
        fresh.len()
    }

    fn wire_anchor(weak: &WeakShared, element: &Element, key: u32) {
        for (event, entering) in [("mouseenter", true), ("mouseleave", false)] {
            let weak = weak.clone();
            let listener = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
                with_state(&weak, |s| {
                    if entering {
                        s.hover.hover_start(key, &mut s.timers);
                    } else {
                        s.hover.hover_end(key, &mut s.timers);
                    }
                });
            });
            match element.add_event_listener_with_callback(event, listener.as_ref().unchecked_ref()) {
                // anchors live as long as the page
                Ok(()) => listener.forget(),
                Err(e) => console_error!("[ProfOverlay] addEventListener({}) failed: {:?}", event, e),
            }
        }
    }

    fn on_timer(weak: &WeakShared, token: TimerToken) {
        let action = with_state(weak, |s| s.hover.timer_fired(token, &mut s.timers)).flatten();
        match action {
            Some(HoverAction::Open(key)) => Self::open_popup(weak, key),
            Some(HoverAction::Close) => {
                with_state(weak, |s| s.popups.destroy_current());
            }
            None => {}
        }
    }

    fn on_popup_event(weak: &WeakShared, event: PopupEvent) {
        with_state(weak, |s| match event {
            PopupEvent::Enter => s.hover.popup_enter(&mut s.timers),
            PopupEvent::Leave => s.hover.popup_leave(&mut s.timers),
            PopupEvent::CloseRequested => {
                s.popups.close_and_reset(&mut s.hover, &mut s.timers);
            }
        });
    }

    fn open_popup(weak: &WeakShared, key: u32) {
        let opened = with_state(weak, |s| {
            let Some(anchor) = s.document.element_for_key(key) else {
                // anchor was removed by the host page since hover start; the
                // Open transition already took over from the previous popup
                s.popups.close_and_reset(&mut s.hover, &mut s.timers);
                return None;
            };
            let name = s
                .document
                .detected_name(&anchor)
                .unwrap_or_else(|| normalize_text(&s.document.text(&anchor)));
            let handle = s
                .popups
                .create(key, &name, anchor_rect(&anchor), viewport(&s.window));
            Some((handle, s.fetcher.clone()))
        })
        .flatten();

        let Some((handle, fetcher)) = opened else {
            return;
        };
        let weak = weak.clone();
        spawn_local(async move {
            let outcome = fetcher.fetch(&handle.name).await;
            with_state(&weak, |s| s.popups.settle(&handle, &outcome));
        });
    }
}

// =============================================================================
// WASM Bindings
// =============================================================================

struct RescanTimer {
    handle: i32,
    _callback: Closure<dyn FnMut()>,
}

/// Instructor review overlay for the current page.
#[wasm_bindgen]
pub struct ProfOverlay {
    state: Shared,
    window: Window,
    rescan_interval_ms: u32,
    rescan: Option<RescanTimer>,
}

#[wasm_bindgen]
impl ProfOverlay {
    /// Create the overlay. `config` is `{ serviceBaseUrl, hoverDelayMs, ... }`
    /// or `undefined` for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<ProfOverlay, JsValue> {
        let config = OverlayConfig::from_js(config).map_err(|e| {
            console_error!("[ProfOverlay] {}", e);
            JsValue::from_str(&e.to_string())
        })?;
        let rescan_interval_ms = config.rescan_interval_ms;
        let state = OverlayState::build(config)?;
        let window = state.borrow().window.clone();
        Ok(Self {
            state,
            window,
            rescan_interval_ms,
            rescan: None,
        })
    }

    /// Scan now and keep re-scanning on an interval. Idempotent.
    /// Returns the number of names found by the initial scan.
    pub fn start(&mut self) -> Result<usize, JsValue> {
        let found = self.scan();
        if self.rescan.is_some() {
            return Ok(found);
        }

        let weak = Rc::downgrade(&self.state);
        let callback = Closure::<dyn FnMut()>::new(move || {
            if let Some(state) = weak.upgrade() {
                if state.try_borrow_mut().is_ok() {
                    OverlayState::rescan(&state);
                }
            }
        });
        let handle = self.window.set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            i32::try_from(self.rescan_interval_ms).unwrap_or(i32::MAX),
        )?;
        self.rescan = Some(RescanTimer {
            handle,
            _callback: callback,
        });
        Ok(found)
    }

    /// One detection pass; returns how many new names were marked.
    pub fn scan(&self) -> usize {
        OverlayState::rescan(&self.state)
    }

    /// Number of elements marked so far.
    #[wasm_bindgen(js_name = detectedCount)]
    pub fn detected_count(&self) -> usize {
        self.state.borrow().annotator.detected().len()
    }

    /// Close the popup, if one is open.
    pub fn close(&self) {
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        s.popups.close_and_reset(&mut s.hover, &mut s.timers);
    }

    /// Resolve with the service's `/health` body.
    #[wasm_bindgen(js_name = checkHealth)]
    pub fn check_health(&self) -> js_sys::Promise {
        let fetcher = self.state.borrow().fetcher.clone();
        future_to_promise(async move {
            let health = fetcher
                .check_health()
                .await
                .map_err(|e| JsValue::from_str(&e))?;
            serde_wasm_bindgen::to_value(&health).map_err(|e| JsValue::from_str(&e.to_string()))
        })
    }
}

impl Drop for ProfOverlay {
    fn drop(&mut self) {
        if let Some(timer) = self.rescan.take() {
            self.window.clear_interval_with_handle(timer.handle);
        }
    }
}
