//! DomSurface: `PopupSurface` backed by a fixed-position `<div>`

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement};

use super::document::POPUP_CLASS;
use crate::popup::{Placement, PopupGeometry, PopupId, PopupSurface, CLOSE_ATTR};

/// Pointer/click activity on the popup itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupEvent {
    Enter,
    Leave,
    CloseRequested,
}

type Listener = Closure<dyn FnMut(Event)>;

struct LivePopup {
    id: PopupId,
    element: HtmlElement,
    listeners: Vec<Listener>,
}

pub struct DomSurface {
    document: Document,
    geometry: PopupGeometry,
    on_event: Rc<dyn Fn(PopupEvent)>,
    live: Option<LivePopup>,
    /// Listeners of the last detached popup. A close click detaches the popup
    /// from inside its own click handler, so they are dropped on the next attach.
    retired: Vec<Listener>,
}

impl DomSurface {
    pub fn new(document: Document, geometry: PopupGeometry, on_event: impl Fn(PopupEvent) + 'static) -> Self {
        Self {
            document,
            geometry,
            on_event: Rc::new(on_event),
            live: None,
            retired: Vec::new(),
        }
    }

    fn listen(&self, element: &HtmlElement, event: &str, handler: impl FnMut(Event) + 'static) -> Option<Listener> {
        let listener = Closure::<dyn FnMut(Event)>::new(handler);
        match element.add_event_listener_with_callback(event, listener.as_ref().unchecked_ref()) {
            Ok(()) => Some(listener),
            Err(e) => {
                console_error!("[DomSurface] addEventListener({}) failed: {:?}", event, e);
                None
            }
        }
    }

    fn build(&self, placement: Placement, html: &str) -> Result<HtmlElement, JsValue> {
        let element: HtmlElement = self.document.create_element("div")?.dyn_into()?;
        element.set_class_name(POPUP_CLASS);
        element.set_attribute("role", "dialog")?;
        let style = element.style();
        style.set_property("position", "fixed")?;
        style.set_property("width", &format!("{}px", self.geometry.width))?;
        style.set_property("max-height", &format!("{}px", self.geometry.max_height))?;
        style.set_property("overflow-y", "auto")?;
        style.set_property("box-sizing", "border-box")?;
        style.set_property("z-index", "2147483647")?;
        set_position(&element, placement);
        element.set_inner_html(html);
        Ok(element)
    }
}

fn set_position(element: &HtmlElement, placement: Placement) {
    let style = element.style();
    let _ = style.set_property("left", &format!("{}px", placement.left));
    let _ = style.set_property("top", &format!("{}px", placement.top));
}

fn is_close_click(event: &Event) -> bool {
    event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok())
        .map(|element| matches!(element.closest(&format!("[{}]", CLOSE_ATTR)), Ok(Some(_))))
        .unwrap_or(false)
}

impl PopupSurface for DomSurface {
    fn attach(&mut self, id: PopupId, placement: Placement, html: &str) {
        self.retired.clear();

        let element = match self.build(placement, html) {
            Ok(element) => element,
            Err(e) => {
                console_error!("[DomSurface] failed to build popup: {:?}", e);
                return;
            }
        };

        let mut listeners = Vec::new();
        let on_event = self.on_event.clone();
        listeners.extend(self.listen(&element, "mouseenter", move |_| on_event(PopupEvent::Enter)));
        let on_event = self.on_event.clone();
        listeners.extend(self.listen(&element, "mouseleave", move |_| on_event(PopupEvent::Leave)));
        let on_event = self.on_event.clone();
        listeners.extend(self.listen(&element, "click", move |event: Event| {
            if is_close_click(&event) {
                event.prevent_default();
                on_event(PopupEvent::CloseRequested);
            }
        }));

        let appended = match self.document.body() {
            Some(body) => body.append_child(&element).map(|_| ()),
            None => Err(JsValue::from_str("document has no body")),
        };
        if let Err(e) = appended {
            console_error!("[DomSurface] failed to attach popup: {:?}", e);
            return;
        }

        self.live = Some(LivePopup {
            id,
            element,
            listeners,
        });
    }

    fn replace_content(&mut self, id: PopupId, html: &str) {
        if let Some(live) = self.live.as_ref().filter(|live| live.id == id) {
            live.element.set_inner_html(html);
        }
    }

    fn reposition(&mut self, id: PopupId, placement: Placement) {
        if let Some(live) = self.live.as_ref().filter(|live| live.id == id) {
            set_position(&live.element, placement);
        }
    }

    fn detach(&mut self, id: PopupId) {
        if self.live.as_ref().is_some_and(|live| live.id == id) {
            if let Some(live) = self.live.take() {
                live.element.remove();
                self.retired.extend(live.listeners);
            }
        }
    }

    fn measured_height(&self, id: PopupId) -> Option<f64> {
        let live = self.live.as_ref().filter(|live| live.id == id)?;
        let height = live.element.offset_height();
        (height > 0).then_some(height as f64)
    }
}
