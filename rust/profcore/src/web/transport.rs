//! FetchTransport: `Transport` over `window.fetch` with an AbortController deadline

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, DomException, RequestInit, Response, Window};

use crate::fetch::{RawResponse, Transport, TransportError};

pub struct FetchTransport {
    window: Window,
}

impl FetchTransport {
    pub fn new(window: Window) -> Self {
        Self { window }
    }

    fn is_abort(err: &JsValue) -> bool {
        err.dyn_ref::<DomException>()
            .is_some_and(|e| e.name() == "AbortError")
    }

    fn describe(err: &JsValue) -> String {
        if let Some(e) = err.dyn_ref::<js_sys::Error>() {
            return String::from(e.message());
        }
        err.as_string().unwrap_or_else(|| format!("{:?}", err))
    }

    /// Request + body read, both under `signal`.
    async fn request(&self, url: &str, init: &RequestInit) -> Result<RawResponse, JsValue> {
        let value = JsFuture::from(self.window.fetch_with_str_and_init(url, init)).await?;
        let response: Response = value.dyn_into()?;
        let status = response.status();
        let body = JsFuture::from(response.text()?).await?;
        Ok(RawResponse::new(status, body.as_string().unwrap_or_default()))
    }
}

impl Transport for FetchTransport {
    async fn get(&self, url: &str, timeout_ms: u32) -> Result<RawResponse, TransportError> {
        let controller = AbortController::new()
            .map_err(|e| TransportError::Other(format!("AbortController unavailable: {}", Self::describe(&e))))?;

        let init = RequestInit::new();
        init.set_method("GET");
        init.set_signal(Some(&controller.signal()));

        let abort = {
            let controller = controller.clone();
            Closure::<dyn FnMut()>::new(move || controller.abort())
        };
        let timer = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                abort.as_ref().unchecked_ref(),
                i32::try_from(timeout_ms).unwrap_or(i32::MAX),
            )
            .map_err(|e| TransportError::Other(format!("setTimeout failed: {}", Self::describe(&e))))?;

        let result = self.request(url, &init).await;
        self.window.clear_timeout_with_handle(timer);
        drop(abort);

        result.map_err(|err| {
            if Self::is_abort(&err) {
                TransportError::TimedOut(timeout_ms)
            } else if err.is_instance_of::<js_sys::TypeError>() {
                // fetch() rejects with TypeError for DNS, refused, CORS, offline
                TransportError::Network(Self::describe(&err))
            } else {
                TransportError::Other(Self::describe(&err))
            }
        })
    }
}
