//! ProfCore: Instructor Detection + Review Popup Overlay
//!
//! A Rust/WASM implementation of the schedule-page review assistant.
//!
//! # Architecture
//!
//! ## Detection Components
//! - `detect/validator.rs` - Pure "is this a person's name?" predicate
//! - `detect/strategy.rs` - Table/sibling extraction strategies over `CellGrid`
//! - `detect/scanner.rs` - Label-marker discovery across a `HostDocument`
//! - `detect/annotator.rs` - Identity-based dedup (DetectedSet) + marking
//!
//! ## Popup Components
//! - `popup/hover.rs` - Idle/Pending/Active debounce state machine
//! - `popup/placement.rs` - Viewport-clamped popup positioning
//! - `popup/manager.rs` - Single-popup lifecycle, stale-result guard
//! - `popup/render.rs` - HTML rendering of loading/success/error states
//!
//! ## Data Components
//! - `fetch/record.rs` - ProfessorRecord / ReviewEntry wire types
//! - `fetch/outcome.rs` - Pure response → `Outcome` classification
//! - `fetch/client.rs` - DataFetcher over a pluggable `Transport`
//!
//! ## Browser Glue
//! - `web/` - web-sys implementations of the document, timers, popup surface
//!   and fetch transport, wired together by `ProfOverlay`
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { ProfOverlay } from 'profcore';
//!
//! await init();
//!
//! const overlay = new ProfOverlay({ serviceBaseUrl: 'https://reviews.example.edu' });
//! overlay.start(); // initial scan + periodic rescans
//!
//! console.log(await overlay.checkHealth()); // { status: 'healthy', ... }
//! ```

#[macro_use]
pub mod log;

pub mod config;
pub mod detect;
pub mod fetch;
pub mod popup;
pub mod web;

#[cfg(test)]
mod tests;

// Public exports
pub use config::*;
pub use detect::*;
pub use fetch::*;
pub use popup::*;
pub use web::ProfOverlay;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("profcore v{}", env!("CARGO_PKG_VERSION"))
}

/// Standalone name check, exposed for the content script's own diagnostics.
#[wasm_bindgen(js_name = isPlausibleName)]
pub fn js_is_plausible_name(text: &str) -> bool {
    detect::is_plausible_name(text)
}
