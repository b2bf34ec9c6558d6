//! Browser bindings
//!
//! web-sys implementations of the seams the core is written against
//! (`HostDocument`, `Scheduler`, `PopupSurface`, `Transport`) plus the
//! `ProfOverlay` entry point that wires them to the page.

pub mod document;
pub mod timer;
pub mod surface;
pub mod transport;
pub mod overlay;

pub use document::DomDocument;
pub use timer::BrowserScheduler;
pub use surface::{DomSurface, PopupEvent};
pub use transport::FetchTransport;
pub use overlay::ProfOverlay;
