pub mod record;
pub mod outcome;
pub mod client;

pub use record::*;
pub use outcome::*;
pub use client::*;
