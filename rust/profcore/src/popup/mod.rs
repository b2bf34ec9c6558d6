pub mod hover;
pub mod placement;
pub mod manager;
pub mod render;

pub use hover::*;
pub use placement::*;
pub use manager::*;
pub use render::*;
