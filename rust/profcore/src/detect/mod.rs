pub mod validator;
pub mod strategy;
pub mod scanner;
pub mod annotator;

pub use validator::*;
pub use strategy::*;
pub use scanner::*;
pub use annotator::*;
