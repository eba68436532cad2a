pub use display::Display;
pub use input::{Input, Poll};

mod display;
pub mod input;
mod keymap;
