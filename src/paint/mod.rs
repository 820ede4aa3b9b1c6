/// Background model and text syntax.
pub mod background;
pub mod color;
pub mod painter;
