//! HTML view adapters.

mod minijinja_renderer;

pub use minijinja_renderer::MiniJinjaRenderer;
