//! Driven port turning a template name and data context into HTML.

use serde_json::Value;

use super::define_port_error;

define_port_error! {
    /// Errors raised while rendering views.
    pub enum ViewRenderError {
        /// No template is registered under the name.
        UnknownTemplate { name: String } => "unknown template: {name}",
        /// The template failed to render with the given context.
        Render { message: String } => "template rendering failed: {message}",
    }
}

/// Port for HTML view rendering. Rendering is CPU-only and synchronous.
#[cfg_attr(test, mockall::automock)]
pub trait ViewRenderer: Send + Sync {
    /// Render `template` with `context`.
    fn render(&self, template: &str, context: &Value) -> Result<String, ViewRenderError>;
}
