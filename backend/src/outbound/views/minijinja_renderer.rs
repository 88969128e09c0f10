//! `ViewRenderer` backed by minijinja templates embedded at compile time.

use minijinja::{AutoEscape, Environment, ErrorKind};
use serde_json::Value;
use tracing::error;

use crate::domain::ports::{ViewRenderError, ViewRenderer};

const TEMPLATES: [(&str, &str); 10] = [
    ("layout.html", include_str!("../../../templates/layout.html")),
    ("_categories.html", include_str!("../../../templates/_categories.html")),
    ("_item_fields.html", include_str!("../../../templates/_item_fields.html")),
    ("catalog.html", include_str!("../../../templates/catalog.html")),
    ("view_category.html", include_str!("../../../templates/view_category.html")),
    ("new_category.html", include_str!("../../../templates/new_category.html")),
    ("view_item.html", include_str!("../../../templates/view_item.html")),
    ("new_item.html", include_str!("../../../templates/new_item.html")),
    ("edit_item.html", include_str!("../../../templates/edit_item.html")),
    ("delete_item.html", include_str!("../../../templates/delete_item.html")),
];

/// Template environment holding every catalog view with HTML escaping on.
pub struct MiniJinjaRenderer {
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Load the embedded templates.
    ///
    /// # Errors
    /// Returns a [`ViewRenderError::Render`] when a template fails to parse.
    pub fn new() -> Result<Self, ViewRenderError> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        for (name, source) in TEMPLATES {
            env.add_template(name, source)
                .map_err(|err| ViewRenderError::render(format!("{name}: {err}")))?;
        }
        Ok(Self { env })
    }
}

impl ViewRenderer for MiniJinjaRenderer {
    fn render(&self, template: &str, context: &Value) -> Result<String, ViewRenderError> {
        let tmpl = self.env.get_template(template).map_err(|err| match err.kind() {
            ErrorKind::TemplateNotFound => ViewRenderError::unknown_template(template),
            _ => ViewRenderError::render(err.to_string()),
        })?;
        tmpl.render(context).map_err(|err| {
            error!(template, error = %err, "template rendering failed");
            ViewRenderError::render(err.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};
    use serde_json::json;

    use super::*;

    #[fixture]
    fn renderer() -> MiniJinjaRenderer {
        MiniJinjaRenderer::new().expect("templates parse")
    }

    #[rstest]
    fn catalog_lists_latest_items_with_categories(renderer: MiniJinjaRenderer) {
        let html = renderer
            .render(
                "catalog.html",
                &json!({
                    "item_title": "Latest Items",
                    "categories": [{"id": 1, "name": "Hockey"}],
                    "items": [{"id": 4, "name": "Stick", "category_name": "Hockey"}],
                }),
            )
            .expect("render");
        assert!(html.contains("Latest Items"));
        assert!(html.contains(r#"href="/items/4""#));
        assert!(html.contains("/gconnect"));
    }

    #[rstest]
    fn output_is_html_escaped(renderer: MiniJinjaRenderer) {
        let html = renderer
            .render(
                "view_item.html",
                &json!({
                    "item": {"id": 1, "name": "<script>alert(1)</script>", "description": null},
                    "category": {"id": 2, "name": "Snow"},
                    "user": {"name": "Ada", "email": "ada@example.com"},
                }),
            )
            .expect("render");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("/items/1/edit"));
    }

    #[rstest]
    fn edit_form_preselects_current_category(renderer: MiniJinjaRenderer) {
        let html = renderer
            .render(
                "edit_item.html",
                &json!({
                    "item": {"id": 3, "name": "Goggles", "description": "Anti-fog", "category_id": 2},
                    "categories": [{"id": 1, "name": "Hockey"}, {"id": 2, "name": "Snowboarding"}],
                }),
            )
            .expect("render");
        assert!(html.contains(r#"<option value="2" selected>Snowboarding</option>"#));
        assert!(html.contains("Anti-fog"));
    }

    #[rstest]
    fn unknown_template_is_reported(renderer: MiniJinjaRenderer) {
        let err = renderer
            .render("missing.html", &json!({}))
            .expect_err("unknown template");
        assert_eq!(err, ViewRenderError::unknown_template("missing.html"));
    }
}
