//! MiniJinja wrapper for document and scheme rendering.

use super::error::TemplateError;
use crate::dataset::{Dataset, Table};
use minijinja::{Environment, Value};
use serde::Serialize;

/// Recursion limit for template rendering, set well below MiniJinja's
/// default (500). Schema documents nest three levels deep at most.
const RECURSION_LIMIT: usize = 100;

/// Render the documentation template against a full dataset.
///
/// The dataset's top-level fields (`tables`, `functions`, `triggers`)
/// are exposed directly as template variables.
pub fn render_doc(dataset: &Dataset, template: &str) -> Result<String, TemplateError> {
    render(template, Value::from_serialize(dataset))
}

/// Render the scheme (ER diagram) template against the tables only.
///
/// The template sees a single `tables` variable.
pub fn render_scheme(tables: &[Table], template: &str) -> Result<String, TemplateError> {
    #[derive(Serialize)]
    struct SchemeContext<'a> {
        tables: &'a [Table],
    }

    render(template, Value::from_serialize(&SchemeContext { tables }))
}

fn render(template: &str, context: Value) -> Result<String, TemplateError> {
    let mut env = Environment::new();

    // Lenient: author-supplied templates reference optional fields, and
    // an undefined reads as empty rather than failing the render.
    env.set_undefined_behavior(minijinja::UndefinedBehavior::Lenient);
    env.set_recursion_limit(RECURSION_LIMIT);

    env.add_template("doc", template)?;

    let tmpl = env.get_template("doc")?;
    let rendered = tmpl.render(context)?;

    Ok(rendered)
}
