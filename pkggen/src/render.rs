//! Embedded file templates rendered with minijinja.

use anyhow::{Context, Result};
use minijinja::{Environment, Value};

const CALLABLES_TEMPLATE: &str = include_str!("templates/callables.py.jinja");
const PYPROJECT_TEMPLATE: &str = include_str!("templates/pyproject.toml.jinja");
const README_TEMPLATE: &str = include_str!("templates/README.md.jinja");
const CI_TEMPLATE: &str = include_str!("templates/ci.yml.jinja");
const GITIGNORE_TEMPLATE: &str = include_str!("templates/gitignore.jinja");
const INIT_TEMPLATE: &str = include_str!("templates/init.py.jinja");

/// Names of the embedded templates.
pub mod names {
    pub const CALLABLES: &str = "callables.py";
    pub const PYPROJECT: &str = "pyproject.toml";
    pub const README: &str = "README.md";
    pub const CI: &str = "ci.yml";
    pub const GITIGNORE: &str = "gitignore";
    pub const INIT: &str = "__init__.py";
}

/// Template engine wrapper around minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        for (name, source) in [
            (names::CALLABLES, CALLABLES_TEMPLATE),
            (names::PYPROJECT, PYPROJECT_TEMPLATE),
            (names::README, README_TEMPLATE),
            (names::CI, CI_TEMPLATE),
            (names::GITIGNORE, GITIGNORE_TEMPLATE),
            (names::INIT, INIT_TEMPLATE),
        ] {
            env.add_template(name, source)
                .expect("embedded template should be valid");
        }
        Self { env }
    }

    pub fn render(&self, name: &str, ctx: Value) -> Result<String> {
        let template = self
            .env
            .get_template(name)
            .with_context(|| format!("load template {name}"))?;
        template
            .render(ctx)
            .with_context(|| format!("render template {name}"))
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}
