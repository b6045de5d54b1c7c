//! Tera rendering engine: [`TemplateEngineKind`] and [`PathRenderer`].
//!
//! Only path strings are rendered. Tera's syntax is Jinja2-compatible for
//! the expressions path templates use, so `jinja` is accepted as an alias.

use std::fmt;
use std::str::FromStr;

use tera::Tera;

use crate::context::PathContext;
use crate::error::RenderError;

// ---------------------------------------------------------------------------
// TemplateEngineKind
// ---------------------------------------------------------------------------

/// Registered template engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateEngineKind {
    Tera,
}

impl TemplateEngineKind {
    /// All engine variants in a stable order.
    pub fn all() -> &'static [TemplateEngineKind] {
        &[TemplateEngineKind::Tera]
    }

    /// Names accepted for this engine.
    pub fn names(&self) -> &'static [&'static str] {
        match self {
            TemplateEngineKind::Tera => &["tera", "jinja"],
        }
    }
}

impl fmt::Display for TemplateEngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.names()[0])
    }
}

impl FromStr for TemplateEngineKind {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_ascii_lowercase();
        TemplateEngineKind::all()
            .iter()
            .copied()
            .find(|kind| kind.names().contains(&wanted.as_str()))
            .ok_or_else(|| RenderError::UnavailableEngine(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// PathRenderer
// ---------------------------------------------------------------------------

/// Renders a (remote path, destination) pair before a fetch.
///
/// With no engine selected, both strings pass through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathRenderer {
    engine: Option<TemplateEngineKind>,
}

impl PathRenderer {
    pub fn new(engine: Option<TemplateEngineKind>) -> Self {
        PathRenderer { engine }
    }

    pub fn engine(&self) -> Option<TemplateEngineKind> {
        self.engine
    }

    /// Render one path template to a literal path string.
    pub fn render(&self, template: &str, ctx: &PathContext) -> Result<String, RenderError> {
        let Some(engine) = self.engine else {
            return Ok(template.to_string());
        };
        let rendered = match engine {
            TemplateEngineKind::Tera => {
                let tera_ctx = ctx.to_tera_context()?;
                Tera::one_off(template, &tera_ctx, false)?
            }
        };
        let rendered = rendered.trim();
        if rendered.is_empty() {
            return Err(RenderError::EmptyPath {
                template: template.to_string(),
            });
        }
        Ok(rendered.to_string())
    }

    /// Render the remote path and the destination.
    pub fn render_pair(
        &self,
        path: &str,
        dest: &str,
        ctx: &PathContext,
    ) -> Result<(String, String), RenderError> {
        Ok((self.render(path, ctx)?, self.render(dest, ctx)?))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
