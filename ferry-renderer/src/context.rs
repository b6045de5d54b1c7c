//! Template context: serializable rendering payload for path templates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use ferry_core::{Environment, FerryConfig};

use crate::error::RenderError;

/// Variables visible to a path template: `{{ id }}`, `{{ environment }}` and
/// `{{ vars.<name> }}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathContext {
    pub id: String,
    pub environment: String,
    pub vars: BTreeMap<String, String>,
}

impl PathContext {
    pub fn new(id: impl Into<String>, environment: &Environment) -> Self {
        PathContext {
            id: id.into(),
            environment: environment.to_string(),
            vars: BTreeMap::new(),
        }
    }

    /// Build a context from the process configuration for one environment.
    pub fn from_config(config: &FerryConfig, environment: &Environment) -> Self {
        PathContext {
            id: config.id.clone(),
            environment: environment.to_string(),
            vars: config.template_vars.clone(),
        }
    }

    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Convert to a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}
