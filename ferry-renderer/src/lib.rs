//! # ferry-renderer
//!
//! Tera-based rendering of the *names* of files being fetched (the remote
//! logical path and the local destination), never their contents.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ferry_renderer::{PathContext, PathRenderer, TemplateEngineKind};
//!
//! fn render(ctx: &PathContext) -> Result<(String, String), ferry_renderer::RenderError> {
//!     let renderer = PathRenderer::new(Some(TemplateEngineKind::Tera));
//!     renderer.render_pair("remote://{{ environment }}/vimrc", "/etc/vimrc", ctx)
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;

pub use context::PathContext;
pub use engine::{PathRenderer, TemplateEngineKind};
pub use error::RenderError;
