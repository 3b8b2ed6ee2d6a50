//! Property brochure PDF renderer
//!
//! Turns a structured property record into multi-page PDF brochures in two
//! language variants (LTR English, RTL Arabic) using pdf-writer. Remote
//! images are fetched, aspect-fitted and embedded; missing assets and
//! malformed upstream content degrade to placeholders instead of failing
//! the whole document.

mod canvas;
mod document;
mod error;
mod fetch;
mod font_registry;
mod font_utils;
mod format;
mod image_registry;
mod image_utils;
mod layout;
mod locale;
mod primitives;
mod property;
pub mod renderer;
mod sanitize;
mod text_layout;
mod types;
mod unicode_utils;

pub mod config;

pub use config::{FontSet, RendererConfig};
pub use error::{RendererError, RendererResult};
pub use locale::Language;
pub use property::{AgentInfo, LegacyContent, LocalizedContent, PropertyRecord};
pub use renderer::BrochureRenderer;
