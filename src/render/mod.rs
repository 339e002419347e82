// src/render/mod.rs
// =============================================================================
// This module turns a ContributionsDocument into HTML.
//
// Submodules:
// - widgets: one fragment per section (stats, repositories, languages, ...)
// - page:    the full document around them, plus the error page
// - text:    markdown previews and date formatting
//
// Templates are written with maud, so the markup is checked at compile time
// and every interpolated value is escaped.
// =============================================================================

mod page;
mod text;
mod widgets;

use std::path::Path;

use anyhow::{Context, Result};
use maud::Markup;

pub use page::{render_error_page, render_page};

/// Writes a rendered page, creating parent directories
pub async fn write_page(path: &Path, page: Markup) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    tokio::fs::write(path, page.into_string())
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}
