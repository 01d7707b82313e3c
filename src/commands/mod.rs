pub mod delete;
pub mod extract;
pub mod info;
pub mod ocr;
pub mod render;
pub mod searchable;

use anyhow::{Context, Result};
use std::path::Path;

use pdfdesk::session::Session;

/// Open `path` in a fresh session.
fn open_session(path: &Path, password: Option<&str>) -> Result<Session> {
    let mut session = Session::new();
    session
        .open(path, password)
        .with_context(|| format!("Failed to open PDF: {}", path.display()))?;
    Ok(session)
}
