use anyhow::{Context, Result};
use std::path::Path;

use super::open_session;

pub fn run(input: &Path, pages: &str, output: Option<&Path>, password: Option<&str>) -> Result<()> {
    let mut session = open_session(input, password)?;
    let before = session.page_count();

    let remaining = session
        .delete_pages(pages)
        .with_context(|| format!("Failed to delete pages {:?}", pages))?;

    let saved = session
        .save(output)
        .with_context(|| format!("Failed to save PDF: {}", output.unwrap_or(input).display()))?;

    println!(
        "Deleted {} page(s), {} remaining, saved to {}",
        before - remaining,
        remaining,
        saved.display()
    );

    Ok(())
}
