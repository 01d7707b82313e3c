use anyhow::{Context, Result};
use std::path::Path;

use super::open_session;

pub fn run(input: &Path, pages: &str, output: &Path, password: Option<&str>) -> Result<()> {
    let session = open_session(input, password)?;

    let written = session
        .extract_pages(pages, output)
        .with_context(|| format!("Failed to extract pages {:?}", pages))?;

    println!("Extracted {} page(s) to {}", written, output.display());

    Ok(())
}
