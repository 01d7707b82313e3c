use anyhow::Result;
use std::path::Path;

use super::open_session;
use pdfdesk::config::ToolConfig;

pub fn run(path: &Path, page: u32, config: &ToolConfig, password: Option<&str>) -> Result<()> {
    let mut session = open_session(path, password)?;

    match session.ocr_page(config, page) {
        Some(text) if !text.is_empty() => println!("{}", text),
        Some(_) => println!("No text found on page {}.", page),
        None => anyhow::bail!("OCR failed on page {} of {}", page, path.display()),
    }

    Ok(())
}
