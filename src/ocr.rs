//! Text recognition through external programs.
//!
//! Page OCR renders the page with pdftoppm and pipes the PNG through
//! `tesseract stdin stdout`. Searchable-PDF creation hands the whole file to
//! ocrmypdf, which adds an invisible text layer. Both block until the child
//! process exits; a large document can take minutes.
//!
//! Failures are logged and reported as `None`/`false`.

use std::io::{ErrorKind, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

use crate::config::ToolConfig;
use crate::error::{Error, Result};
use crate::render;

/// Run tesseract over PNG image bytes.
pub fn recognize_png(config: &ToolConfig, png: &[u8]) -> Result<String> {
    let mut cmd = Command::new(&config.tesseract);
    cmd.arg("stdin")
        .arg("stdout")
        .arg("-l")
        .arg(&config.language)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    debug!(?cmd, bytes = png.len(), "running tesseract");

    let mut child = cmd.spawn().map_err(|e| spawn_error(&config.tesseract, e))?;

    // tesseract reads the whole image before writing anything, so filling
    // stdin first cannot deadlock against a full stdout pipe
    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(png)
            .map_err(|e| Error::Ocr(format!("failed to send image to tesseract: {}", e)))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| Error::Ocr(format!("tesseract did not finish: {}", e)))?;

    if !output.status.success() {
        return Err(Error::Ocr(format!(
            "tesseract exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// OCR a single page of the PDF at `pdf_path`.
pub fn ocr_page(config: &ToolConfig, pdf_path: &Path, page: u32) -> Option<String> {
    let result = render::render_page_png(config, pdf_path, page, config.ocr_dpi)
        .and_then(|png| recognize_png(config, &png));

    match result {
        Ok(text) => Some(text),
        Err(e) => {
            warn!(page, path = %pdf_path.display(), error = %e, "OCR failed");
            None
        }
    }
}

/// Write a copy of `input` with a searchable text layer to `output`.
pub fn make_searchable(config: &ToolConfig, input: &Path, output: &Path) -> bool {
    match run_ocrmypdf(config, input, output) {
        Ok(()) => {
            info!(output = %output.display(), "searchable PDF created");
            true
        }
        Err(e) => {
            warn!(input = %input.display(), error = %e, "could not create searchable PDF");
            false
        }
    }
}

fn run_ocrmypdf(config: &ToolConfig, input: &Path, output: &Path) -> Result<()> {
    let mut cmd = Command::new(&config.ocrmypdf);
    cmd.arg("--language").arg(&config.language);
    if config.deskew {
        cmd.arg("--deskew");
    }
    if config.remove_background {
        cmd.arg("--remove-background");
    }
    cmd.arg(input).arg(output);
    debug!(?cmd, "running ocrmypdf");

    let result = cmd.output().map_err(|e| spawn_error(&config.ocrmypdf, e))?;
    if !result.status.success() {
        return Err(Error::Ocr(format!(
            "ocrmypdf exited with {}: {}",
            result.status,
            String::from_utf8_lossy(&result.stderr).trim()
        )));
    }
    Ok(())
}

fn spawn_error(program: &Path, e: std::io::Error) -> Error {
    if e.kind() == ErrorKind::NotFound {
        Error::Ocr(format!(
            "{} not found; install it or point the tool at it with the matching option",
            program.display()
        ))
    } else {
        Error::Ocr(format!("failed to run {}: {}", program.display(), e))
    }
}
