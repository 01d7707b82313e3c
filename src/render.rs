use std::path::Path;
use std::process::Command;
use tracing::debug;

use crate::config::ToolConfig;
use crate::error::{Error, Result};

/// DPI used when no zoom or explicit resolution is given.
pub const DEFAULT_DPI: u32 = 200;

/// Rasterise one page of the PDF at `pdf_path` to PNG bytes with pdftoppm.
///
/// Blocks until pdftoppm exits.
pub fn render_page_png(config: &ToolConfig, pdf_path: &Path, page: u32, dpi: u32) -> Result<Vec<u8>> {
    if page == 0 {
        return Err(Error::Render("page numbers start at 1".to_string()));
    }

    let out_dir = tempfile::tempdir()?;
    let prefix = out_dir.path().join("page");

    let mut cmd = Command::new(&config.pdftoppm);
    cmd.arg("-f")
        .arg(page.to_string())
        .arg("-l")
        .arg(page.to_string())
        .arg("-r")
        .arg(dpi.to_string())
        .arg("-png")
        .arg("-singlefile")
        .arg(pdf_path)
        .arg(&prefix);
    debug!(?cmd, "rendering page");

    let output = cmd.output().map_err(|e| {
        Error::Render(format!(
            "failed to run {}: {}",
            config.pdftoppm.display(),
            e
        ))
    })?;

    if !output.status.success() {
        return Err(Error::Render(format!(
            "pdftoppm exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    // -singlefile writes exactly <prefix>.png
    std::fs::read(prefix.with_extension("png"))
        .map_err(|e| Error::Render(format!("no image produced for page {}: {}", page, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn missing_tools() -> ToolConfig {
        ToolConfig {
            pdftoppm: PathBuf::from("/nonexistent/pdftoppm"),
            ..ToolConfig::default()
        }
    }

    #[test]
    fn test_missing_renderer_is_render_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = crate::pdf::testing::create_test_pdf(dir.path(), "one.pdf", 1);
        assert!(matches!(
            render_page_png(&missing_tools(), &path, 1, DEFAULT_DPI),
            Err(Error::Render(_))
        ));
    }

    #[test]
    fn test_page_zero_rejected() {
        assert!(matches!(
            render_page_png(&ToolConfig::default(), Path::new("x.pdf"), 0, DEFAULT_DPI),
            Err(Error::Render(_))
        ));
    }
}
