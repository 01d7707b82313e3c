use anyhow::{Context, Result};
use std::path::Path;

use super::open_session;
use pdfdesk::config::ToolConfig;
use pdfdesk::session::ZOOM_LEVELS;

pub struct RenderOptions {
    pub page: u32,
    pub dpi: Option<u32>,
    pub zoom: Option<u32>,
}

pub fn run(
    path: &Path,
    options: &RenderOptions,
    output: &Path,
    config: &ToolConfig,
    password: Option<&str>,
) -> Result<()> {
    let mut session = open_session(path, password)?;

    if let Some(zoom) = options.zoom {
        if !session.set_zoom_percent(zoom) {
            anyhow::bail!("Unsupported zoom {}%, expected one of {:?}", zoom, ZOOM_LEVELS);
        }
    }
    let dpi = options.dpi.unwrap_or_else(|| session.display_dpi());

    let Some(png) = session.render_page(config, options.page, dpi) else {
        anyhow::bail!(
            "Could not render page {} of {}",
            options.page,
            path.display()
        );
    };

    std::fs::write(output, &png)
        .with_context(|| format!("Failed to write image: {}", output.display()))?;

    println!(
        "Rendered page {} at {} dpi to {}",
        options.page,
        dpi,
        output.display()
    );

    Ok(())
}
