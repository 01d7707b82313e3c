use anyhow::Result;
use std::path::Path;

use super::open_session;
use pdfdesk::config::ToolConfig;

pub fn run(input: &Path, output: &Path, config: &ToolConfig, password: Option<&str>) -> Result<()> {
    let mut session = open_session(input, password)?;

    if !session.make_searchable(config, output) {
        anyhow::bail!(
            "Failed to create searchable PDF; make sure {} is installed",
            config.ocrmypdf.display()
        );
    }

    println!("Searchable PDF written to {}", output.display());

    Ok(())
}
