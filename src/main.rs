mod cli;
mod commands;
mod mcp;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries MCP traffic, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.global.tool_config();
    let password = cli.global.password.as_deref();

    match cli.command {
        Commands::Mcp => {
            mcp::run_server(config).await?;
        }
        Commands::Info { path } => {
            commands::info::run(&path, password)?;
        }
        Commands::Extract {
            path,
            pages,
            output,
        } => {
            commands::extract::run(&path, &pages, &output, password)?;
        }
        Commands::Delete {
            path,
            pages,
            output,
        } => {
            commands::delete::run(&path, &pages, output.as_deref(), password)?;
        }
        Commands::Render {
            path,
            page,
            output,
            dpi,
            zoom,
        } => {
            let options = commands::render::RenderOptions { page, dpi, zoom };
            commands::render::run(&path, &options, &output, &config, password)?;
        }
        Commands::Ocr { path, page } => {
            commands::ocr::run(&path, page, &config, password)?;
        }
        Commands::Searchable { input, output } => {
            commands::searchable::run(&input, &output, &config, password)?;
        }
    }

    Ok(())
}
