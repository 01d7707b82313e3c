use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use pdfdesk::config::ToolConfig;

#[derive(Parser)]
#[command(name = "pdfdesk")]
#[command(about = "Open, edit, render and OCR PDF documents, with MCP server support")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args)]
pub struct GlobalArgs {
    /// Password for encrypted PDFs
    #[arg(long, global = true, env = "PDFDESK_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// OCR language(s), e.g. "eng" or "eng+deu"
    #[arg(long, global = true, env = "PDFDESK_LANG")]
    pub lang: Option<String>,

    /// Path to the tesseract executable
    #[arg(long, global = true, env = "PDFDESK_TESSERACT")]
    pub tesseract: Option<PathBuf>,

    /// Path to the ocrmypdf executable
    #[arg(long, global = true, env = "PDFDESK_OCRMYPDF")]
    pub ocrmypdf: Option<PathBuf>,

    /// Path to poppler's pdftoppm executable
    #[arg(long, global = true, env = "PDFDESK_PDFTOPPM")]
    pub pdftoppm: Option<PathBuf>,
}

impl GlobalArgs {
    pub fn tool_config(&self) -> ToolConfig {
        ToolConfig::with_overrides(
            self.pdftoppm.clone(),
            self.tesseract.clone(),
            self.ocrmypdf.clone(),
            self.lang.clone(),
        )
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as MCP server
    Mcp,

    /// Display page count and PDF metadata
    Info {
        /// PDF file to inspect
        path: PathBuf,
    },

    /// Extract pages to a new PDF
    #[command(alias = "cat")]
    Extract {
        /// PDF file to extract from
        path: PathBuf,

        /// Pages to extract (e.g., "1,3,5-7")
        pages: String,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Delete pages from a PDF
    Delete {
        /// PDF file to edit
        path: PathBuf,

        /// Pages to delete (e.g., "1,3,5-7")
        pages: String,

        /// Write the result here instead of overwriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render a page to a PNG image
    Render {
        /// PDF file to render
        path: PathBuf,

        /// Page number (1-based)
        page: u32,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,

        /// Resolution in dots per inch
        #[arg(long, conflicts_with = "zoom")]
        dpi: Option<u32>,

        /// Zoom level in percent (50, 75, 100, 125, 150 or 200)
        #[arg(long)]
        zoom: Option<u32>,
    },

    /// Recognise the text on a page
    Ocr {
        /// PDF file to read
        path: PathBuf,

        /// Page number (1-based)
        page: u32,
    },

    /// Create a searchable copy of a scanned PDF
    Searchable {
        /// Scanned PDF
        input: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_delete_in_place() {
        let cli = Cli::try_parse_from(["pdfdesk", "delete", "in.pdf", "2,4"]).unwrap();
        match cli.command {
            Commands::Delete { pages, output, .. } => {
                assert_eq!(pages, "2,4");
                assert!(output.is_none());
            }
            _ => panic!("expected delete"),
        }
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "pdfdesk",
            "ocr",
            "scan.pdf",
            "1",
            "--lang",
            "deu",
            "--tesseract",
            "/opt/tess",
        ])
        .unwrap();
        let config = cli.global.tool_config();
        assert_eq!(config.language, "deu");
        assert_eq!(config.tesseract, PathBuf::from("/opt/tess"));
    }

    #[test]
    fn test_dpi_conflicts_with_zoom() {
        assert!(Cli::try_parse_from([
            "pdfdesk", "render", "a.pdf", "1", "-o", "a.png", "--dpi", "300", "--zoom", "150",
        ])
        .is_err());
    }
}
