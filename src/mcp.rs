use anyhow::Result;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use pdfdesk::config::ToolConfig;
use pdfdesk::session::Session;

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PathRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
    #[schemars(description = "Password, if the PDF is encrypted")]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfExtractRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Pages to extract (e.g., '1,3,5-7')")]
    pub pages: String,
    #[schemars(description = "Output file path")]
    pub output: String,
    #[schemars(description = "Password, if the PDF is encrypted")]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfDeleteRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
    #[schemars(description = "Pages to delete (e.g., '1,3,5-7')")]
    pub pages: String,
    #[schemars(description = "Output file path (default: overwrite the input)")]
    pub output: Option<String>,
    #[schemars(description = "Password, if the PDF is encrypted")]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfRenderRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
    #[schemars(description = "Page number (1-based)")]
    pub page: u32,
    #[schemars(description = "Output PNG file path")]
    pub output: String,
    #[schemars(description = "Resolution in DPI (default: 200, or derived from zoom)")]
    pub dpi: Option<u32>,
    #[schemars(description = "Zoom percent: 50, 75, 100, 125, 150 or 200")]
    pub zoom: Option<u32>,
    #[schemars(description = "Password, if the PDF is encrypted")]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfOcrPageRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
    #[schemars(description = "Page number (1-based)")]
    pub page: u32,
    #[schemars(description = "Password, if the PDF is encrypted")]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfSearchableRequest {
    #[schemars(description = "Path to the scanned PDF file")]
    pub path: String,
    #[schemars(description = "Output file path")]
    pub output: String,
    #[schemars(description = "Password, if the PDF is encrypted")]
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PdfServer {
    config: ToolConfig,
    tool_router: ToolRouter<Self>,
}

impl PdfServer {
    pub fn new(config: ToolConfig) -> Self {
        Self {
            config,
            tool_router: Self::tool_router(),
        }
    }
}

fn open_session(path: &str, password: Option<&str>) -> Result<Session, String> {
    let mut session = Session::new();
    session
        .open(path, password)
        .map_err(|e| format!("Error: failed to open {}: {}", path, e))?;
    Ok(session)
}

fn to_json<T: Serialize>(result: &T) -> String {
    serde_json::to_string_pretty(result).unwrap_or_else(|e| format!("Error: {}", e))
}

#[tool_router]
impl PdfServer {
    #[tool(description = "Get the page count and metadata (title, author, subject, creator, producer) of a PDF")]
    fn pdf_info(&self, Parameters(req): Parameters<PathRequest>) -> String {
        let session = match open_session(&req.path, req.password.as_deref()) {
            Ok(s) => s,
            Err(e) => return e,
        };
        let Some(doc) = session.document() else {
            return "Error: no PDF document open".to_string();
        };
        let info = doc.get_info();

        to_json(&PdfInfoResult {
            path: req.path,
            page_count: info.page_count,
            encrypted: doc.encrypted,
            title: info.title,
            author: info.author,
            subject: info.subject,
            creator: info.creator,
            producer: info.producer,
        })
    }

    #[tool(description = "Copy specific pages of a PDF into a new file. Pages use the syntax '1,3,5-7'; output keeps page-number order.")]
    fn pdf_extract(&self, Parameters(req): Parameters<PdfExtractRequest>) -> String {
        let session = match open_session(&req.path, req.password.as_deref()) {
            Ok(s) => s,
            Err(e) => return e,
        };

        match session.extract_pages(&req.pages, Path::new(&req.output)) {
            Ok(page_count) => to_json(&ExtractResult {
                output_path: req.output,
                page_count,
            }),
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(description = "Delete pages from a PDF and save the result, overwriting the input unless an output path is given. Pages use the syntax '1,3,5-7'.")]
    fn pdf_delete(&self, Parameters(req): Parameters<PdfDeleteRequest>) -> String {
        let mut session = match open_session(&req.path, req.password.as_deref()) {
            Ok(s) => s,
            Err(e) => return e,
        };
        let before = session.page_count();

        let remaining = match session.delete_pages(&req.pages) {
            Ok(n) => n,
            Err(e) => return format!("Error: {}", e),
        };

        match session.save(req.output.as_deref().map(Path::new)) {
            Ok(saved) => to_json(&DeleteResult {
                output_path: saved.display().to_string(),
                deleted: before - remaining,
                page_count: remaining,
            }),
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(description = "Render one page of a PDF to a PNG file")]
    fn pdf_render(&self, Parameters(req): Parameters<PdfRenderRequest>) -> String {
        let mut session = match open_session(&req.path, req.password.as_deref()) {
            Ok(s) => s,
            Err(e) => return e,
        };

        if let Some(zoom) = req.zoom {
            if !session.set_zoom_percent(zoom) {
                return format!("Error: unsupported zoom {}%", zoom);
            }
        }
        if !session.go_to_page(req.page) && session.current_page() != req.page {
            return format!(
                "Error: page {} is out of range (1-{})",
                req.page,
                session.page_count()
            );
        }

        let dpi = req.dpi.unwrap_or_else(|| session.display_dpi());
        let png = match req.dpi {
            Some(dpi) => session.render_page(&self.config, req.page, dpi),
            None => session.render_current_page(&self.config),
        };
        let Some(png) = png else {
            return format!("Error: could not render page {}", req.page);
        };

        if let Err(e) = std::fs::write(&req.output, &png) {
            return format!("Error: failed to write {}: {}", req.output, e);
        }

        to_json(&RenderResult {
            output_path: req.output,
            page: req.page,
            dpi,
            bytes: png.len(),
        })
    }

    #[tool(description = "Recognise the text on one page of a scanned PDF with tesseract. Blocks until OCR finishes.")]
    fn pdf_ocr_page(&self, Parameters(req): Parameters<PdfOcrPageRequest>) -> String {
        let mut session = match open_session(&req.path, req.password.as_deref()) {
            Ok(s) => s,
            Err(e) => return e,
        };

        match session.ocr_page(&self.config, req.page) {
            Some(text) => to_json(&PageTextResult {
                page: req.page,
                text,
            }),
            None => format!("Error: OCR failed on page {}", req.page),
        }
    }

    #[tool(description = "Create a searchable copy of a scanned PDF with ocrmypdf. Blocks until OCR finishes, which can take minutes.")]
    fn pdf_make_searchable(&self, Parameters(req): Parameters<PdfSearchableRequest>) -> String {
        let mut session = match open_session(&req.path, req.password.as_deref()) {
            Ok(s) => s,
            Err(e) => return e,
        };

        let success = session.make_searchable(&self.config, Path::new(&req.output));
        if !success {
            return format!(
                "Error: failed to create searchable PDF; make sure {} is installed",
                self.config.ocrmypdf.display()
            );
        }

        to_json(&SearchableResult {
            output_path: req.output,
            success,
        })
    }
}

// Result types for MCP tools

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PdfInfoResult {
    pub path: String,
    pub page_count: u32,
    pub encrypted: bool,
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ExtractResult {
    pub output_path: String,
    pub page_count: u32,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct DeleteResult {
    pub output_path: String,
    pub deleted: u32,
    pub page_count: u32,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct RenderResult {
    pub output_path: String,
    pub page: u32,
    pub dpi: u32,
    pub bytes: usize,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PageTextResult {
    pub page: u32,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SearchableResult {
    pub output_path: String,
    pub success: bool,
}

#[tool_handler]
impl ServerHandler for PdfServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "PDF page editing tools. Use pdf_info for page count and metadata, pdf_extract \
                 to copy page ranges into a new PDF, pdf_delete to remove pages, pdf_render to \
                 rasterise a page, pdf_ocr_page to read text from a scanned page, and \
                 pdf_make_searchable to add a text layer to a scanned PDF. Page ranges look \
                 like '1,3,5-7'."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server(config: ToolConfig) -> Result<()> {
    let server = PdfServer::new(config);

    // Serve using stdin/stdout as a tuple
    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> PdfServer {
        PdfServer::new(ToolConfig::default())
    }

    #[test]
    fn test_missing_file_reports_error() {
        let out = server().pdf_info(Parameters(PathRequest {
            path: "/nonexistent/file.pdf".to_string(),
            password: None,
        }));
        assert!(out.starts_with("Error:"), "{}", out);
    }

    #[test]
    fn test_delete_missing_file_reports_error() {
        let out = server().pdf_delete(Parameters(PdfDeleteRequest {
            path: "/nonexistent/file.pdf".to_string(),
            pages: "1".to_string(),
            output: None,
            password: None,
        }));
        assert!(out.starts_with("Error:"), "{}", out);
    }

    #[test]
    fn test_server_advertises_tools() {
        let info = server().get_info();
        assert!(info.capabilities.tools.is_some());
    }
}
