use std::path::{Path, PathBuf};

/// Locations and options for the external programs the tool drives.
#[derive(Debug, Clone)]
pub struct ToolConfig {
    /// poppler's rasteriser
    pub pdftoppm: PathBuf,
    pub tesseract: PathBuf,
    pub ocrmypdf: PathBuf,
    /// Tesseract language code(s), e.g. "eng" or "eng+deu"
    pub language: String,
    /// Resolution pages are rendered at before OCR
    pub ocr_dpi: u32,
    pub deskew: bool,
    pub remove_background: bool,
}

impl Default for ToolConfig {
    fn default() -> Self {
        ToolConfig {
            pdftoppm: PathBuf::from("pdftoppm"),
            tesseract: discover_tesseract(),
            ocrmypdf: PathBuf::from("ocrmypdf"),
            language: "eng".to_string(),
            ocr_dpi: 300,
            deskew: true,
            remove_background: true,
        }
    }
}

impl ToolConfig {
    /// Defaults with any explicitly given program paths and language applied.
    pub fn with_overrides(
        pdftoppm: Option<PathBuf>,
        tesseract: Option<PathBuf>,
        ocrmypdf: Option<PathBuf>,
        language: Option<String>,
    ) -> Self {
        let defaults = ToolConfig::default();
        ToolConfig {
            pdftoppm: pdftoppm.unwrap_or(defaults.pdftoppm),
            tesseract: tesseract.unwrap_or(defaults.tesseract),
            ocrmypdf: ocrmypdf.unwrap_or(defaults.ocrmypdf),
            language: language.unwrap_or(defaults.language),
            ..defaults
        }
    }
}

/// Find tesseract when no path was configured. On Windows the installer does
/// not put it on PATH, so check the usual install locations first.
fn discover_tesseract() -> PathBuf {
    if cfg!(windows) {
        if let Some(found) = windows_tesseract_candidates()
            .into_iter()
            .find(|p| p.exists())
        {
            return found;
        }
    }
    PathBuf::from("tesseract")
}

fn windows_tesseract_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![
        PathBuf::from(r"C:\Program Files\Tesseract-OCR\tesseract.exe"),
        PathBuf::from(r"C:\Program Files (x86)\Tesseract-OCR\tesseract.exe"),
    ];
    if let Ok(user) = std::env::var("USERNAME") {
        candidates.push(
            Path::new(r"C:\Users")
                .join(user)
                .join(r"AppData\Local\Tesseract-OCR\tesseract.exe"),
        );
    }
    candidates
}
