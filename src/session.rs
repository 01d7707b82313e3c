//! The state of one open document: what is loaded, which page is shown, the
//! zoom, and whether there are edits not yet written to disk.
//!
//! Edits only reach disk through [`Session::save`]. Extraction and rendering
//! while deletions are pending see the edited in-memory document.

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::ToolConfig;
use crate::error::{Error, Result};
use crate::mutate::{self, PageStore};
use crate::ocr;
use crate::page_range::{self, PageSet};
use crate::pdf::PdfDocument;
use crate::render;

/// Zoom steps in percent.
pub const ZOOM_LEVELS: [u32; 6] = [50, 75, 100, 125, 150, 200];
const DEFAULT_ZOOM_INDEX: usize = 2;

#[derive(Debug)]
pub struct Session {
    document: Option<PdfDocument>,
    current_page: u32,
    zoom_index: usize,
    modified: bool,
}

impl Default for Session {
    fn default() -> Self {
        Session {
            document: None,
            current_page: 0,
            zoom_index: DEFAULT_ZOOM_INDEX,
            modified: false,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `path`, replacing whatever was open before.
    pub fn open<P: AsRef<Path>>(&mut self, path: P, password: Option<&str>) -> Result<()> {
        let doc = PdfDocument::open(path, password)?;
        let count = doc.page_count();
        info!(path = %doc.path.display(), pages = count, "opened PDF");

        self.document = Some(doc);
        self.current_page = if count > 0 { 1 } else { 0 };
        self.modified = false;
        Ok(())
    }

    /// Write the document to `output`, or back over the file it came from.
    /// After saving elsewhere, the session continues on the new file.
    pub fn save(&mut self, output: Option<&Path>) -> Result<PathBuf> {
        let doc = self.document.as_mut().ok_or_else(Error::not_open)?;
        let target = output.map_or_else(|| doc.path.clone(), Path::to_path_buf);

        doc.save_to(&target)?;
        info!(path = %target.display(), "saved PDF");

        doc.path = target.clone();
        self.modified = false;
        Ok(target)
    }

    pub fn close(&mut self) {
        if self.modified {
            warn!("closing document with unsaved changes");
        }
        self.document = None;
        self.current_page = 0;
        self.modified = false;
    }

    pub fn is_open(&self) -> bool {
        self.document.is_some()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn document(&self) -> Option<&PdfDocument> {
        self.document.as_ref()
    }

    /// Pages in the open document, 0 when nothing is open.
    pub fn page_count(&self) -> u32 {
        self.document.as_ref().map_or(0, PdfDocument::page_count)
    }

    /// Resolve a range expression against the open document.
    pub fn resolve(&self, expression: &str) -> Result<PageSet> {
        if !self.is_open() {
            return Err(Error::not_open());
        }
        let pages = page_range::resolve(expression, self.page_count())?;
        if pages.is_empty() {
            return Err(Error::InvalidRange("no valid page numbers given".to_string()));
        }
        Ok(pages)
    }

    /// Write the pages named by `expression` to a new PDF at `output`.
    /// Returns the number of pages written.
    pub fn extract_pages(&self, expression: &str, output: &Path) -> Result<u32> {
        let pages = self.resolve(expression)?;
        let doc = self.document.as_ref().ok_or_else(Error::not_open)?;

        let mut extracted = mutate::extract(doc, &pages);
        extracted.save_to(output)?;

        let written = extracted.page_count();
        info!(pages = written, output = %output.display(), "extracted pages");
        Ok(written)
    }

    /// Remove the pages named by `expression` from the open document.
    /// Returns the new page count.
    pub fn delete_pages(&mut self, expression: &str) -> Result<u32> {
        let pages = self.resolve(expression)?;
        let doc = self.document.as_mut().ok_or_else(Error::not_open)?;

        // a failure part way through still leaves earlier removals applied
        let (result, changed) = delete_tracked(doc, &pages);
        let remaining = doc.page_count();
        if changed {
            self.modified = true;
        }

        self.current_page = self.current_page.min(remaining);
        if self.current_page == 0 && remaining > 0 {
            self.current_page = 1;
        }

        let removed = result?;
        info!(removed, remaining, "deleted pages");
        Ok(remaining)
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Move to `page` if it exists. Returns whether the page changed.
    pub fn go_to_page(&mut self, page: u32) -> bool {
        if page == 0 || page > self.page_count() || page == self.current_page {
            return false;
        }
        self.current_page = page;
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.current_page + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        self.go_to_page(self.current_page.saturating_sub(1))
    }

    pub fn zoom_percent(&self) -> u32 {
        ZOOM_LEVELS[self.zoom_index]
    }

    /// Select one of [`ZOOM_LEVELS`]. Other values are rejected.
    pub fn set_zoom_percent(&mut self, percent: u32) -> bool {
        match ZOOM_LEVELS.iter().position(|&z| z == percent) {
            Some(index) => {
                self.zoom_index = index;
                true
            }
            None => false,
        }
    }

    pub fn zoom_in(&mut self) {
        self.zoom_index = (self.zoom_index + 1).min(ZOOM_LEVELS.len() - 1);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_index = self.zoom_index.saturating_sub(1);
    }

    pub fn zoom_reset(&mut self) {
        self.zoom_index = DEFAULT_ZOOM_INDEX;
    }

    /// Rendering resolution for on-screen display at the current zoom.
    pub fn display_dpi(&self) -> u32 {
        render::DEFAULT_DPI * self.zoom_percent() / 100
    }

    /// Rasterise `page` to PNG. `None` if nothing is open, the page does not
    /// exist, or the renderer fails.
    pub fn render_page(&mut self, config: &ToolConfig, page: u32, dpi: u32) -> Option<Vec<u8>> {
        if !self.check_page(page) {
            return None;
        }
        self.with_file(|path| render::render_page_png(config, path, page, dpi))
            .map_err(|e| warn!(page, error = %e, "could not render page"))
            .ok()
    }

    pub fn render_current_page(&mut self, config: &ToolConfig) -> Option<Vec<u8>> {
        let (page, dpi) = (self.current_page, self.display_dpi());
        self.render_page(config, page, dpi)
    }

    /// OCR `page` of the document as it currently stands in memory.
    pub fn ocr_page(&mut self, config: &ToolConfig, page: u32) -> Option<String> {
        if !self.check_page(page) {
            return None;
        }
        self.with_file(|path| Ok(ocr::ocr_page(config, path, page)))
            .map_err(|e| warn!(page, error = %e, "could not prepare document for OCR"))
            .ok()
            .flatten()
    }

    /// Write a searchable copy of the current document to `output`.
    pub fn make_searchable(&mut self, config: &ToolConfig, output: &Path) -> bool {
        if !self.is_open() {
            warn!("no PDF document open");
            return false;
        }
        self.with_file(|path| Ok(ocr::make_searchable(config, path, output)))
            .unwrap_or_else(|e| {
                warn!(error = %e, "could not prepare document for OCR");
                false
            })
    }

    fn check_page(&self, page: u32) -> bool {
        if !self.is_open() {
            warn!("no PDF document open");
            return false;
        }
        let total = self.page_count();
        if page == 0 || page > total {
            warn!(page, total, "page is out of bounds");
            return false;
        }
        true
    }

    /// Run `f` on a file holding the current document. External tools read
    /// the source file directly unless it has unsaved edits or needs a
    /// password, in which case they get a temporary decrypted snapshot.
    fn with_file<T>(&mut self, f: impl FnOnce(&Path) -> Result<T>) -> Result<T> {
        let modified = self.modified;
        let doc = self.document.as_mut().ok_or_else(Error::not_open)?;

        if !modified && !doc.encrypted {
            return f(&doc.path);
        }

        let snapshot = tempfile::Builder::new()
            .prefix("pdfdesk-")
            .suffix(".pdf")
            .tempfile()?;
        doc.doc.save(snapshot.path())?;
        f(snapshot.path())
    }
}

/// Delete `pages` from `store`, also reporting whether the page count changed.
fn delete_tracked<S: PageStore>(store: &mut S, pages: &PageSet) -> (Result<usize>, bool) {
    let before = store.page_count();
    let result = mutate::delete(store, pages);
    (result, store.page_count() != before)
}
