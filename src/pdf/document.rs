use lopdf::{Document, Object, ObjectId};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Error, Result};
use crate::mutate::PageStore;

#[derive(Debug, Clone)]
pub struct PdfDocument {
    pub doc: Document,
    pub path: PathBuf,
    /// The file on disk is encrypted; external tools get a decrypted snapshot
    pub encrypted: bool,
}

impl PdfDocument {
    /// Load a PDF. Encrypted files open only when their user password is
    /// empty; lopdf decrypts those while loading. Files that need a real
    /// user password are rejected, after checking `password`, because lopdf
    /// cannot decrypt them.
    pub fn open<P: AsRef<Path>>(path: P, password: Option<&str>) -> Result<Self> {
        let path = path.as_ref();
        let mut doc = Document::load(path)?;
        let encrypted = doc.is_encrypted();

        if encrypted {
            if doc.encryption_state.is_none() {
                doc.authenticate_password(password.unwrap_or(""))
                    .map_err(|_| Error::Password)?;
                return Err(Error::UnsupportedEncryption);
            }
            debug!(path = %path.display(), "document was decrypted with the empty user password");
            strip_encryption(&mut doc);
        }

        Ok(PdfDocument {
            doc,
            path: path.to_path_buf(),
            encrypted,
        })
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Get 1-indexed page object IDs
    pub fn page_ids(&self) -> Vec<(u32, ObjectId)> {
        // get_pages is a BTreeMap, already ordered by page number
        self.doc.get_pages().into_iter().collect()
    }

    /// Get metadata from the document info dictionary
    pub fn get_info(&self) -> PdfInfo {
        let dict = self
            .doc
            .trailer
            .get(b"Info")
            .and_then(Object::as_reference)
            .and_then(|id| self.doc.get_dictionary(id))
            .ok();

        let field = |key: &[u8]| dict.and_then(|d| get_string_from_dict(d, key));

        PdfInfo {
            title: field(b"Title"),
            author: field(b"Author"),
            subject: field(b"Subject"),
            creator: field(b"Creator"),
            producer: field(b"Producer"),
            page_count: self.page_count(),
        }
    }

    /// Save to a file, dropping objects no page refers to any more.
    pub fn save_to<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.doc.prune_objects();
        self.doc.save(path.as_ref())?;
        Ok(())
    }
}

impl PageStore for PdfDocument {
    fn page_count(&self) -> u32 {
        PdfDocument::page_count(self)
    }

    fn remove_page(&mut self, page: u32) -> Result<()> {
        let before = self.page_count();
        if page == 0 || page > before {
            return Err(Error::DocumentMutation(format!(
                "page {} is out of range (1-{})",
                page, before
            )));
        }

        self.doc.delete_pages(&[page]);

        if self.page_count() + 1 != before {
            return Err(Error::DocumentMutation(format!(
                "page {} could not be removed from the page tree",
                page
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct PdfInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub page_count: u32,
}

/// Drop the encryption dictionary from an already decrypted document, so it
/// saves as a plain PDF instead of plaintext objects under an /Encrypt entry.
fn strip_encryption(doc: &mut Document) {
    if let Some(Ok(id)) = doc.trailer.remove(b"Encrypt").map(|o| o.as_reference()) {
        doc.objects.remove(&id);
    }
    doc.encryption_state = None;
}

fn get_string_from_dict(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok()? {
        Object::String(bytes, _) => decode_pdf_string(bytes),
        _ => None,
    }
}

fn decode_pdf_string(bytes: &[u8]) -> Option<String> {
    match bytes {
        // UTF-16 BE with BOM
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16(&units).ok()
        }
        // PDFDocEncoding, approximated as Latin-1
        _ => Some(bytes.iter().map(|&b| b as char).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutate;
    use crate::page_range::resolve;
    use crate::pdf::testing::{create_test_pdf, encrypt_test_pdf, page_markers};

    #[test]
    fn test_open_and_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = create_test_pdf(dir.path(), "five.pdf", 5);
        let doc = PdfDocument::open(&path, None).unwrap();
        assert_eq!(doc.page_count(), 5);
        assert_eq!(page_markers(&doc), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(PdfDocument::open(dir.path().join("nope.pdf"), None).is_err());
    }

    #[test]
    fn test_delete_two_of_five() {
        let dir = tempfile::tempdir().unwrap();
        let path = create_test_pdf(dir.path(), "five.pdf", 5);
        let mut doc = PdfDocument::open(&path, None).unwrap();

        let pages = resolve("2,4", doc.page_count()).unwrap();
        mutate::delete(&mut doc, &pages).unwrap();

        assert_eq!(doc.page_count(), 3);
        assert_eq!(page_markers(&doc), vec![1, 3, 5]);
    }

    #[test]
    fn test_delete_survives_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = create_test_pdf(dir.path(), "five.pdf", 5);
        let mut doc = PdfDocument::open(&path, None).unwrap();

        mutate::delete(&mut doc, &resolve("1-2", 5).unwrap()).unwrap();
        let out = dir.path().join("out.pdf");
        doc.save_to(&out).unwrap();

        let reopened = PdfDocument::open(&out, None).unwrap();
        assert_eq!(page_markers(&reopened), vec![3, 4, 5]);
    }

    #[test]
    fn test_extract_any_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = create_test_pdf(dir.path(), "five.pdf", 5);
        let doc = PdfDocument::open(&path, None).unwrap();

        let pages = resolve("3,1", doc.page_count()).unwrap();
        let mut extracted = mutate::extract(&doc, &pages);
        assert_eq!(extracted.page_count(), 2);
        assert_eq!(page_markers(&extracted), vec![1, 3]);

        let out = dir.path().join("extracted.pdf");
        extracted.save_to(&out).unwrap();
        let reopened = PdfDocument::open(&out, None).unwrap();
        assert_eq!(page_markers(&reopened), vec![1, 3]);

        // source is not mutated by extraction
        assert_eq!(doc.page_count(), 5);
    }

    #[test]
    fn test_remove_page_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = create_test_pdf(dir.path(), "two.pdf", 2);
        let mut doc = PdfDocument::open(&path, None).unwrap();
        assert!(matches!(
            doc.remove_page(3),
            Err(Error::DocumentMutation(_))
        ));
        assert_eq!(doc.page_count(), 2);
    }

    #[test]
    fn test_info_page_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = create_test_pdf(dir.path(), "three.pdf", 3);
        let info = PdfDocument::open(&path, None).unwrap().get_info();
        assert_eq!(info.page_count, 3);
        assert_eq!(info.title.as_deref(), Some("Test Document"));
    }

    #[test]
    fn test_decode_utf16_title() {
        let bytes = [0xFE, 0xFF, 0x00, b'H', 0x00, b'i'];
        assert_eq!(decode_pdf_string(&bytes).as_deref(), Some("Hi"));
        assert_eq!(decode_pdf_string(b"plain").as_deref(), Some("plain"));
    }

    #[test]
    fn test_open_empty_user_password() {
        let dir = tempfile::tempdir().unwrap();
        let plain = create_test_pdf(dir.path(), "plain.pdf", 5);
        let path = encrypt_test_pdf(&plain, &dir.path().join("enc.pdf"), "");

        let mut doc = PdfDocument::open(&path, None).unwrap();
        assert!(doc.encrypted);
        assert!(!doc.doc.is_encrypted());
        assert_eq!(page_markers(&doc), vec![1, 2, 3, 4, 5]);
        assert_eq!(doc.get_info().title.as_deref(), Some("Test Document"));

        // saves as an ordinary PDF with readable strings
        let out = dir.path().join("out.pdf");
        doc.save_to(&out).unwrap();
        let reopened = PdfDocument::open(&out, None).unwrap();
        assert!(!reopened.encrypted);
        assert_eq!(page_markers(&reopened), vec![1, 2, 3, 4, 5]);
        assert_eq!(reopened.get_info().title.as_deref(), Some("Test Document"));
    }

    #[test]
    fn test_open_user_password_protected() {
        let dir = tempfile::tempdir().unwrap();
        let plain = create_test_pdf(dir.path(), "plain.pdf", 5);
        let path = encrypt_test_pdf(&plain, &dir.path().join("enc.pdf"), "secret");

        assert!(matches!(
            PdfDocument::open(&path, Some("secret")),
            Err(Error::UnsupportedEncryption)
        ));
        assert!(matches!(
            PdfDocument::open(&path, Some("wrong")),
            Err(Error::Password)
        ));
        assert!(matches!(PdfDocument::open(&path, None), Err(Error::Password)));
    }
}
