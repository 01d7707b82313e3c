//! Page-level PDF editing: resolve page ranges, extract and delete pages,
//! render pages and run OCR through external tools.

pub mod config;
pub mod error;
pub mod mutate;
pub mod ocr;
pub mod page_range;
pub mod pdf;
pub mod render;
pub mod session;

pub use error::{Error, Result};
pub use page_range::{resolve, PageSet};
pub use session::Session;
