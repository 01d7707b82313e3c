use std::collections::BTreeSet;

use crate::error::{Error, Result};

/// One comma-separated token of a range expression: a single page or an
/// inclusive `start-end` span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub start: u32,
    pub end: Option<u32>,
}

impl PageRange {
    /// Parse a single token like "5" or "5-7". The token must already be
    /// stripped of whitespace.
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::InvalidRange("empty page token".to_string()));
        }

        if let Some((start_str, end_str)) = s.split_once('-') {
            // "-5", "5-" and "1-2-3" all land here
            if start_str.is_empty() || end_str.is_empty() || end_str.contains('-') {
                return Err(Error::InvalidRange(format!("malformed range: {}", s)));
            }

            let start = parse_page_number(start_str)?;
            let end = parse_page_number(end_str)?;
            if start > end {
                return Err(Error::InvalidRange(format!(
                    "range {} starts after it ends",
                    s
                )));
            }

            Ok(PageRange {
                start,
                end: Some(end),
            })
        } else {
            Ok(PageRange {
                start: parse_page_number(s)?,
                end: None,
            })
        }
    }

    /// Expand this range into 1-based page numbers, checking bounds against
    /// `total_pages`.
    pub fn expand(&self, total_pages: u32) -> Result<impl Iterator<Item = u32>> {
        let end = self.end.unwrap_or(self.start);

        if self.start == 0 || end > total_pages {
            return Err(Error::InvalidRange(match self.end {
                Some(end) => format!(
                    "range {}-{} is out of bounds (1-{})",
                    self.start, end, total_pages
                ),
                None => format!(
                    "page {} is out of bounds (1-{})",
                    self.start, total_pages
                ),
            }));
        }

        Ok(self.start..=end)
    }
}

fn parse_page_number(s: &str) -> Result<u32> {
    s.parse::<u32>()
        .map_err(|_| Error::InvalidRange(format!("invalid page number: {}", s)))
}

/// Validated, deduplicated page numbers in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSet(Vec<u32>);

impl PageSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, page: u32) -> bool {
        self.0.binary_search(&page).is_ok()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = u32> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<u32> for PageSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let set: BTreeSet<u32> = iter.into_iter().collect();
        PageSet(set.into_iter().collect())
    }
}

/// Resolve a range expression like "1,3,5-7" against a document of
/// `total_pages` pages.
///
/// Whitespace anywhere in the expression is ignored. Overlapping tokens are
/// merged, so the result depends only on which pages are named. A blank
/// expression resolves to an empty set.
pub fn resolve(expression: &str, total_pages: u32) -> Result<PageSet> {
    let compact: String = expression.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Ok(PageSet::default());
    }

    let mut pages = BTreeSet::new();
    for token in compact.split(',') {
        pages.extend(PageRange::parse(token)?.expand(total_pages)?);
    }

    Ok(PageSet(pages.into_iter().collect()))
}
