//! Applies a [`PageSet`] to an indexed page collection.
//!
//! Removing a page shifts every later page down by one, so a batch of
//! deletions must run from the highest page number to the lowest. Callers hand
//! over the ascending `PageSet`; the reversal happens here and nowhere else.

use tracing::{debug, warn};

use crate::error::Result;
use crate::page_range::PageSet;

/// An ordered collection of pages addressed by 1-based page number.
pub trait PageStore {
    fn page_count(&self) -> u32;

    /// Remove a single page. Pages after it move down by one.
    fn remove_page(&mut self, page: u32) -> Result<()>;
}

impl<T> PageStore for Vec<T> {
    fn page_count(&self) -> u32 {
        self.len() as u32
    }

    fn remove_page(&mut self, page: u32) -> Result<()> {
        let index = page
            .checked_sub(1)
            .filter(|&i| (i as usize) < self.len())
            .ok_or_else(|| {
                crate::error::Error::DocumentMutation(format!("page {} does not exist", page))
            })?;
        self.remove(index as usize);
        Ok(())
    }
}

/// Remove every page of `pages` from `store`.
///
/// Pages beyond the end of the store are skipped with a warning. Returns the
/// number of pages removed.
pub fn delete<S: PageStore>(store: &mut S, pages: &PageSet) -> Result<usize> {
    let total = store.page_count();
    let mut removed = 0;

    for page in pages.iter().rev() {
        if page == 0 || page > total {
            warn!(page, total, "page is out of bounds, not deleting");
            continue;
        }
        debug!(page, "removing page");
        store.remove_page(page)?;
        removed += 1;
    }

    Ok(removed)
}

/// Build a copy of `source` holding only the pages in `pages`, in ascending
/// page order.
///
/// Pages beyond the end of `source` are skipped with a warning. A page that
/// cannot be dropped from the copy is logged and left in place rather than
/// failing the whole extraction.
pub fn extract<S: PageStore + Clone>(source: &S, pages: &PageSet) -> S {
    let total = source.page_count();
    for page in pages.iter().filter(|&p| p == 0 || p > total) {
        warn!(page, total, "page is out of bounds, skipping");
    }

    let mut copy = source.clone();
    for page in (1..=total).rev().filter(|&p| !pages.contains(p)) {
        if let Err(e) = copy.remove_page(page) {
            warn!(page, error = %e, "could not drop page from extracted copy");
        }
    }

    copy
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(n: u32) -> Vec<u32> {
        (1..=n).collect()
    }

    fn set(pages: &[u32]) -> PageSet {
        pages.iter().copied().collect()
    }

    #[test]
    fn test_delete_keeps_remaining_order() {
        let mut pages = store(5);
        let removed = delete(&mut pages, &set(&[2, 4])).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(pages.page_count(), 3);
        assert_eq!(pages, vec![1, 3, 5]);
    }

    #[test]
    fn test_delete_skips_out_of_bounds() {
        let mut pages = store(3);
        let removed = delete(&mut pages, &set(&[1, 9])).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(pages, vec![2, 3]);
    }

    #[test]
    fn test_delete_everything() {
        let mut pages = store(4);
        delete(&mut pages, &set(&[1, 2, 3, 4])).unwrap();
        assert!(pages.is_empty());
    }

    #[test]
    fn test_extract_orders_by_page_number() {
        let pages = store(5);
        let extracted = extract(&pages, &set(&[3, 1]));
        assert_eq!(extracted, vec![1, 3]);
        // source untouched
        assert_eq!(pages, store(5));
    }

    #[test]
    fn test_extract_skips_out_of_bounds() {
        let extracted = extract(&store(3), &set(&[2, 7]));
        assert_eq!(extracted, vec![2]);
    }

    #[test]
    fn test_vec_remove_page_bounds() {
        let mut pages = store(2);
        assert!(pages.remove_page(0).is_err());
        assert!(pages.remove_page(3).is_err());
        assert!(pages.remove_page(2).is_ok());
    }

    // Every subset of every small document: deletion leaves exactly the
    // complement, extraction exactly the subset, both in page order.
    #[test]
    fn test_mutation_order_exhaustive() {
        for n in 0..=8u32 {
            for mask in 0u32..(1 << n) {
                let chosen: Vec<u32> = (1..=n).filter(|p| mask & (1 << (p - 1)) != 0).collect();
                let rest: Vec<u32> = (1..=n).filter(|p| mask & (1 << (p - 1)) == 0).collect();
                let selection = set(&chosen);

                let mut deleted = store(n);
                delete(&mut deleted, &selection).unwrap();
                assert_eq!(deleted, rest, "delete {:?} from {}", chosen, n);

                let extracted = extract(&store(n), &selection);
                assert_eq!(extracted, chosen, "extract {:?} from {}", chosen, n);
            }
        }
    }
}
