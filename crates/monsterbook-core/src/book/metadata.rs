//! Page metadata table
//!
//! Page indices produced by the page classifier index straight into this
//! table, so its order must match the order of the reference gallery.

use super::tab::TabColor;
use crate::CARDS_PER_PAGE;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Number of pages behind each tab, in tab order.
const TAB_COUNTS: [(TabColor, u8); 9] = [
    (TabColor::Red, 1),
    (TabColor::Orange, 3),
    (TabColor::LightGreen, 4),
    (TabColor::Green, 3),
    (TabColor::LightBlue, 3),
    (TabColor::Blue, 2),
    (TabColor::Purple, 2),
    (TabColor::Black, 2),
    (TabColor::Gold, 2),
];

/// Number of cards printed on each page, in page order.
#[rustfmt::skip]
const PAGE_CARD_COUNTS: [u32; 22] = [
    13,
    25, 25, 1,
    25, 25, 25, 10,
    25, 25, 20,
    25, 25, 1,
    25, 6,
    25, 8,
    25, 5,
    25, 25,
];

/// Metadata for a single book page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub page_id: u32,
    pub tab_color: TabColor,
    pub tab_index: u8,
    pub card_count: u32,
    /// Global offset of the first card on this page.
    pub entry_offset: u32,
}

impl PageMetadata {
    /// File stem used for the reference image of this page, e.g. `04_lightgreen_0`.
    pub fn label(&self) -> String {
        format!("{:02}_{}_{}", self.page_id, self.tab_color, self.tab_index)
    }
}

/// Ordered metadata for every page of the book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookMetadata {
    pub pages: Vec<PageMetadata>,
}

impl BookMetadata {
    /// The layout of the full book.
    pub fn standard() -> Self {
        let tabs: Vec<(TabColor, u8)> = TAB_COUNTS.to_vec();
        // The built-in tables always agree in length.
        Self::build(&tabs, &PAGE_CARD_COUNTS)
    }

    /// Build a table from per-tab page counts and per-page card counts.
    pub fn from_tabs(tabs: &[(TabColor, u8)], card_counts: &[u32]) -> Result<Self> {
        let pages: usize = tabs.iter().map(|(_, count)| *count as usize).sum();
        if pages != card_counts.len() {
            bail!(
                "tab table describes {} pages but {} card counts were given",
                pages,
                card_counts.len()
            );
        }
        if let Some(count) = card_counts.iter().find(|&&count| count as usize > CARDS_PER_PAGE) {
            bail!("a page cannot hold {} cards", count);
        }
        Ok(Self::build(tabs, card_counts))
    }

    fn build(tabs: &[(TabColor, u8)], card_counts: &[u32]) -> Self {
        let mut pages = Vec::with_capacity(card_counts.len());
        let mut entry_offset = 0;

        let slots = tabs
            .iter()
            .flat_map(|&(color, count)| (0..count).map(move |index| (color, index)));

        for (page_id, ((tab_color, tab_index), &card_count)) in
            slots.zip(card_counts.iter()).enumerate()
        {
            pages.push(PageMetadata {
                page_id: page_id as u32,
                tab_color,
                tab_index,
                card_count,
                entry_offset,
            });
            entry_offset += card_count;
        }

        Self { pages }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn page(&self, page_index: usize) -> Option<&PageMetadata> {
        self.pages.get(page_index)
    }

    /// Global offset of the first card on `page_index`.
    pub fn entry_offset(&self, page_index: usize) -> Option<u32> {
        self.page(page_index).map(|page| page.entry_offset)
    }

    /// Total number of cards across the book.
    pub fn total_cards(&self) -> u32 {
        self.pages.iter().map(|page| page.card_count).sum()
    }
}

impl Default for BookMetadata {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_layout() {
        let book = BookMetadata::standard();
        assert_eq!(book.len(), 22);
        assert_eq!(book.pages[0].tab_color, TabColor::Red);
        assert_eq!(book.pages[21].tab_color, TabColor::Gold);
        assert_eq!(book.pages[21].tab_index, 1);
    }

    #[test]
    fn test_entry_offsets_are_cumulative() {
        let book = BookMetadata::standard();
        assert_eq!(book.entry_offset(0), Some(0));
        assert_eq!(book.entry_offset(1), Some(13));
        assert_eq!(book.entry_offset(2), Some(38));
        assert_eq!(book.entry_offset(4), Some(64));
        assert_eq!(book.entry_offset(22), None);
    }

    #[test]
    fn test_label() {
        let book = BookMetadata::standard();
        assert_eq!(book.pages[4].label(), "04_lightgreen_0");
    }

    #[test]
    fn test_from_tabs_length_mismatch() {
        let result = BookMetadata::from_tabs(&[(TabColor::Red, 2)], &[25]);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_tabs_overfull_page() {
        assert!(BookMetadata::from_tabs(&[(TabColor::Red, 1)], &[26]).is_err());
        let book = BookMetadata::from_tabs(&[(TabColor::Red, 1), (TabColor::Gold, 1)], &[25, 3]).unwrap();
        assert_eq!(book.entry_offset(1), Some(25));
        assert_eq!(book.total_cards(), 28);
    }
}
