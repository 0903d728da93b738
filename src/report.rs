//! JSON report built from transcription results

use monsterbook_core::{Entries, PageMetadata};
use monsterbook_cv::TranscriptionResult;
use serde::Serialize;

/// One occupied card as written to the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardReport {
    pub uid: u32,
    pub slot: u32,
    pub name: Option<String>,
    pub count: u32,
}

/// Everything read from one screenshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageReport {
    pub source: String,
    pub layout_preset: String,
    pub page: PageMetadata,
    pub page_distance: u64,
    pub cards: Vec<CardReport>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BookReport {
    pub data: Vec<PageReport>,
}

impl BookReport {
    pub fn card_count(&self) -> usize {
        self.data.iter().map(|page| page.cards.len()).sum()
    }
}

/// Attach entry names to a transcription.
pub fn build_page_report(source: &str, result: &TranscriptionResult, entries: &Entries) -> PageReport {
    let cards = result
        .cells
        .iter()
        .map(|cell| CardReport {
            uid: cell.global_offset,
            slot: cell.slot_index,
            name: entries.name(cell.global_offset).map(str::to_string),
            count: cell.count_value,
        })
        .collect();

    PageReport {
        source: source.to_string(),
        layout_preset: result.layout_preset.clone(),
        page: result.page.clone(),
        page_distance: result.stats.page_distance,
        cards,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monsterbook_core::BookMetadata;
    use monsterbook_cv::buffer::filled;
    use monsterbook_cv::transcription::{CellRecord, TranscriptionStats};

    #[test]
    fn test_names_follow_global_offset() {
        let book = BookMetadata::standard();
        let page = book.pages[1].clone();
        let cell = |slot: u32, count: u32| CellRecord {
            slot_index: slot,
            global_offset: page.entry_offset + slot,
            count_value: count,
            image: filled(1, 1, [0; 4]),
        };
        let result = TranscriptionResult {
            matched_page_index: 1,
            layout_preset: "windowed-800x600".to_string(),
            page: page.clone(),
            cells: vec![cell(0, 0), cell(2, 3)],
            stats: TranscriptionStats {
                page_distance: 12,
                occupied_cells: 2,
                counted_cells: 1,
                processing_time_ms: 0,
            },
            cropped_capture: filled(1, 1, [0; 4]),
        };
        let mut names: Vec<String> = (0..20).map(|i| format!("monster {}", i)).collect();
        names[15] = String::new();
        let entries = Entries::from_names(names);

        let report = build_page_report("shot.png", &result, &entries);
        assert_eq!(report.cards.len(), 2);
        assert_eq!(report.cards[0].uid, 13);
        assert_eq!(report.cards[0].name.as_deref(), Some("monster 13"));
        assert_eq!(report.cards[1].uid, 15);
        assert_eq!(report.cards[1].name, None);
        assert_eq!(report.cards[1].count, 3);
    }
}
