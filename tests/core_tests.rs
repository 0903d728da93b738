// tests/core_tests.rs
use monsterbook_core::{BookMetadata, Entries, TabColor, CARDS_PER_PAGE};

#[test]
fn test_book_covers_every_card() {
    let book = BookMetadata::standard();
    assert_eq!(book.total_cards(), 414);

    let last = &book.pages[book.len() - 1];
    assert_eq!(last.entry_offset + last.card_count, book.total_cards());
    assert!(book.pages.iter().all(|page| page.card_count as usize <= CARDS_PER_PAGE));
}

#[test]
fn test_tabs_are_contiguous() {
    let book = BookMetadata::standard();
    let labels: Vec<String> = book.pages[..5].iter().map(|page| page.label()).collect();
    assert_eq!(
        labels,
        vec!["00_red_0", "01_orange_0", "02_orange_1", "03_orange_2", "04_lightgreen_0"]
    );
    assert_eq!(book.pages[11].tab_color, TabColor::LightBlue);
}

#[test]
fn test_entries_by_global_offset() {
    let book = BookMetadata::standard();
    let names: Vec<String> = (0..book.total_cards()).map(|i| format!("card {}", i)).collect();
    let entries = Entries::from_names(names);

    let page = &book.pages[2];
    assert_eq!(entries.name(page.entry_offset + 4), Some("card 42"));
    assert_eq!(entries.name(book.total_cards()), None);
}

#[test]
fn test_metadata_json() -> anyhow::Result<()> {
    let book = BookMetadata::standard();
    let json = serde_json::to_value(&book)?;
    assert_eq!(json["pages"][4]["tab_color"], "lightgreen");
    assert_eq!(json["pages"][4]["entry_offset"], 64);
    Ok(())
}
