//! Static book data shared by the capture pipeline and the CLI.
//!
//! The monster book is split into coloured tabs, each tab into pages of up
//! to 25 cards. Every card has a global entry offset, which is the key used
//! to look up its name in the entry list.

pub mod book;
pub mod entries;

pub use book::{BookMetadata, PageMetadata, TabColor};
pub use entries::Entries;

/// Number of card slots on a single page.
pub const CARDS_PER_PAGE: usize = 25;
