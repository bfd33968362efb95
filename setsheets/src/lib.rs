//! Archives one scryfall edition: every card gets a slot on a grid of sheets,
//! the card images are composited onto those sheets and the sheets are
//! written next to the card records.

mod allocate;
pub use crate::allocate::{SlotCursor, allocate, annotate, image_count};

mod archive;
pub use crate::archive::{ArchiveConfig, ArchiveSummary, archive_edition};

mod error;
pub use crate::error::{Error, Result};

mod logger;
pub use crate::logger::setup_logger;

mod pack;
pub use crate::pack::pack;

mod pdf;
pub use crate::pdf::sheets_to_pdf;

mod persist;
pub use crate::persist::{card_records, sheet_path, write_cards, write_pdf, write_sheets};

mod scryfall;
pub use crate::scryfall::{
    Card, CardFace, CardImages, ImageUris, ImageVersion, Layout, ScryfallSearchAnswer,
    check_edition, fetch_edition, fetch_images, image_plan, is_edition_code, parse_search_answer,
    query_image_uri,
};

mod scryfall_client;
pub use crate::scryfall_client::{SCRYFALL_COOLDOWN, ScryfallClient};

mod slot;
pub use crate::slot::{DEFAULT_COLS, DEFAULT_ROWS, GridShape, Position, Slot};
