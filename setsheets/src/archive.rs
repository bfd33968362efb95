use log::info;
use std::path::PathBuf;

use crate::allocate::{allocate, image_count};
use crate::error::{Error, Result};
use crate::pack::pack;
use crate::pdf::sheets_to_pdf;
use crate::persist::{write_cards, write_pdf, write_sheets};
use crate::scryfall::{ImageVersion, check_edition, fetch_edition, fetch_images, image_plan};
use crate::scryfall_client::ScryfallClient;
use crate::slot::GridShape;

#[derive(Debug, Clone)]
pub struct ArchiveConfig {
    pub edition: String,
    pub grid: GridShape,
    pub image_version: ImageVersion,
    pub out_dir: PathBuf,
    pub progress: bool,
    pub pdf: bool,
}

#[derive(Debug)]
pub struct ArchiveSummary {
    pub cards: usize,
    pub images: usize,
    pub records: PathBuf,
    pub sheets: Vec<PathBuf>,
    pub pdf: Option<PathBuf>,
}

/// Fetches an edition and writes its card records, sheets and optionally a
/// pdf of the sheets to `config.out_dir`. Nothing is written unless every
/// card and image could be fetched and packed.
pub async fn archive_edition(client: &ScryfallClient, config: &ArchiveConfig) -> Result<ArchiveSummary> {
    let edition = config.edition.to_lowercase();
    if !check_edition(client, &edition).await? {
        return Err(Error::EditionNotFound(edition));
    }

    let cards = allocate(fetch_edition(client, &edition).await?, config.grid);
    let images = image_count(&cards);
    info!(
        "edition {} has {} cards with {} images, that is {} sheets",
        edition,
        cards.len(),
        images,
        config.grid.pages_for(images)
    );

    let plan = image_plan(&cards, config.image_version)?;
    let fetched = fetch_images(client, &plan, config.progress).await?;
    let sheets = pack(&fetched, config.grid)?;
    let pdf = if config.pdf && !sheets.is_empty() {
        Some(sheets_to_pdf(&edition, &sheets)?)
    } else {
        None
    };

    let records = write_cards(&config.out_dir, &edition, &cards)?;
    let sheet_paths = write_sheets(&config.out_dir, &edition, &sheets)?;
    let pdf = match pdf {
        Some(bytes) => Some(write_pdf(&config.out_dir, &edition, &bytes)?),
        None => None,
    };
    Ok(ArchiveSummary {
        cards: cards.len(),
        images,
        records,
        sheets: sheet_paths,
        pdf,
    })
}
