use anyhow::Context;
use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::time::Duration;

use setsheets::{ArchiveConfig, GridShape, ImageVersion, ScryfallClient};

/// Fetch every card of an edition from scryfall and lay the card images out
/// on numbered sheets ({edition}_000.png, ...), together with the card data
/// as one json record per line ({edition}.json).
#[derive(Parser, Debug)]
struct Opts {
    /// edition code, e.g. isd
    #[arg(short, long)]
    edition: String,
    /// log every card while the images are downloaded
    #[arg(short, long)]
    progress: bool,
    /// rows of cards per sheet
    #[arg(long, default_value_t = setsheets::DEFAULT_ROWS)]
    rows: u32,
    /// columns of cards per sheet
    #[arg(long, default_value_t = setsheets::DEFAULT_COLS)]
    cols: u32,
    /// which scryfall image to put on the sheets
    #[arg(long, value_enum, default_value_t = ImageVersion::Png)]
    image_version: ImageVersion,
    /// directory for the output files
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,
    /// also write the sheets as a printable pdf ({edition}.pdf)
    #[arg(long)]
    pdf: bool,
    /// minimum time between two requests to scryfall
    #[arg(long, default_value_t = 50)]
    cooldown_ms: u64,
    /// debug output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();

    setsheets::setup_logger(if opts.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    })?;

    let config = ArchiveConfig {
        edition: opts.edition,
        grid: GridShape::new(opts.rows, opts.cols)?,
        image_version: opts.image_version,
        out_dir: opts.out_dir,
        progress: opts.progress,
        pdf: opts.pdf,
    };
    std::fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("couldn't create {}", config.out_dir.display()))?;

    let client = ScryfallClient::with_cooldown(Duration::from_millis(opts.cooldown_ms))?;
    let summary = setsheets::archive_edition(&client, &config).await?;
    info!(
        "archived {} cards ({} images) on {} sheets",
        summary.cards,
        summary.images,
        summary.sheets.len()
    );
    Ok(())
}
