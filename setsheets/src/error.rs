use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("scryfall request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("couldn't read scryfall response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF error: {0}")]
    Pdf(String),
    #[error("edition {0} not found")]
    EditionNotFound(String),
    #[error("{0:?} is not an edition code")]
    InvalidEdition(String),
    #[error("card {name}: {reason}")]
    MalformedCard { name: String, reason: String },
    #[error("image {index} is {found:?} pixels, the sheet cells are {expected:?}")]
    MismatchedImage {
        index: usize,
        expected: (u32, u32),
        found: (u32, u32),
    },
    #[error("a sheet of {cols}x{rows} cells of {cell:?} pixels is too large")]
    SheetTooLarge { rows: u32, cols: u32, cell: (u32, u32) },
    #[error("a sheet grid needs at least one row and one column, got {rows}x{cols}")]
    EmptyGrid { rows: u32, cols: u32 },
}

pub type Result<T> = std::result::Result<T, Error>;
