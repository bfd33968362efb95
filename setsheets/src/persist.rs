use image::RgbaImage;
use itertools::process_results;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::scryfall::Card;

/// The cards as json, one object per line.
pub fn card_records(cards: &[Card]) -> Result<String> {
    let records = process_results(cards.iter().map(serde_json::to_string), |lines| {
        lines.fold(String::new(), |mut records, line| {
            records.push_str(&line);
            records.push('\n');
            records
        })
    })?;
    Ok(records)
}

pub fn cards_path(dir: &Path, edition: &str) -> PathBuf {
    dir.join(format!("{}.json", edition))
}

pub fn sheet_path(dir: &Path, edition: &str, page: usize) -> PathBuf {
    dir.join(format!("{}_{:03}.png", edition, page))
}

pub fn pdf_path(dir: &Path, edition: &str) -> PathBuf {
    dir.join(format!("{}.pdf", edition))
}

pub fn write_cards(dir: &Path, edition: &str, cards: &[Card]) -> Result<PathBuf> {
    let path = cards_path(dir, edition);
    fs::write(&path, card_records(cards)?)?;
    info!("wrote {} cards to {}", cards.len(), path.display());
    Ok(path)
}

pub fn write_sheets(dir: &Path, edition: &str, sheets: &[RgbaImage]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::with_capacity(sheets.len());
    for (page, sheet) in sheets.iter().enumerate() {
        let path = sheet_path(dir, edition, page);
        sheet.save(&path)?;
        info!("wrote sheet {}", path.display());
        paths.push(path);
    }
    Ok(paths)
}

pub fn write_pdf(dir: &Path, edition: &str, pdf: &[u8]) -> Result<PathBuf> {
    let path = pdf_path(dir, edition);
    fs::write(&path, pdf)?;
    info!("wrote {} ({} bytes)", path.display(), pdf.len());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocate::allocate;
    use crate::scryfall::parse_search_answer;
    use crate::slot::GridShape;
    use image::Rgba;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("setsheets-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn isd_cards() -> Vec<Card> {
        let answer = parse_search_answer(include_str!("../test_input/search_isd.json")).unwrap();
        allocate(answer.data, GridShape::default())
    }

    #[test]
    fn one_record_per_line() {
        let cards = isd_cards();
        let records = card_records(&cards).unwrap();
        let lines: Vec<&str> = records.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(records.ends_with('\n'));
        let modal: serde_json::Value = serde_json::from_str(lines[2]).unwrap();
        assert_eq!(modal["pngid"], serde_json::json!(["isd", 0, 0, 3]));
        let reread: Card = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(reread, cards[1]);
    }

    #[test]
    fn no_cards_no_records() {
        assert_eq!(card_records(&[]).unwrap(), "");
    }

    #[test]
    fn sheet_names_are_numbered() {
        let dir = Path::new("out");
        assert_eq!(sheet_path(dir, "isd", 0), Path::new("out/isd_000.png"));
        assert_eq!(sheet_path(dir, "isd", 12), Path::new("out/isd_012.png"));
        assert_eq!(cards_path(dir, "isd"), Path::new("out/isd.json"));
    }

    #[test]
    fn writes_files() {
        let dir = scratch_dir("writes-files");
        let cards = isd_cards();
        let cards_file = write_cards(&dir, "isd", &cards).unwrap();
        assert_eq!(fs::read_to_string(&cards_file).unwrap().lines().count(), 3);

        let sheets = vec![
            RgbaImage::from_pixel(4, 4, Rgba([9, 9, 9, 255])),
            RgbaImage::new(4, 4),
        ];
        let paths = write_sheets(&dir, "isd", &sheets).unwrap();
        assert_eq!(paths, vec![dir.join("isd_000.png"), dir.join("isd_001.png")]);
        let reread = image::open(&paths[0]).unwrap().to_rgba8();
        assert_eq!(reread, sheets[0]);

        fs::remove_dir_all(&dir).unwrap();
    }
}
