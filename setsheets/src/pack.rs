use image::imageops::replace;
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};
use log::debug;

use crate::error::{Error, Result};
use crate::slot::GridShape;

fn sheet_dimensions(grid: GridShape, cell: (u32, u32)) -> Result<(u32, u32)> {
    let too_large = || Error::SheetTooLarge {
        rows: grid.rows(),
        cols: grid.cols(),
        cell,
    };
    let width = grid.cols().checked_mul(cell.0).ok_or_else(too_large)?;
    let height = grid.rows().checked_mul(cell.1).ok_or_else(too_large)?;
    Ok((width, height))
}

/// Composites the images onto sheets of `grid` cells, image `i` going to
/// `grid.position(i)`. The cell size is taken from the first image and every
/// other image has to match it; unused cells of the last sheet stay
/// transparent.
pub fn pack<'a, I>(images: I, grid: GridShape) -> Result<Vec<RgbaImage>>
where
    I: IntoIterator<Item = &'a DynamicImage>,
{
    let mut sheets: Vec<RgbaImage> = Vec::new();
    let mut cell: Option<(u32, u32)> = None;
    let blank = Rgba::<u8>([0, 0, 0, 0]);

    for (index, im) in images.into_iter().enumerate() {
        let (cell_width, cell_height) = *cell.get_or_insert(im.dimensions());
        if im.dimensions() != (cell_width, cell_height) {
            return Err(Error::MismatchedImage {
                index,
                expected: (cell_width, cell_height),
                found: im.dimensions(),
            });
        }
        let position = grid.position(index);
        if position.page == sheets.len() {
            debug!("starting sheet {}", position.page);
            let (width, height) = sheet_dimensions(grid, (cell_width, cell_height))?;
            sheets.push(RgbaImage::from_pixel(width, height, blank));
        }
        replace(
            &mut sheets[position.page],
            &im.to_rgba8(),
            i64::from(position.col * cell_width),
            i64::from(position.row * cell_height),
        );
    }
    Ok(sheets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Pixel;

    const CELL: (u32, u32) = (3, 4);

    // every image is one flat, opaque colour that encodes its index
    fn tile(index: usize) -> DynamicImage {
        let shade = Rgba([(index % 256) as u8, (index / 256) as u8, 7, 255]);
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(CELL.0, CELL.1, shade))
    }

    fn tiles(n: usize) -> Vec<DynamicImage> {
        (0..n).map(tile).collect()
    }

    fn cell_pixel(sheet: &RgbaImage, row: u32, col: u32) -> Rgba<u8> {
        *sheet.get_pixel(col * CELL.0 + 1, row * CELL.1 + 2)
    }

    #[test]
    fn empty_input() {
        let images: Vec<DynamicImage> = Vec::new();
        let sheets = pack(&images, GridShape::default()).unwrap();
        assert!(sheets.is_empty());
    }

    #[test]
    fn page_count_and_partial_last_sheet() {
        let grid = GridShape::new(2, 3).unwrap();
        let images = tiles(2 * 3 * 2 + 3);
        let sheets = pack(&images, grid).unwrap();
        assert_eq!(sheets.len(), 3);
        for sheet in sheets.iter() {
            assert_eq!(sheet.dimensions(), (3 * CELL.0, 2 * CELL.1));
        }
        let last = &sheets[2];
        let placed = (0..2)
            .flat_map(|row| (0..3).map(move |col| (row, col)))
            .filter(|&(row, col)| cell_pixel(last, row, col).channels()[3] == 255)
            .count();
        assert_eq!(placed, 3);
        assert_eq!(cell_pixel(last, 0, 2), *tile(14).to_rgba8().get_pixel(0, 0));
        assert_eq!(cell_pixel(last, 1, 0), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn images_land_on_their_derived_position() {
        let grid = GridShape::new(4, 5).unwrap();
        let images = tiles(47);
        let sheets = pack(&images, grid).unwrap();
        assert_eq!(sheets.len(), grid.pages_for(47));
        for (index, im) in images.iter().enumerate() {
            let position = grid.position(index);
            assert_eq!(
                cell_pixel(&sheets[position.page], position.row, position.col),
                *im.to_rgba8().get_pixel(0, 0),
                "image {} at {:?}",
                index,
                position
            );
        }
    }

    #[test]
    fn whole_cell_is_covered() {
        let grid = GridShape::new(1, 2).unwrap();
        let sheets = pack(&tiles(2), grid).unwrap();
        let second = tile(1).to_rgba8();
        for y in 0..CELL.1 {
            for x in CELL.0..2 * CELL.0 {
                assert_eq!(sheets[0].get_pixel(x, y), second.get_pixel(0, 0));
            }
        }
    }

    #[test]
    fn mismatched_sizes_are_rejected() {
        let mut images = tiles(3);
        images.push(DynamicImage::ImageRgba8(RgbaImage::new(CELL.0 + 1, CELL.1)));
        match pack(&images, GridShape::default()) {
            Err(Error::MismatchedImage {
                index,
                expected,
                found,
            }) => {
                assert_eq!(index, 3);
                assert_eq!(expected, CELL);
                assert_eq!(found, (CELL.0 + 1, CELL.1));
            }
            other => panic!("expected a size mismatch, got {:?}", other.map(|s| s.len())),
        }
    }

    #[test]
    fn oversized_sheet_is_rejected() {
        let grid = GridShape::new(1, 2_000_000_000).unwrap();
        match pack(&tiles(1), grid) {
            Err(Error::SheetTooLarge { rows, cols, cell }) => {
                assert_eq!((rows, cols), (1, 2_000_000_000));
                assert_eq!(cell, CELL);
            }
            other => panic!("expected an oversized sheet, got {:?}", other.map(|s| s.len())),
        }
        let grid = GridShape::new(2_000_000_000, 1).unwrap();
        assert!(matches!(pack(&tiles(1), grid), Err(Error::SheetTooLarge { .. })));
    }

    #[test]
    fn rgb_images_become_opaque_cells() {
        let im = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            CELL.0,
            CELL.1,
            image::Rgb([10, 20, 30]),
        ));
        let sheets = pack([&im], GridShape::new(1, 1).unwrap()).unwrap();
        assert_eq!(sheets.len(), 1);
        assert_eq!(*sheets[0].get_pixel(0, 0), Rgba([10, 20, 30, 255]));
    }
}
