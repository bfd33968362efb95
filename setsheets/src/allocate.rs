use log::debug;

use crate::scryfall::Card;
use crate::slot::{GridShape, Slot};

/// The next free slot: the edition of the run and how many images precede it.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotCursor {
    edition: String,
    grid: GridShape,
    index: usize,
}

impl SlotCursor {
    pub fn new(edition: &str, grid: GridShape) -> SlotCursor {
        SlotCursor {
            edition: edition.to_string(),
            grid,
            index: 0,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    fn slot(&self) -> Slot {
        Slot {
            edition: self.edition.clone(),
            position: self.grid.position(self.index),
        }
    }

    fn advanced(self) -> SlotCursor {
        SlotCursor {
            index: self.index + 1,
            ..self
        }
    }
}

/// Gives the card (or both faces of a transform card) the next slots.
pub fn annotate(cursor: SlotCursor, mut card: Card) -> (SlotCursor, Card) {
    if card.is_double_faced() {
        let mut cursor = cursor;
        // precondition: exactly two faces, checked upstream; the slots are used regardless
        for face_index in 0..2 {
            if let Some(face) = card.card_faces.get_mut(face_index) {
                face.slot = Some(cursor.slot());
            }
            cursor = cursor.advanced();
        }
        (cursor, card)
    } else {
        card.slot = Some(cursor.slot());
        (cursor.advanced(), card)
    }
}

/// Assigns every image of `cards` its slot, keeping the card order.
pub fn allocate(cards: Vec<Card>, grid: GridShape) -> Vec<Card> {
    let Some(edition) = cards.first().map(|c| c.set.clone()) else {
        return cards;
    };
    let (cursor, annotated) = cards.into_iter().fold(
        (SlotCursor::new(&edition, grid), Vec::new()),
        |(cursor, mut annotated), card| {
            let (cursor, card) = annotate(cursor, card);
            annotated.push(card);
            (cursor, annotated)
        },
    );
    debug!(
        "allocated {} slots on {} sheets for edition {}",
        cursor.index(),
        grid.pages_for(cursor.index()),
        edition
    );
    annotated
}

pub fn image_count(cards: &[Card]) -> usize {
    cards.iter().map(Card::image_count).sum()
}
