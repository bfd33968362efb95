use image::DynamicImage;
use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};
use crate::scryfall_client::ScryfallClient;
use crate::slot::Slot;

const SCRYFALL_SETS: &str = "https://api.scryfall.com/sets";
const SCRYFALL_SEARCH: &str = "https://api.scryfall.com/cards/search";

/// Only `transform` cards are printed with both faces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layout {
    Transform,
    Other(String),
}

impl From<String> for Layout {
    fn from(s: String) -> Self {
        match s.as_str() {
            "transform" => Layout::Transform,
            _ => Layout::Other(s),
        }
    }
}

impl Layout {
    pub fn as_str(&self) -> &str {
        match self {
            Layout::Transform => "transform",
            Layout::Other(s) => s,
        }
    }
}

impl Serialize for Layout {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Layout {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        String::deserialize(deserializer).map(Layout::from)
    }
}

/// The image renditions scryfall offers for every card (face).
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, clap::ValueEnum)]
pub enum ImageVersion {
    Small,
    Normal,
    Large,
    #[default]
    Png,
    ArtCrop,
    BorderCrop,
}

impl fmt::Display for ImageVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ImageVersion::Small => "small",
            ImageVersion::Normal => "normal",
            ImageVersion::Large => "large",
            ImageVersion::Png => "png",
            ImageVersion::ArtCrop => "art_crop",
            ImageVersion::BorderCrop => "border_crop",
        };
        write!(f, "{}", name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ImageUris {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub png: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub art_crop: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_crop: Option<String>,
}

impl ImageUris {
    pub fn get(&self, version: ImageVersion) -> Option<&str> {
        match version {
            ImageVersion::Small => self.small.as_deref(),
            ImageVersion::Normal => self.normal.as_deref(),
            ImageVersion::Large => self.large.as_deref(),
            ImageVersion::Png => self.png.as_deref(),
            ImageVersion::ArtCrop => self.art_crop.as_deref(),
            ImageVersion::BorderCrop => self.border_crop.as_deref(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CardFace {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uris: Option<ImageUris>,
    #[serde(rename = "pngid", default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<Slot>,
    // everything else scryfall sends is written back untouched
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Card {
    pub name: String,
    pub set: String,
    pub layout: Layout,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collector_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uris: Option<ImageUris>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub card_faces: Vec<CardFace>,
    #[serde(rename = "pngid", default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<Slot>,
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

impl Card {
    pub fn is_double_faced(&self) -> bool {
        self.layout == Layout::Transform
    }

    /// How many sheet slots the card takes up.
    pub fn image_count(&self) -> usize {
        if self.is_double_faced() { 2 } else { 1 }
    }

    fn malformed(&self, reason: String) -> Error {
        Error::MalformedCard {
            name: self.name.clone(),
            reason,
        }
    }

    /// The image uris of the card in slot order.
    pub fn image_sources(&self, version: ImageVersion) -> Result<Vec<&str>> {
        if self.is_double_faced() {
            if self.card_faces.len() != 2 {
                return Err(self.malformed(format!(
                    "transform card with {} faces",
                    self.card_faces.len()
                )));
            }
            self.card_faces
                .iter()
                .map(|face| {
                    face.image_uris
                        .as_ref()
                        .and_then(|uris| uris.get(version))
                        .ok_or_else(|| {
                            self.malformed(format!("no {} image for face {}", version, face.name))
                        })
                })
                .collect()
        } else {
            // e.g. modal double faced cards only have images per face, print the front
            let uri = match &self.image_uris {
                Some(uris) => uris.get(version),
                None => self
                    .card_faces
                    .first()
                    .and_then(|face| face.image_uris.as_ref())
                    .and_then(|uris| uris.get(version)),
            };
            uri.map(|uri| vec![uri])
                .ok_or_else(|| self.malformed(format!("no {} image", version)))
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ScryfallSearchAnswer {
    pub object: String,
    #[serde(default)]
    pub total_cards: Option<i32>,
    pub has_more: bool,
    pub next_page: Option<String>,
    pub data: Vec<Card>,
}

pub fn parse_search_answer(body: &str) -> Result<ScryfallSearchAnswer> {
    Ok(serde_json::from_str(body)?)
}

/// Where the search continues, if it does.
pub fn next_page(answer: &ScryfallSearchAnswer) -> Option<&str> {
    if answer.has_more {
        answer.next_page.as_deref()
    } else {
        None
    }
}

pub fn is_edition_code(code: &str) -> bool {
    lazy_static! {
        static ref RE_EDITION: Regex = Regex::new(r"^[0-9A-Za-z]{2,6}$").unwrap();
    }
    RE_EDITION.is_match(code)
}

fn checked_edition(edition: &str) -> Result<&str> {
    if is_edition_code(edition) {
        Ok(edition)
    } else {
        Err(Error::InvalidEdition(edition.to_string()))
    }
}

pub async fn check_edition(client: &ScryfallClient, edition: &str) -> Result<bool> {
    let uri = format!("{}/{}", SCRYFALL_SETS, checked_edition(edition)?);
    let response = client.head(&uri).await?;
    debug!("edition {} lookup answered {}", edition, response.status());
    Ok(response.status().is_success())
}

async fn read_search_answer(response: reqwest::Response) -> Result<ScryfallSearchAnswer> {
    let body = response.error_for_status()?.text().await?;
    parse_search_answer(&body)
}

/// All printings of an edition, in collector number order.
pub async fn fetch_edition(client: &ScryfallClient, edition: &str) -> Result<Vec<Card>> {
    let search = format!("e:{} unique:prints", checked_edition(edition)?);
    let query = [("order", "set"), ("q", search.as_str())];
    let mut answer = read_search_answer(client.call_with_query(SCRYFALL_SEARCH, &query).await?).await?;
    let mut cards = Vec::new();
    loop {
        debug!(
            "received {} cards of {:?} for edition {}",
            answer.data.len(),
            answer.total_cards,
            edition
        );
        let next = next_page(&answer).map(str::to_string);
        cards.extend(answer.data);
        let Some(next) = next else {
            break;
        };
        answer = read_search_answer(client.call(&next).await?).await?;
    }
    Ok(cards)
}

#[derive(Debug, PartialEq)]
pub struct CardImages<'a> {
    pub name: &'a str,
    pub uris: Vec<&'a str>,
}

/// Resolves every image the sheets need before anything is downloaded, so a
/// malformed card stops the run early.
pub fn image_plan(cards: &[Card], version: ImageVersion) -> Result<Vec<CardImages<'_>>> {
    cards
        .iter()
        .map(|card| {
            Ok::<_, Error>(CardImages {
                name: &card.name,
                uris: card.image_sources(version)?,
            })
        })
        .collect()
}

pub async fn query_image_uri(uri: &str, client: &ScryfallClient) -> Result<DynamicImage> {
    debug!("scryfall uri: {}", uri);
    let bytes = client.call(uri).await?.error_for_status()?.bytes().await?;
    Ok(image::load_from_memory(&bytes)?)
}

/// Downloads the images in plan order, which is the order of the slots.
pub async fn fetch_images(
    client: &ScryfallClient,
    plan: &[CardImages<'_>],
    progress: bool,
) -> Result<Vec<DynamicImage>> {
    let mut images = Vec::with_capacity(plan.iter().map(|c| c.uris.len()).sum());
    for (counter, card) in plan.iter().enumerate() {
        if progress {
            info!("{:4}/{} {}", counter + 1, plan.len(), card.name);
        }
        for uri in card.uris.iter() {
            images.push(query_image_uri(uri, client).await?);
        }
    }
    Ok(images)
}
