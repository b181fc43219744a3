#![forbid(unsafe_code)]

//! Card model and registry.
//!
//! The registry is an arena over the host page's card elements in markup
//! order. It replaces re-querying the rendered tree for state: hit-tested
//! slots come in from the adapter, and all geometry decisions read the
//! registry's committed rectangles. Cards without an id participate in
//! layout but are excluded from persistence.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{TrackRect, first_fit};
use crate::size::SizeClass;

/// Stable identifier for a persisted card.
///
/// The empty string is rejected so persisted keys are always meaningful.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    /// Create a card id, rejecting the empty string.
    pub fn new(raw: impl Into<String>) -> Result<Self, CardIdError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(CardIdError::Empty);
        }
        Ok(Self(raw))
    }

    /// The raw id string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Invalid card id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardIdError {
    /// Ids must be non-empty.
    Empty,
}

impl fmt::Display for CardIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardIdError::Empty => write!(f, "card id must be non-empty"),
        }
    }
}

impl std::error::Error for CardIdError {}

/// Index of a card in the registry, stable for the engine's lifetime.
///
/// Slots follow markup order, so a host adapter can address cards by
/// element index even when they carry no id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardSlot(pub usize);

impl CardSlot {
    /// The raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for CardSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot#{}", self.0)
    }
}

/// Host-supplied description of one card element, in markup order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSeed {
    /// Stable element id, if the markup carries one.
    pub id: Option<String>,
    /// Size class marker from the markup.
    pub size: SizeClass,
    /// Pre-existing inline content height, if any.
    pub content_height: Option<u16>,
}

impl CardSeed {
    /// Seed for a card with an id.
    #[must_use]
    pub fn new(id: impl Into<String>, size: SizeClass) -> Self {
        Self {
            id: Some(id.into()),
            size,
            content_height: None,
        }
    }

    /// Seed for a card without an id (laid out, never persisted).
    #[must_use]
    pub fn anonymous(size: SizeClass) -> Self {
        Self {
            id: None,
            size,
            content_height: None,
        }
    }
}

/// A tracked dashboard card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Stable id; `None` excludes the card from persistence.
    pub id: Option<CardId>,
    /// Current size class.
    pub size: SizeClass,
    /// Committed placement in track coordinates.
    pub rect: TrackRect,
    /// User-set content height in pixels; `None` means natural height.
    pub content_height: Option<u16>,
    /// Placement came from markup order, not a saved config.
    pub from_markup: bool,
}

impl Card {
    /// True iff the user explicitly resized this card's content.
    #[must_use]
    pub const fn has_custom_height(&self) -> bool {
        self.content_height.is_some()
    }
}

/// Arena of tracked cards, keyed by [`CardSlot`] with an id index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRegistry {
    cards: Vec<Card>,
}

impl CardRegistry {
    /// Build a registry from markup-order seeds, assigning first-fit
    /// default placements for the given track count.
    ///
    /// Seeds with an empty id string are treated as anonymous.
    #[must_use]
    pub fn from_seeds(seeds: Vec<CardSeed>, column_count: u16) -> Self {
        let mut registry = Self { cards: Vec::with_capacity(seeds.len()) };
        let mut occupied: Vec<TrackRect> = Vec::with_capacity(seeds.len());
        for seed in seeds {
            let id = seed.id.and_then(|raw| CardId::new(raw).ok());
            let rect = first_fit(seed.size.span(), column_count, &occupied);
            occupied.push(rect);
            registry.cards.push(Card {
                id,
                size: seed.size,
                rect,
                content_height: seed.content_height,
                from_markup: true,
            });
        }
        registry
    }

    /// Number of tracked cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// True iff no cards are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Card at a slot.
    #[must_use]
    pub fn get(&self, slot: CardSlot) -> Option<&Card> {
        self.cards.get(slot.0)
    }

    /// Mutable card at a slot.
    pub fn get_mut(&mut self, slot: CardSlot) -> Option<&mut Card> {
        self.cards.get_mut(slot.0)
    }

    /// Slot of the card carrying an id.
    #[must_use]
    pub fn slot_by_id(&self, id: &CardId) -> Option<CardSlot> {
        self.cards
            .iter()
            .position(|card| card.id.as_ref() == Some(id))
            .map(CardSlot)
    }

    /// Iterate cards with their slots in markup order.
    pub fn iter(&self) -> impl Iterator<Item = (CardSlot, &Card)> {
        self.cards
            .iter()
            .enumerate()
            .map(|(idx, card)| (CardSlot(idx), card))
    }

    /// Iterate cards mutably with their slots.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (CardSlot, &mut Card)> {
        self.cards
            .iter_mut()
            .enumerate()
            .map(|(idx, card)| (CardSlot(idx), card))
    }

    /// Occupied rectangles of every card except the one at `excluded`.
    ///
    /// The moving card is always excluded from collision checks so it can
    /// pass back over its own vacated cells.
    #[must_use]
    pub fn occupied_rects_excluding(&self, excluded: CardSlot) -> Vec<TrackRect> {
        self.cards
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != excluded.0)
            .map(|(_, card)| card.rect)
            .collect()
    }

    /// Occupied rectangles of every card.
    #[must_use]
    pub fn occupied_rects(&self) -> Vec<TrackRect> {
        self.cards.iter().map(|card| card.rect).collect()
    }
}
