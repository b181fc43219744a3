#![forbid(unsafe_code)]

//! Card size classes and their fixed track spans.
//!
//! A card's footprint is a function of its size class alone. The column
//! unit is a fine-grained track; a visual "column" is two tracks wide, so
//! a single-width card spans 2 tracks and a double-width card spans 4.
//! Resize gestures never change the span (they adjust content height
//! only), so the span table is the single source of truth for geometry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A card footprint in grid tracks and rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Width in tracks.
    pub cols: u16,
    /// Height in rows.
    pub rows: u16,
}

impl Span {
    /// Create a span.
    #[must_use]
    pub const fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }
}

/// Fixed card size classes.
///
/// The label reads `width x height` in visual columns. Each class carries
/// its span as data; there is no class-name-driven branching anywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SizeClass {
    /// One visual column, one row: 2x1 tracks.
    #[serde(rename = "1x1")]
    OneByOne,
    /// One visual column, two rows: 2x2 tracks.
    #[serde(rename = "1x2")]
    OneByTwo,
    /// Two visual columns, one row: 4x1 tracks.
    #[serde(rename = "2x1")]
    TwoByOne,
    /// Two visual columns, two rows: 4x2 tracks.
    #[serde(rename = "2x2")]
    TwoByTwo,
}

impl SizeClass {
    /// All size classes in label order.
    pub const ALL: [SizeClass; 4] = [
        SizeClass::OneByOne,
        SizeClass::OneByTwo,
        SizeClass::TwoByOne,
        SizeClass::TwoByTwo,
    ];

    /// The fixed (column, row) span for this class.
    #[must_use]
    pub const fn span(self) -> Span {
        match self {
            SizeClass::OneByOne => Span::new(2, 1),
            SizeClass::OneByTwo => Span::new(2, 2),
            SizeClass::TwoByOne => Span::new(4, 1),
            SizeClass::TwoByTwo => Span::new(4, 2),
        }
    }

    /// The compact persisted label, e.g. `"2x1"`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            SizeClass::OneByOne => "1x1",
            SizeClass::OneByTwo => "1x2",
            SizeClass::TwoByOne => "2x1",
            SizeClass::TwoByTwo => "2x2",
        }
    }
}

impl Default for SizeClass {
    fn default() -> Self {
        SizeClass::OneByOne
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Failure to parse a size class label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSizeClassError {
    label: String,
}

impl fmt::Display for ParseSizeClassError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown size class label {:?}", self.label)
    }
}

impl std::error::Error for ParseSizeClassError {}

impl FromStr for SizeClass {
    type Err = ParseSizeClassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1x1" => Ok(SizeClass::OneByOne),
            "1x2" => Ok(SizeClass::OneByTwo),
            "2x1" => Ok(SizeClass::TwoByOne),
            "2x2" => Ok(SizeClass::TwoByTwo),
            other => Err(ParseSizeClassError {
                label: other.to_string(),
            }),
        }
    }
}
