#![forbid(unsafe_code)]

//! Grid container specification.
//!
//! The grid's track count is responsive: it is derived from the container
//! width through fixed breakpoints rather than configured per card. Cell
//! width follows from the track count; row height is a fixed approximation
//! used only for pointer-to-row mapping while dragging (rendered rows are
//! intrinsic/auto height).

use serde::{Deserialize, Serialize};

/// Width above which the grid uses six tracks.
pub const WIDE_BREAKPOINT: u32 = 1024;
/// Width above which the grid uses four tracks.
pub const MEDIUM_BREAKPOINT: u32 = 600;

/// Default approximate row height in pixels for pointer mapping.
pub const DEFAULT_ROW_HEIGHT: u32 = 220;

/// Classify a container width into a track count.
///
/// `> 1024` -> 6 tracks, `> 600` -> 4, otherwise 2.
#[must_use]
pub const fn column_count_for_width(width: u32) -> u16 {
    if width > WIDE_BREAKPOINT {
        6
    } else if width > MEDIUM_BREAKPOINT {
        4
    } else {
        2
    }
}

/// The container's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Current container width in pixels.
    pub container_width: u32,
    /// Approximate cell height in pixels for pointer-to-row mapping.
    pub row_height: u32,
}

impl GridSpec {
    /// Create a spec for a container width with the default row height.
    #[must_use]
    pub const fn new(container_width: u32) -> Self {
        Self {
            container_width,
            row_height: DEFAULT_ROW_HEIGHT,
        }
    }

    /// Override the approximate row height.
    #[must_use]
    pub const fn with_row_height(mut self, row_height: u32) -> Self {
        self.row_height = row_height;
        self
    }

    /// Track count derived from the current container width.
    #[must_use]
    pub const fn column_count(&self) -> u16 {
        column_count_for_width(self.container_width)
    }

    /// Width of one track in pixels.
    #[must_use]
    pub fn cell_width(&self) -> f64 {
        f64::from(self.container_width) / f64::from(self.column_count())
    }
}

#[cfg(test)]
mod tests {
    use super::{GridSpec, column_count_for_width};

    #[test]
    fn breakpoints_classify_widths() {
        assert_eq!(column_count_for_width(1920), 6);
        assert_eq!(column_count_for_width(1025), 6);
        assert_eq!(column_count_for_width(1024), 4);
        assert_eq!(column_count_for_width(601), 4);
        assert_eq!(column_count_for_width(600), 2);
        assert_eq!(column_count_for_width(320), 2);
        assert_eq!(column_count_for_width(0), 2);
    }

    #[test]
    fn cell_width_divides_container() {
        let spec = GridSpec::new(1200);
        assert_eq!(spec.column_count(), 6);
        assert!((spec.cell_width() - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn row_height_override() {
        let spec = GridSpec::new(800).with_row_height(180);
        assert_eq!(spec.row_height, 180);
        assert_eq!(spec.column_count(), 4);
    }
}
