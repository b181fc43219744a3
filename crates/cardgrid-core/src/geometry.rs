#![forbid(unsafe_code)]

//! Pure placement geometry.
//!
//! All functions here are stateless given the set of occupied rectangles.
//! Grid coordinates are 1-based with inclusive ends; pointer-derived cell
//! indices are 0-based until the caller converts them. The column axis is
//! bounded by the grid's track count; the row axis is unbounded downward
//! and is never clamped, only rejected when a candidate starts above row 1.

use serde::{Deserialize, Serialize};

use crate::size::Span;

/// A rectangle in viewport pixels.
///
/// Used for the on-screen bounds of a card captured at gesture start and
/// for positioning the floating drag copy. Coordinates may go negative
/// while a card is dragged past the viewport edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl PixelRect {
    /// Create a pixel rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center point of the rectangle.
    #[must_use]
    pub const fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }
}

/// An occupied rectangle in grid track coordinates.
///
/// `col`/`row` are the 1-based top-left cell; spans are inclusive, so a
/// span-2 card at column 3 occupies columns 3 and 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRect {
    /// 1-based leftmost track.
    pub col: u16,
    /// 1-based top row.
    pub row: u16,
    /// Width in tracks.
    pub col_span: u16,
    /// Height in rows.
    pub row_span: u16,
}

impl TrackRect {
    /// Create a track rectangle.
    #[must_use]
    pub const fn new(col: u16, row: u16, col_span: u16, row_span: u16) -> Self {
        Self {
            col,
            row,
            col_span,
            row_span,
        }
    }

    /// Place a span at a 1-based cell.
    #[must_use]
    pub const fn at(col: u16, row: u16, span: Span) -> Self {
        Self::new(col, row, span.cols, span.rows)
    }

    /// Last occupied track (inclusive). Saturates at the numeric edge so
    /// pointer-derived rectangles near `u16::MAX` never overflow, and the
    /// interval stays well-formed (`end_col >= col`).
    #[must_use]
    pub const fn end_col(&self) -> u16 {
        self.col.saturating_add(self.col_span.saturating_sub(1))
    }

    /// Last occupied row (inclusive). Saturates like [`end_col`].
    ///
    /// [`end_col`]: Self::end_col
    #[must_use]
    pub const fn end_row(&self) -> u16 {
        self.row.saturating_add(self.row_span.saturating_sub(1))
    }

    /// True iff both axes overlap, even by a single track.
    #[must_use]
    pub const fn overlaps(&self, other: &TrackRect) -> bool {
        !(self.end_col() < other.col || self.col > other.end_col())
            && !(self.end_row() < other.row || self.row > other.end_row())
    }

    /// True iff the rectangle stays inside the column axis and starts at
    /// or below row 1. Rows have no lower bound on growth.
    #[must_use]
    pub const fn fits(&self, column_count: u16) -> bool {
        self.col >= 1 && self.end_col() <= column_count && self.row >= 1
    }
}

/// Map a container-relative pointer position to a 0-based cell index.
///
/// Both axes floor-divide and clamp at zero; the caller converts to
/// 1-based grid coordinates. `row_height` is the approximate cell height
/// used only for this mapping, not for rendered row heights.
#[must_use]
pub fn cell_from_point(x: f64, y: f64, cell_width: f64, row_height: f64) -> (u16, u16) {
    let col = if cell_width > 0.0 {
        (x / cell_width).floor().max(0.0)
    } else {
        0.0
    };
    let row = if row_height > 0.0 {
        (y / row_height).floor().max(0.0)
    } else {
        0.0
    };
    (col.min(f64::from(u16::MAX)) as u16, row.min(f64::from(u16::MAX)) as u16)
}

/// Shift a 0-based candidate column so a span stays inside the grid.
///
/// This never rejects on the column axis, it only slides the rectangle
/// left: `min(col, column_count - col_span)`, floored at 0. A span wider
/// than the grid clamps to column 0 and is left for validation to refuse.
#[must_use]
pub const fn clamp_to_columns(col: u16, col_span: u16, column_count: u16) -> u16 {
    if col_span >= column_count {
        return 0;
    }
    let max_col = column_count - col_span;
    if col > max_col { max_col } else { col }
}

/// Validate a candidate placement against the grid bounds and every other
/// card's occupied rectangle.
///
/// The caller must exclude the moving card itself from `occupied` so a
/// card can pass back over its own vacated cells. Any overlap, even one
/// track, is invalid; there is no partial-overlap tolerance.
#[must_use]
pub fn is_placement_valid(candidate: TrackRect, column_count: u16, occupied: &[TrackRect]) -> bool {
    if !candidate.fits(column_count) {
        return false;
    }
    !occupied.iter().any(|rect| candidate.overlaps(rect))
}

/// First-fit placement: the topmost, then leftmost cell where the span
/// does not collide with any occupied rectangle.
///
/// This mirrors what auto-flow would do for a card without an explicit
/// placement, so markup-order defaults and post-breakpoint reflow stay
/// collision-free. A span wider than the grid is pinned to column 1 and
/// placed below everything else.
#[must_use]
pub fn first_fit(span: Span, column_count: u16, occupied: &[TrackRect]) -> TrackRect {
    let bottom = occupied.iter().map(TrackRect::end_row).max().unwrap_or(0);
    let below = bottom.saturating_add(1);
    if span.cols > column_count {
        return TrackRect::at(1, below, span);
    }
    let last_start = column_count - span.cols + 1;
    // A free row always exists just past the current bottom edge.
    for row in 1..=below {
        for col in 1..=last_start {
            let candidate = TrackRect::at(col, row, span);
            if !occupied.iter().any(|rect| candidate.overlaps(rect)) {
                return candidate;
            }
        }
    }
    TrackRect::at(1, below, span)
}

#[cfg(test)]
mod tests {
    use super::{TrackRect, cell_from_point, clamp_to_columns, first_fit, is_placement_valid};
    use crate::size::Span;

    #[test]
    fn overlap_requires_both_axes() {
        let a = TrackRect::new(1, 1, 2, 1);
        // Same row, adjacent columns: no overlap.
        assert!(!a.overlaps(&TrackRect::new(3, 1, 2, 1)));
        // Same columns, next row: no overlap.
        assert!(!a.overlaps(&TrackRect::new(1, 2, 2, 1)));
        // Shares column 2, row 1.
        assert!(a.overlaps(&TrackRect::new(2, 1, 2, 1)));
        // Identical rectangles overlap.
        assert!(a.overlaps(&a));
    }

    #[test]
    fn overlap_by_single_track_counts() {
        let a = TrackRect::new(1, 1, 4, 2);
        let b = TrackRect::new(4, 2, 2, 1);
        assert!(a.overlaps(&b));
    }

    #[test]
    fn fits_checks_columns_and_row_floor() {
        assert!(TrackRect::new(5, 1, 2, 1).fits(6));
        assert!(!TrackRect::new(6, 1, 2, 1).fits(6));
        assert!(!TrackRect::new(0, 1, 2, 1).fits(6));
        assert!(!TrackRect::new(1, 0, 2, 1).fits(6));
        // Rows are unbounded downward.
        assert!(TrackRect::new(1, 500, 2, 1).fits(6));
    }

    #[test]
    fn end_coordinates_saturate_instead_of_overflowing() {
        let far = TrackRect::new(1, u16::MAX, 2, 2);
        assert_eq!(far.end_row(), u16::MAX);
        assert!(far.fits(6));
        assert!(!far.overlaps(&TrackRect::new(1, 1, 2, 1)));
        // Two rectangles parked on the last row still collide.
        assert!(far.overlaps(&TrackRect::new(1, u16::MAX, 2, 1)));
        let wide = TrackRect::new(u16::MAX, 1, 4, 1);
        assert_eq!(wide.end_col(), u16::MAX);
    }

    #[test]
    fn cell_from_point_floors_and_clamps() {
        assert_eq!(cell_from_point(0.0, 0.0, 100.0, 220.0), (0, 0));
        assert_eq!(cell_from_point(99.9, 219.0, 100.0, 220.0), (0, 0));
        assert_eq!(cell_from_point(100.0, 220.0, 100.0, 220.0), (1, 1));
        assert_eq!(cell_from_point(250.0, 700.0, 100.0, 220.0), (2, 3));
        // Negative coordinates clamp to the first cell.
        assert_eq!(cell_from_point(-40.0, -5.0, 100.0, 220.0), (0, 0));
    }

    #[test]
    fn clamp_shifts_never_rejects() {
        // Span 2 on a 6-track grid: last valid 0-based start is 4.
        assert_eq!(clamp_to_columns(0, 2, 6), 0);
        assert_eq!(clamp_to_columns(4, 2, 6), 4);
        assert_eq!(clamp_to_columns(5, 2, 6), 4);
        assert_eq!(clamp_to_columns(60, 2, 6), 4);
        // Span as wide as the grid pins to 0.
        assert_eq!(clamp_to_columns(3, 6, 6), 0);
        // Wider than the grid also pins to 0; validation refuses it later.
        assert_eq!(clamp_to_columns(0, 4, 2), 0);
    }

    #[test]
    fn placement_rejects_collision_and_out_of_bounds() {
        let occupied = [TrackRect::new(3, 1, 2, 1)];
        assert!(is_placement_valid(TrackRect::new(1, 1, 2, 1), 6, &occupied));
        assert!(is_placement_valid(TrackRect::new(5, 1, 2, 1), 6, &occupied));
        assert!(!is_placement_valid(TrackRect::new(2, 1, 2, 1), 6, &occupied));
        assert!(!is_placement_valid(TrackRect::new(6, 1, 2, 1), 6, &occupied));
        assert!(!is_placement_valid(TrackRect::new(1, 0, 2, 1), 6, &occupied));
    }

    #[test]
    fn placement_with_empty_occupied_set_only_checks_bounds() {
        assert!(is_placement_valid(TrackRect::new(1, 40, 4, 2), 6, &[]));
        assert!(!is_placement_valid(TrackRect::new(4, 1, 4, 1), 6, &[]));
    }

    #[test]
    fn first_fit_packs_row_major() {
        let mut occupied = Vec::new();
        let spot = first_fit(Span::new(2, 1), 6, &occupied);
        assert_eq!(spot, TrackRect::new(1, 1, 2, 1));
        occupied.push(spot);

        let spot = first_fit(Span::new(4, 1), 6, &occupied);
        assert_eq!(spot, TrackRect::new(3, 1, 4, 1));
        occupied.push(spot);

        // Row 1 is full; the next card wraps to row 2.
        let spot = first_fit(Span::new(2, 2), 6, &occupied);
        assert_eq!(spot, TrackRect::new(1, 2, 2, 2));
    }

    #[test]
    fn first_fit_fills_gaps_before_new_rows() {
        let occupied = [TrackRect::new(3, 1, 4, 1), TrackRect::new(1, 2, 2, 1)];
        let spot = first_fit(Span::new(2, 1), 6, &occupied);
        assert_eq!(spot, TrackRect::new(1, 1, 2, 1));
    }

    #[test]
    fn first_fit_oversized_span_goes_below_everything() {
        let occupied = [TrackRect::new(1, 1, 2, 1)];
        let spot = first_fit(Span::new(4, 1), 2, &occupied);
        assert_eq!(spot, TrackRect::new(1, 2, 4, 1));
    }
}
