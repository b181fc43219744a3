//! End-to-end gesture scenarios driven through the engine facade.

use std::sync::Arc;
use std::time::{Duration, Instant};

use cardgrid_engine::{
    GridEngine, HostCommand, LAYOUT_STORAGE_KEY, LayoutStore, MemoryStore, StorageBackend,
};

use cardgrid_core::{
    CardHitRegion, CardSeed, CardSlot, GestureInput, GridSpec, PixelRect, PointerPoint, SizeClass,
    TrackRect,
};

/// 1200px container: 6 tracks of 200px, rows approximated at 220px.
fn spec() -> GridSpec {
    GridSpec::new(1200)
}

fn engine_with_backend(backend: Arc<MemoryStore>, seeds: Vec<CardSeed>) -> GridEngine {
    GridEngine::new(spec(), seeds, LayoutStore::new(Box::new(backend)))
}

fn two_cards() -> Vec<CardSeed> {
    vec![
        CardSeed::new("a", SizeClass::OneByOne),
        CardSeed::new("b", SizeClass::OneByOne),
    ]
}

fn body_down(engine: &mut GridEngine, card: usize) {
    engine.handle(GestureInput::PointerDown {
        card: CardSlot(card),
        region: CardHitRegion::Body,
        position: PointerPoint::new(50, 50),
        card_rect: PixelRect::new(0, 0, 400, 240),
        content_height: Some(180),
    });
}

/// Pointer position over the center of a 1-based cell.
fn over_cell(col: u16, row: u16) -> PointerPoint {
    PointerPoint::new(i32::from(col - 1) * 200 + 100, i32::from(row - 1) * 220 + 110)
}

fn drag_to(engine: &mut GridEngine, card: usize, col: u16, row: u16) {
    body_down(engine, card);
    engine.handle(GestureInput::PointerMove {
        position: over_cell(col, row),
    });
    engine.handle(GestureInput::PointerUp {
        position: over_cell(col, row),
    });
}

// Scenario 1: dragging A (tracks 1-2) onto B (tracks 3-4) is rejected and
// A remains at column 1 after release.
#[test]
fn overlapping_drop_is_refused() {
    let backend = Arc::new(MemoryStore::new());
    let mut engine = engine_with_backend(Arc::clone(&backend), two_cards());
    engine.set_edit_mode(true);
    assert_eq!(engine.card(CardSlot(0)).unwrap().rect, TrackRect::new(1, 1, 2, 1));
    assert_eq!(engine.card(CardSlot(1)).unwrap().rect, TrackRect::new(3, 1, 2, 1));

    drag_to(&mut engine, 0, 3, 1);
    assert_eq!(
        engine.card(CardSlot(0)).unwrap().rect,
        TrackRect::new(1, 1, 2, 1),
        "card A must stay at column 1 after an illegal drop"
    );
    // The invariant holds for the whole grid.
    let rects = engine.registry().occupied_rects();
    assert!(!rects[0].overlaps(&rects[1]));
}

// Scenario 2: a legal drag to column 5 commits, and save -> load -> apply
// reproduces it exactly in a fresh engine over the same backend.
#[test]
fn committed_drag_survives_reload() {
    let backend = Arc::new(MemoryStore::new());
    let mut engine = engine_with_backend(Arc::clone(&backend), two_cards());
    engine.set_edit_mode(true);

    drag_to(&mut engine, 0, 5, 1);
    let moved = TrackRect::new(5, 1, 2, 1);
    assert_eq!(engine.card(CardSlot(0)).unwrap().rect, moved);

    // Fresh engine simulating a page reload.
    let mut reloaded = engine_with_backend(Arc::clone(&backend), two_cards());
    let commands = reloaded.restore();
    assert_eq!(reloaded.card(CardSlot(0)).unwrap().rect, moved);
    assert!(commands.contains(&HostCommand::SetPlacement {
        card: CardSlot(0),
        rect: moved
    }));
    assert_eq!(commands.last(), Some(&HostCommand::ForceReflow));
}

// Scenario 3: resize to 300px then reset; final height is natural and the
// custom-height marker is cleared, both in memory and in the snapshot.
#[test]
fn height_reset_restores_natural_height() {
    let backend = Arc::new(MemoryStore::new());
    let mut engine = engine_with_backend(Arc::clone(&backend), two_cards());
    engine.set_edit_mode(true);

    engine.handle(GestureInput::PointerDown {
        card: CardSlot(0),
        region: CardHitRegion::ResizeHandle,
        position: PointerPoint::new(0, 100),
        card_rect: PixelRect::new(0, 0, 400, 240),
        content_height: Some(180),
    });
    engine.handle(GestureInput::PointerMove {
        position: PointerPoint::new(0, 220),
    });
    engine.handle(GestureInput::PointerUp {
        position: PointerPoint::new(0, 220),
    });
    assert_eq!(engine.card(CardSlot(0)).unwrap().content_height, Some(300));

    engine.handle(GestureInput::ResetHeight { card: CardSlot(0) });
    let card = engine.card(CardSlot(0)).unwrap();
    assert!(!card.has_custom_height());
    assert_eq!(card.content_height, None);

    let mut reloaded = engine_with_backend(Arc::clone(&backend), two_cards());
    reloaded.restore();
    assert_eq!(reloaded.card(CardSlot(0)).unwrap().content_height, None);
}

// Scenario 4: viewport narrows 1200 -> 500 (6 -> 2 tracks). A card saved
// at column 5 no longer fits, loses its inline placement, and reflows in
// markup order without leaving the grid.
#[test]
fn breakpoint_change_reflows_out_of_bounds_cards() {
    let backend = Arc::new(MemoryStore::new());
    let mut engine = engine_with_backend(Arc::clone(&backend), two_cards());
    engine.set_edit_mode(true);
    drag_to(&mut engine, 0, 5, 1);

    engine.handle(GestureInput::ViewportResized { width: 500 });
    // Not applied until the settle delay elapses.
    assert_eq!(engine.column_count(), 6);
    let commands = engine.tick(Instant::now() + Duration::from_secs(1));
    assert_eq!(engine.column_count(), 2);
    assert!(commands.contains(&HostCommand::ClearInlinePosition { card: CardSlot(0) }));
    assert!(commands.contains(&HostCommand::ClearInlinePosition { card: CardSlot(1) }));
    assert_eq!(commands.last(), Some(&HostCommand::ForceReflow));

    // Both cards reflow in markup order, in bounds, without overlap.
    let a = engine.card(CardSlot(0)).unwrap().rect;
    let b = engine.card(CardSlot(1)).unwrap().rect;
    assert_eq!(a, TrackRect::new(1, 1, 2, 1));
    assert_eq!(b, TrackRect::new(1, 2, 2, 1));
    assert!(a.fits(2) && b.fits(2));
}

// Scenario 5: a corrupted snapshot restores zero cards, markup order
// stands, and nothing panics.
#[test]
fn corrupt_snapshot_falls_back_to_markup_order() {
    let backend = Arc::new(MemoryStore::new());
    backend
        .set(LAYOUT_STORAGE_KEY, "][ definitely not json")
        .unwrap();
    let mut engine = engine_with_backend(Arc::clone(&backend), two_cards());
    let commands = engine.restore();
    assert_eq!(commands, vec![HostCommand::ForceReflow]);
    assert_eq!(engine.card(CardSlot(0)).unwrap().rect, TrackRect::new(1, 1, 2, 1));
    assert_eq!(engine.card(CardSlot(1)).unwrap().rect, TrackRect::new(3, 1, 2, 1));
    assert!(engine.registry().iter().all(|(_, card)| card.from_markup));
}

// A drag that never finds a valid cell (span wider than the narrow grid)
// ends with the card back at its committed position.
#[test]
fn drag_on_too_narrow_grid_reverts() {
    let backend = Arc::new(MemoryStore::new());
    let mut engine = GridEngine::new(
        GridSpec::new(500), // 2 tracks
        vec![
            CardSeed::new("wide", SizeClass::TwoByOne), // span 4
            CardSeed::new("small", SizeClass::OneByOne),
        ],
        LayoutStore::new(Box::new(Arc::clone(&backend))),
    );
    engine.set_edit_mode(true);
    let before = engine.card(CardSlot(0)).unwrap().rect;

    body_down(&mut engine, 0);
    engine.handle(GestureInput::PointerMove {
        position: PointerPoint::new(400, 900),
    });
    engine.handle(GestureInput::PointerUp {
        position: PointerPoint::new(400, 900),
    });
    assert_eq!(engine.card(CardSlot(0)).unwrap().rect, before);
}

// A pointer parked absurdly far below the grid maps to the last
// representable row instead of crashing the gesture.
#[test]
fn extreme_pointer_travel_never_panics() {
    let backend = Arc::new(MemoryStore::new());
    let mut engine = engine_with_backend(Arc::clone(&backend), two_cards());
    engine.set_edit_mode(true);
    body_down(&mut engine, 0);
    let far = PointerPoint::new(100, 15_400_000);
    engine.handle(GestureInput::PointerMove { position: far });
    engine.handle(GestureInput::PointerUp { position: far });
    let rect = engine.card(CardSlot(0)).unwrap().rect;
    assert_eq!((rect.col, rect.row), (1, u16::MAX));
}

// Anonymous cards participate in layout but never reach the snapshot.
#[test]
fn anonymous_cards_are_not_persisted() {
    let backend = Arc::new(MemoryStore::new());
    let mut engine = engine_with_backend(
        Arc::clone(&backend),
        vec![
            CardSeed::new("named", SizeClass::OneByOne),
            CardSeed::anonymous(SizeClass::OneByOne),
        ],
    );
    engine.set_edit_mode(true);
    drag_to(&mut engine, 1, 5, 1);
    let stored = backend.get(LAYOUT_STORAGE_KEY).unwrap().unwrap();
    assert!(stored.contains("named"));
    // Only one card entry is present.
    let config: serde_json::Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(config["cards"].as_object().unwrap().len(), 1);
}
