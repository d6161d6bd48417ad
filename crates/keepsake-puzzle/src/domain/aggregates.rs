//! Aggregate root for the Ordering Puzzle.

use std::time::Duration;

use keepsake_core::aggregate::AggregateRoot;
use keepsake_core::clock::{Clock, Deadline};
use keepsake_core::error::DomainError;
use keepsake_core::event::EventMetadata;
use keepsake_core::geometry::{Point, Rect, Size};
use keepsake_core::rng::{DeterministicRng, uniform};
use keepsake_gesture::{GestureClassifier, PointerId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::events::{
    ArrangementEvaluated, PuzzleCompleted, PuzzleEvent, PuzzleEventKind, PuzzleSolved,
};
use super::layout::canonical_layout;

/// The word the intro puzzle asks for.
pub const TARGET_WORD: [char; 9] = ['i', 'n', 'e', 'f', 'f', 'a', 'b', 'l', 'e'];

/// Scatter range, as fractions of the viewport, for initial tile positions.
const SCATTER_MIN: f64 = 0.10;
const SCATTER_MAX: f64 = 0.80;
/// Maximum initial tilt in degrees, either way.
const SCATTER_TILT: f64 = 15.0;

/// Puzzle tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleConfig {
    /// Symbols in solved order.
    pub target: Vec<char>,
    /// Measured bounding box of one tile.
    pub tile_size: Size,
    /// Fraction of a tile width between neighbours in the solved row.
    pub overlap_factor: f64,
    /// Scale applied to tiles in the solved row.
    pub solved_scale: f64,
    /// Hold plus fade time between solving and completion.
    pub settle_delay_ms: u64,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            target: TARGET_WORD.to_vec(),
            tile_size: Size::new(96.0, 120.0),
            overlap_factor: 0.45,
            solved_scale: 1.2,
            settle_delay_ms: 4_000,
        }
    }
}

impl PuzzleConfig {
    /// The target as a string.
    #[must_use]
    pub fn target_word(&self) -> String {
        self.target.iter().collect()
    }
}

/// One draggable letter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetterTile {
    /// Stable identifier, also the tie-break when two tiles share an x.
    pub id: u32,
    /// The letter; never changes.
    pub symbol: char,
    /// Top-left position in the viewport.
    pub position: Point,
    /// Rotation in degrees.
    pub rotation: f64,
    /// Display scale.
    pub scale: f64,
    /// Whether the tile still accepts gestures.
    pub interactive: bool,
}

/// Puzzle lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzlePhase {
    /// Tiles are being arranged.
    Scattered,
    /// The word was formed; waiting out the settle delay.
    Solved {
        /// When the puzzle hands control back.
        settles: Deadline,
    },
    /// Control has been handed back.
    Completed,
}

/// The aggregate root for the intro letter puzzle.
#[derive(Debug)]
pub struct OrderingPuzzle {
    /// Aggregate identifier.
    pub id: Uuid,
    config: PuzzleConfig,
    viewport: Size,
    tiles: Vec<LetterTile>,
    gestures: Vec<GestureClassifier>,
    phase: PuzzlePhase,
    version: i64,
    uncommitted_events: Vec<PuzzleEvent>,
}

impl OrderingPuzzle {
    /// Scatters one tile per target symbol at random spots in the viewport.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Configuration` if the target is empty.
    pub fn scatter(
        config: PuzzleConfig,
        viewport: Size,
        rng: &mut dyn DeterministicRng,
    ) -> Result<Self, DomainError> {
        let placements = config
            .target
            .iter()
            .map(|_| {
                let position = Point::new(
                    viewport.width * uniform(rng, SCATTER_MIN, SCATTER_MAX),
                    viewport.height * uniform(rng, SCATTER_MIN, SCATTER_MAX),
                );
                (position, uniform(rng, -SCATTER_TILT, SCATTER_TILT))
            })
            .collect();
        Self::build(config, viewport, placements)
    }

    /// Creates a puzzle with tiles at explicit positions, in target order.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `positions` does not hold exactly
    /// one position per target symbol, or `DomainError::Configuration` if the
    /// target is empty.
    pub fn with_positions(
        config: PuzzleConfig,
        viewport: Size,
        positions: Vec<Point>,
    ) -> Result<Self, DomainError> {
        if positions.len() != config.target.len() {
            return Err(DomainError::Validation(format!(
                "expected {} tile positions, got {}",
                config.target.len(),
                positions.len()
            )));
        }
        let placements = positions.into_iter().map(|p| (p, 0.0)).collect();
        Self::build(config, viewport, placements)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn build(
        config: PuzzleConfig,
        viewport: Size,
        placements: Vec<(Point, f64)>,
    ) -> Result<Self, DomainError> {
        if config.target.is_empty() {
            return Err(DomainError::Configuration(
                "puzzle target must not be empty".to_owned(),
            ));
        }
        let tiles: Vec<LetterTile> = config
            .target
            .iter()
            .zip(placements)
            .enumerate()
            .map(|(i, (&symbol, (position, rotation)))| LetterTile {
                id: i as u32,
                symbol,
                position,
                rotation,
                scale: 1.0,
                interactive: true,
            })
            .collect();
        let gestures = vec![GestureClassifier::new(); tiles.len()];

        Ok(Self {
            id: Uuid::new_v4(),
            config,
            viewport,
            tiles,
            gestures,
            phase: PuzzlePhase::Scattered,
            version: 0,
            uncommitted_events: Vec::new(),
        })
    }

    /// All tiles, indexed by id.
    #[must_use]
    pub fn tiles(&self) -> &[LetterTile] {
        &self.tiles
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> PuzzlePhase {
        self.phase
    }

    /// Whether the target word has been formed. Never reverts.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        !matches!(self.phase, PuzzlePhase::Scattered)
    }

    /// Whether the puzzle has handed control back.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.phase, PuzzlePhase::Completed)
    }

    /// Tile ids in reading order: ascending x, ties broken by ascending id.
    #[must_use]
    pub fn reading_order(&self) -> Vec<u32> {
        let mut ordered: Vec<&LetterTile> = self.tiles.iter().collect();
        ordered.sort_by(|a, b| {
            a.position
                .x
                .total_cmp(&b.position.x)
                .then(a.id.cmp(&b.id))
        });
        ordered.into_iter().map(|tile| tile.id).collect()
    }

    /// The symbols read left to right.
    #[must_use]
    pub fn formed_word(&self) -> String {
        self.reading_order()
            .into_iter()
            .map(|id| self.tiles[id as usize].symbol)
            .collect()
    }

    /// Starts dragging tile `tile_id`.
    ///
    /// Returns `false` for unknown or non-interactive tiles, or when another
    /// pointer already holds the tile.
    pub fn pointer_down(&mut self, tile_id: u32, pointer_id: PointerId, at: Point) -> bool {
        let Some(tile) = self.tiles.get(tile_id as usize) else {
            return false;
        };
        if !tile.interactive {
            return false;
        }
        let position = tile.position;
        self.gestures[tile_id as usize].pointer_down(pointer_id, at, position)
    }

    /// Moves a dragged tile, keeping it inside the viewport.
    ///
    /// Never evaluates the arrangement. Returns the tile's new position.
    pub fn pointer_move(&mut self, tile_id: u32, pointer_id: PointerId, at: Point) -> Option<Point> {
        let index = tile_id as usize;
        let raw = self.gestures.get_mut(index)?.pointer_move(pointer_id, at)?;
        let position = self.drag_bounds().clamp(raw);
        self.tiles[index].position = position;
        Some(position)
    }

    /// Releases a dragged tile and evaluates the arrangement.
    ///
    /// Returns whether the puzzle is solved after the release, or `None` if
    /// the release did not belong to a gesture on this tile.
    pub fn pointer_up(
        &mut self,
        tile_id: u32,
        pointer_id: PointerId,
        at: Point,
        clock: &dyn Clock,
    ) -> Option<bool> {
        self.gestures
            .get_mut(tile_id as usize)?
            .pointer_up(pointer_id, at)?;
        Some(self.evaluate(clock))
    }

    /// Reads the arrangement and solves the puzzle on an exact match.
    ///
    /// Returns whether the puzzle is solved. Once solved, further calls
    /// change nothing.
    pub fn evaluate(&mut self, clock: &dyn Clock) -> bool {
        if self.is_solved() {
            return true;
        }

        let formed_word = self.formed_word();
        let solved = formed_word == self.config.target_word();
        tracing::debug!(puzzle_id = %self.id, %formed_word, solved, "arrangement evaluated");
        self.record(
            PuzzleEventKind::ArrangementEvaluated(ArrangementEvaluated {
                formed_word,
                solved,
            }),
            clock,
        );

        if solved {
            self.solve(clock);
        }
        solved
    }

    fn solve(&mut self, clock: &dyn Clock) {
        let intents = canonical_layout(
            &self.reading_order(),
            self.config.tile_size,
            self.viewport,
            self.config.overlap_factor,
            self.config.solved_scale,
        );

        for gesture in &mut self.gestures {
            gesture.cancel();
        }
        for intent in &intents {
            let tile = &mut self.tiles[intent.tile_id as usize];
            tile.position = intent.target;
            tile.rotation = intent.rotation;
            tile.scale = intent.scale;
            tile.interactive = false;
        }

        self.phase = PuzzlePhase::Solved {
            settles: Deadline::after(
                clock.now(),
                Duration::from_millis(self.config.settle_delay_ms),
            ),
        };
        tracing::info!(puzzle_id = %self.id, "puzzle solved");
        self.record(PuzzleEventKind::PuzzleSolved(PuzzleSolved { intents }), clock);
    }

    /// Advances the settle timer. Returns whether the puzzle is complete.
    pub fn tick(&mut self, clock: &dyn Clock) -> bool {
        if let PuzzlePhase::Solved { settles } = self.phase {
            if settles.is_due(clock.now()) {
                self.phase = PuzzlePhase::Completed;
                let word = self.config.target_word();
                self.record(PuzzleEventKind::PuzzleCompleted(PuzzleCompleted { word }), clock);
            }
        }
        self.is_complete()
    }

    /// Tears down gestures in flight. Called when the stage unmounts.
    pub fn unmount(&mut self) {
        for gesture in &mut self.gestures {
            gesture.cancel();
        }
    }

    fn drag_bounds(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            (self.viewport.width - self.config.tile_size.width).max(0.0),
            (self.viewport.height - self.config.tile_size.height).max(0.0),
        )
    }

    fn record(&mut self, kind: PuzzleEventKind, clock: &dyn Clock) {
        self.version += 1;
        let metadata =
            EventMetadata::new(kind.event_type(), self.id, self.version, clock.now());
        self.uncommitted_events.push(PuzzleEvent { metadata, kind });
    }
}

impl AggregateRoot for OrderingPuzzle {
    type Event = PuzzleEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn take_uncommitted_events(&mut self) -> Vec<Self::Event> {
        std::mem::take(&mut self.uncommitted_events)
    }
}

#[cfg(test)]
mod tests {
    use keepsake_core::event::DomainEvent;
    use keepsake_core::rng::SeededRng;
    use keepsake_test_support::ManualClock;

    use super::*;

    const VIEWPORT: Size = Size::new(1200.0, 800.0);

    /// Positions whose ascending x spells the target.
    fn solved_positions() -> Vec<Point> {
        (0..9).map(|i| Point::new(100.0 + f64::from(i) * 80.0, 300.0)).collect()
    }

    #[test]
    fn test_target_order_is_solved() {
        // Arrange
        let clock = ManualClock::new();
        let mut puzzle =
            OrderingPuzzle::with_positions(PuzzleConfig::default(), VIEWPORT, solved_positions())
                .unwrap();

        // Act
        let solved = puzzle.evaluate(&clock);

        // Assert
        assert!(solved);
        assert!(puzzle.is_solved());
        assert_eq!(puzzle.formed_word(), "ineffable");
        assert!(puzzle.tiles().iter().all(|t| !t.interactive));
    }

    #[test]
    fn test_scrambled_order_is_not_solved() {
        let clock = ManualClock::new();
        let mut positions = solved_positions();
        positions.swap(0, 1); // "nieffable"
        let mut puzzle =
            OrderingPuzzle::with_positions(PuzzleConfig::default(), VIEWPORT, positions).unwrap();

        assert!(!puzzle.evaluate(&clock));
        assert_eq!(puzzle.formed_word(), "nieffable");
        assert_eq!(puzzle.phase(), PuzzlePhase::Scattered);
    }

    #[test]
    fn test_swapping_identical_letters_still_solves() {
        let clock = ManualClock::new();
        let mut positions = solved_positions();
        positions.swap(3, 4); // the two f's
        let mut puzzle =
            OrderingPuzzle::with_positions(PuzzleConfig::default(), VIEWPORT, positions).unwrap();

        assert!(puzzle.evaluate(&clock));
    }

    #[test]
    fn test_equal_x_is_broken_by_tile_id() {
        let clock = ManualClock::new();
        let positions = vec![Point::new(10.0, 0.0); 9];
        let mut puzzle =
            OrderingPuzzle::with_positions(PuzzleConfig::default(), VIEWPORT, positions).unwrap();

        assert_eq!(puzzle.reading_order(), (0..9).collect::<Vec<u32>>());
        assert!(puzzle.evaluate(&clock));
    }

    #[test]
    fn test_moving_does_not_evaluate_but_release_does() {
        // Arrange: 'i' starts at the far right.
        let clock = ManualClock::new();
        let mut positions = solved_positions();
        positions[0] = Point::new(1000.0, 300.0);
        let mut puzzle =
            OrderingPuzzle::with_positions(PuzzleConfig::default(), VIEWPORT, positions).unwrap();

        // Act: drag 'i' to the far left.
        assert!(puzzle.pointer_down(0, 1, Point::new(1010.0, 310.0)));
        puzzle.pointer_move(0, 1, Point::new(20.0, 310.0));
        let mid_drag_events = puzzle.uncommitted_events().len();
        let solved = puzzle.pointer_up(0, 1, Point::new(20.0, 310.0), &clock);

        // Assert
        assert_eq!(mid_drag_events, 0);
        assert_eq!(solved, Some(true));
        let events = puzzle.take_uncommitted_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type(), "puzzle.arrangement_evaluated");
        assert_eq!(events[1].event_type(), "puzzle.solved");
        assert_eq!(events[1].metadata().sequence_number, 2);
    }

    #[test]
    fn test_drag_is_clamped_to_viewport() {
        let clock = ManualClock::new();
        let mut puzzle =
            OrderingPuzzle::with_positions(PuzzleConfig::default(), VIEWPORT, solved_positions())
                .unwrap();

        puzzle.pointer_down(2, 1, Point::new(0.0, 0.0));
        let position = puzzle.pointer_move(2, 1, Point::new(-5000.0, 9000.0)).unwrap();
        puzzle.pointer_up(2, 1, Point::new(-5000.0, 9000.0), &clock);

        assert_eq!(position, Point::new(0.0, 800.0 - 120.0));
    }

    #[test]
    fn test_solved_puzzle_rejects_gestures_and_completes_after_settle_delay() {
        // Arrange
        let clock = ManualClock::new();
        let mut puzzle =
            OrderingPuzzle::with_positions(PuzzleConfig::default(), VIEWPORT, solved_positions())
                .unwrap();
        puzzle.evaluate(&clock);
        let before = puzzle.tiles().to_vec();

        // Act / Assert
        assert!(!puzzle.pointer_down(0, 1, Point::new(0.0, 0.0)));
        assert_eq!(puzzle.tiles(), before.as_slice());

        clock.advance_ms(3_999);
        assert!(!puzzle.tick(&clock));
        clock.advance_ms(1);
        assert!(puzzle.tick(&clock));
        assert!(puzzle.tick(&clock));

        let completions = puzzle
            .take_uncommitted_events()
            .into_iter()
            .filter(|e| e.event_type() == "puzzle.completed")
            .count();
        assert_eq!(completions, 1);
    }

    #[test]
    fn test_solved_tiles_sit_in_canonical_row() {
        let clock = ManualClock::new();
        let mut puzzle =
            OrderingPuzzle::with_positions(PuzzleConfig::default(), VIEWPORT, solved_positions())
                .unwrap();

        puzzle.evaluate(&clock);

        let spacing = 96.0 * 0.45;
        let row = 8.0 * spacing + 96.0;
        let first = &puzzle.tiles()[0];
        assert!((first.position.x - (1200.0 - row) / 2.0).abs() < 1e-9);
        assert!((first.position.y - (800.0 - 120.0) / 2.0).abs() < 1e-9);
        assert!((first.scale - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_scatter_keeps_symbols_as_target_multiset() {
        let mut rng = SeededRng::from_seed(9);
        let puzzle = OrderingPuzzle::scatter(PuzzleConfig::default(), VIEWPORT, &mut rng).unwrap();

        let mut symbols: Vec<char> = puzzle.tiles().iter().map(|t| t.symbol).collect();
        let mut target = TARGET_WORD.to_vec();
        symbols.sort_unstable();
        target.sort_unstable();
        assert_eq!(symbols, target);
        assert!(puzzle.tiles().iter().all(|t| {
            t.position.x >= 120.0 && t.position.x < 960.0 && t.rotation.abs() <= 15.0
        }));
    }

    #[test]
    fn test_with_positions_rejects_wrong_count() {
        let result =
            OrderingPuzzle::with_positions(PuzzleConfig::default(), VIEWPORT, vec![Point::default()]);

        match result {
            Err(DomainError::Validation(msg)) => assert_eq!(msg, "expected 9 tile positions, got 1"),
            other => panic!("expected Validation, got {other:?}"),
        }
    }
}
