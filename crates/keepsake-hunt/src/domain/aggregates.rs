//! Aggregate root for the Collection Hunt.

use std::time::Duration;

use keepsake_core::aggregate::AggregateRoot;
use keepsake_core::clock::{Clock, Deadline};
use keepsake_core::error::DomainError;
use keepsake_core::event::EventMetadata;
use keepsake_core::geometry::{Point, Size};
use keepsake_core::ports::ScrollObserver;
use keepsake_core::rng::{DeterministicRng, shuffle};
use keepsake_gesture::{GestureClassifier, GestureKind, PointerId};
use keepsake_placement::application::placement_service::place;
use keepsake_placement::domain::zones::hunt_exclusion_zones;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::events::{
    CelebrationStarted, HuntCompleted, HuntEvent, HuntEventKind, ItemCollected,
    TransitionStarted, WrongPick,
};

/// Hunt tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HuntConfig {
    /// Collectibles that count towards completion.
    pub winning_count: u32,
    /// Collectibles that only produce wrong-pick feedback.
    pub decoy_count: u32,
    /// Distance kept from every viewport edge when placing.
    pub padding: f64,
    /// Confetti time before the transition screen.
    pub celebration_ms: u64,
    /// Transition screen time before completion.
    pub transition_ms: u64,
}

impl Default for HuntConfig {
    fn default() -> Self {
        Self {
            winning_count: 7,
            decoy_count: 5,
            padding: 80.0,
            celebration_ms: 1_500,
            transition_ms: 3_000,
        }
    }
}

/// Whether a collectible counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    /// Counts towards completion.
    Winning,
    /// Never removable.
    Decoy,
}

/// One tappable collectible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    /// Stable identifier.
    pub id: u32,
    /// Winning or decoy.
    pub kind: CollectibleKind,
    /// Current position.
    pub position: Point,
    /// Set once; collected items leave the interactable population.
    pub collected: bool,
}

/// Result of a collection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectOutcome {
    /// Not interactable yet, unknown id, or already collected.
    Ignored,
    /// A winning collectible was taken.
    Collected {
        /// Winning collectibles taken so far.
        count: u32,
    },
    /// A decoy was tapped.
    Wrong,
}

/// Completion sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HuntPhase {
    /// Collectibles are live.
    Hunting,
    /// Confetti.
    Celebrating {
        /// When the transition screen appears.
        until: Deadline,
    },
    /// Transition screen.
    Transitioning {
        /// When the hunt completes.
        until: Deadline,
    },
    /// Control has been handed back.
    Completed,
}

/// The aggregate root for the collectible hunt.
#[derive(Debug)]
pub struct CollectionHunt {
    /// Aggregate identifier.
    pub id: Uuid,
    config: HuntConfig,
    collectibles: Vec<Collectible>,
    gestures: Vec<GestureClassifier>,
    can_interact: bool,
    hint_visible: bool,
    collected_count: u32,
    phase: HuntPhase,
    version: i64,
    uncommitted_events: Vec<HuntEvent>,
}

impl CollectionHunt {
    /// Builds the population, shuffles it and places every collectible.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Configuration` if there is nothing to win.
    pub fn new(
        config: HuntConfig,
        viewport: Size,
        rng: &mut dyn DeterministicRng,
    ) -> Result<Self, DomainError> {
        if config.winning_count == 0 {
            return Err(DomainError::Configuration(
                "hunt needs at least one winning collectible".to_owned(),
            ));
        }

        let mut kinds: Vec<CollectibleKind> = std::iter::repeat_n(
            CollectibleKind::Winning,
            config.winning_count as usize,
        )
        .chain(std::iter::repeat_n(
            CollectibleKind::Decoy,
            config.decoy_count as usize,
        ))
        .collect();
        shuffle(&mut kinds, rng);

        let zones = hunt_exclusion_zones(viewport);
        let collectibles: Vec<Collectible> = (0u32..)
            .zip(kinds)
            .map(|(id, kind)| {
                let placement = place(viewport, config.padding, &zones, rng);
                Collectible {
                    id,
                    kind,
                    position: placement.point(),
                    collected: false,
                }
            })
            .collect();
        let gestures = vec![GestureClassifier::new(); collectibles.len()];

        Ok(Self {
            id: Uuid::new_v4(),
            config,
            collectibles,
            gestures,
            can_interact: false,
            hint_visible: false,
            collected_count: 0,
            phase: HuntPhase::Hunting,
            version: 0,
            uncommitted_events: Vec::new(),
        })
    }

    /// All collectibles, collected ones included.
    #[must_use]
    pub fn collectibles(&self) -> &[Collectible] {
        &self.collectibles
    }

    /// Collectibles that can still be tapped.
    pub fn interactable(&self) -> impl Iterator<Item = &Collectible> {
        self.collectibles.iter().filter(|c| !c.collected)
    }

    /// Winning collectibles taken.
    #[must_use]
    pub fn collected_count(&self) -> u32 {
        self.collected_count
    }

    /// Whether taps are accepted.
    #[must_use]
    pub fn can_interact(&self) -> bool {
        self.can_interact
    }

    /// Whether the scroll hint prompt is shown.
    #[must_use]
    pub fn hint_visible(&self) -> bool {
        self.hint_visible
    }

    /// Whether the side counter card is shown.
    #[must_use]
    pub fn counter_visible(&self) -> bool {
        self.collected_count > 0
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> HuntPhase {
        self.phase
    }

    /// Whether the hunt has handed control back.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.phase, HuntPhase::Completed)
    }

    /// Polls the scroll observer. Both signals latch once set.
    pub fn observe_scroll(&mut self, scroll: &dyn ScrollObserver) {
        if !self.can_interact && scroll.near_bottom() {
            self.can_interact = true;
            tracing::debug!(hunt_id = %self.id, "hunt became interactable");
        }
        if !self.hint_visible && scroll.past_hint_threshold() {
            self.hint_visible = true;
        }
    }

    /// Attempts to take collectible `id`.
    pub fn attempt_collect(&mut self, id: u32, clock: &dyn Clock) -> CollectOutcome {
        if !self.can_interact {
            return CollectOutcome::Ignored;
        }
        let Some(index) = self.index_of(id) else {
            return CollectOutcome::Ignored;
        };
        if self.collectibles[index].collected {
            return CollectOutcome::Ignored;
        }

        match self.collectibles[index].kind {
            CollectibleKind::Decoy => {
                tracing::debug!(hunt_id = %self.id, collectible_id = id, "wrong pick");
                self.record(
                    HuntEventKind::WrongPick(WrongPick { collectible_id: id }),
                    clock,
                );
                CollectOutcome::Wrong
            }
            CollectibleKind::Winning => {
                self.collectibles[index].collected = true;
                self.gestures[index].cancel();
                self.collected_count += 1;
                let count = self.collected_count;
                tracing::debug!(hunt_id = %self.id, collectible_id = id, count, "collected");
                self.record(
                    HuntEventKind::ItemCollected(ItemCollected {
                        collectible_id: id,
                        collected_count: count,
                    }),
                    clock,
                );
                if count == self.config.winning_count {
                    self.start_celebration(clock);
                }
                CollectOutcome::Collected { count }
            }
        }
    }

    /// Claims collectible `id` for a pointer.
    ///
    /// Ignored while the hunt is not interactable or once the collectible
    /// has been taken.
    pub fn pointer_down(&mut self, id: u32, pointer_id: PointerId, at: Point) -> bool {
        if !self.can_interact {
            return false;
        }
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let collectible = &self.collectibles[index];
        if collectible.collected {
            return false;
        }
        let position = collectible.position;
        self.gestures[index].pointer_down(pointer_id, at, position)
    }

    /// Drags collectible `id` around. Returns its new position.
    pub fn pointer_move(&mut self, id: u32, pointer_id: PointerId, at: Point) -> Option<Point> {
        let index = self.index_of(id)?;
        let position = self.gestures[index].pointer_move(pointer_id, at)?;
        self.collectibles[index].position = position;
        Some(position)
    }

    /// Releases collectible `id`; a tap attempts collection.
    ///
    /// Returns `None` if the release did not belong to a gesture on it.
    pub fn pointer_up(
        &mut self,
        id: u32,
        pointer_id: PointerId,
        at: Point,
        clock: &dyn Clock,
    ) -> Option<CollectOutcome> {
        let index = self.index_of(id)?;
        match self.gestures[index].pointer_up(pointer_id, at)? {
            GestureKind::Tap => Some(self.attempt_collect(id, clock)),
            GestureKind::Drag => Some(CollectOutcome::Ignored),
        }
    }

    /// Advances the completion sequence. Returns whether the hunt is complete.
    pub fn tick(&mut self, clock: &dyn Clock) -> bool {
        let now = clock.now();
        if let HuntPhase::Celebrating { until } = self.phase {
            if until.is_due(now) {
                self.phase = HuntPhase::Transitioning {
                    until: Deadline::after(
                        until.due_at(),
                        Duration::from_millis(self.config.transition_ms),
                    ),
                };
                tracing::debug!(hunt_id = %self.id, "hunt transition screen");
                self.record(HuntEventKind::TransitionStarted(TransitionStarted), clock);
            }
        }
        if let HuntPhase::Transitioning { until } = self.phase {
            if until.is_due(now) {
                self.phase = HuntPhase::Completed;
                tracing::info!(hunt_id = %self.id, "hunt completed");
                self.record(
                    HuntEventKind::HuntCompleted(HuntCompleted {
                        collected_count: self.collected_count,
                    }),
                    clock,
                );
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

    fn start_celebration(&mut self, clock: &dyn Clock) {
        self.phase = HuntPhase::Celebrating {
            until: Deadline::after(
                clock.now(),
                Duration::from_millis(self.config.celebration_ms),
            ),
        };
        tracing::info!(hunt_id = %self.id, "all winning collectibles found");
        self.record(
            HuntEventKind::CelebrationStarted(CelebrationStarted {
                collected_count: self.collected_count,
            }),
            clock,
        );
    }

    fn index_of(&self, id: u32) -> Option<usize> {
        self.collectibles.iter().position(|c| c.id == id)
    }

    fn record(&mut self, kind: HuntEventKind, clock: &dyn Clock) {
        self.version += 1;
        let metadata =
            EventMetadata::new(kind.event_type(), self.id, self.version, clock.now());
        self.uncommitted_events.push(HuntEvent { metadata, kind });
    }
}

impl AggregateRoot for CollectionHunt {
    type Event = HuntEvent;

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
    use keepsake_test_support::{ManualClock, ScriptedScroll};

    use super::*;

    const VIEWPORT: Size = Size::new(1440.0, 900.0);

    fn interactable_hunt() -> CollectionHunt {
        let mut rng = SeededRng::from_seed(3);
        let mut hunt = CollectionHunt::new(HuntConfig::default(), VIEWPORT, &mut rng).unwrap();
        let scroll = ScriptedScroll::new();
        scroll.set_near_bottom(true);
        hunt.observe_scroll(&scroll);
        hunt
    }

    fn ids_of(hunt: &CollectionHunt, kind: CollectibleKind) -> Vec<u32> {
        hunt.collectibles()
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.id)
            .collect()
    }

    #[test]
    fn test_new_builds_seven_winning_and_five_decoys() {
        let hunt = interactable_hunt();

        assert_eq!(ids_of(&hunt, CollectibleKind::Winning).len(), 7);
        assert_eq!(ids_of(&hunt, CollectibleKind::Decoy).len(), 5);
        let zones = hunt_exclusion_zones(VIEWPORT);
        assert!(
            hunt.collectibles()
                .iter()
                .all(|c| !zones.iter().any(|z| z.contains(c.position)))
        );
    }

    #[test]
    fn test_collect_is_ignored_until_near_bottom() {
        // Arrange
        let clock = ManualClock::new();
        let mut rng = SeededRng::from_seed(3);
        let mut hunt = CollectionHunt::new(HuntConfig::default(), VIEWPORT, &mut rng).unwrap();
        let winner = ids_of(&hunt, CollectibleKind::Winning)[0];
        let scroll = ScriptedScroll::new();

        // Act
        hunt.observe_scroll(&scroll);
        let before = hunt.attempt_collect(winner, &clock);
        scroll.set_near_bottom(true);
        hunt.observe_scroll(&scroll);
        scroll.set_near_bottom(false);
        hunt.observe_scroll(&scroll);
        let after = hunt.attempt_collect(winner, &clock);

        // Assert
        assert_eq!(before, CollectOutcome::Ignored);
        assert_eq!(after, CollectOutcome::Collected { count: 1 });
        assert!(hunt.can_interact());
    }

    #[test]
    fn test_hint_latches_past_threshold() {
        let mut hunt = interactable_hunt();
        let scroll = ScriptedScroll::new();

        scroll.set_past_hint_threshold(true);
        hunt.observe_scroll(&scroll);
        scroll.set_past_hint_threshold(false);
        hunt.observe_scroll(&scroll);

        assert!(hunt.hint_visible());
    }

    #[test]
    fn test_decoys_and_duplicates_do_not_change_count() {
        let clock = ManualClock::new();
        let mut hunt = interactable_hunt();
        let winner = ids_of(&hunt, CollectibleKind::Winning)[0];
        let decoy = ids_of(&hunt, CollectibleKind::Decoy)[0];

        assert_eq!(hunt.attempt_collect(decoy, &clock), CollectOutcome::Wrong);
        assert_eq!(hunt.attempt_collect(decoy, &clock), CollectOutcome::Wrong);
        assert_eq!(hunt.attempt_collect(winner, &clock), CollectOutcome::Collected { count: 1 });
        assert_eq!(hunt.attempt_collect(winner, &clock), CollectOutcome::Ignored);
        assert_eq!(hunt.attempt_collect(999, &clock), CollectOutcome::Ignored);

        assert_eq!(hunt.collected_count(), 1);
        assert_eq!(hunt.interactable().count(), 11);
        assert!(hunt.counter_visible());
    }

    #[test]
    fn test_completion_sequence_runs_once_after_seven_winners() {
        // Arrange
        let clock = ManualClock::new();
        let mut hunt = interactable_hunt();
        let winners = ids_of(&hunt, CollectibleKind::Winning);
        let decoys = ids_of(&hunt, CollectibleKind::Decoy);

        // Act: decoys interleaved with winners.
        for (i, id) in winners.iter().enumerate() {
            hunt.attempt_collect(decoys[i % decoys.len()], &clock);
            hunt.attempt_collect(*id, &clock);
        }
        assert!(matches!(hunt.phase(), HuntPhase::Celebrating { .. }));

        clock.advance_ms(1_499);
        assert!(!hunt.tick(&clock));
        clock.advance_ms(1);
        assert!(!hunt.tick(&clock));
        assert!(matches!(hunt.phase(), HuntPhase::Transitioning { .. }));
        clock.advance_ms(2_999);
        assert!(!hunt.tick(&clock));
        clock.advance_ms(1);
        assert!(hunt.tick(&clock));
        clock.advance_ms(10_000);
        assert!(hunt.tick(&clock));

        // Assert
        let events = hunt.take_uncommitted_events();
        let count = |ty: &str| events.iter().filter(|e| e.event_type() == ty).count();
        assert_eq!(count("hunt.item_collected"), 7);
        assert_eq!(count("hunt.wrong_pick"), 7);
        assert_eq!(count("hunt.celebration_started"), 1);
        assert_eq!(count("hunt.transition_started"), 1);
        assert_eq!(count("hunt.completed"), 1);
    }

    #[test]
    fn test_large_clock_jump_completes_in_one_tick() {
        let clock = ManualClock::new();
        let mut hunt = interactable_hunt();
        for id in ids_of(&hunt, CollectibleKind::Winning) {
            hunt.attempt_collect(id, &clock);
        }

        clock.advance_ms(60_000);

        assert!(hunt.tick(&clock));
    }

    #[test]
    fn test_tap_collects_but_drag_only_moves() {
        // Arrange
        let clock = ManualClock::new();
        let mut hunt = interactable_hunt();
        let winners = ids_of(&hunt, CollectibleKind::Winning);
        let (dragged, tapped) = (winners[0], winners[1]);
        let origin = hunt.collectibles()[hunt.index_of(dragged).unwrap()].position;

        // Act
        assert!(hunt.pointer_down(dragged, 1, Point::new(0.0, 0.0)));
        let moved = hunt.pointer_move(dragged, 1, Point::new(40.0, 0.0));
        let drag = hunt.pointer_up(dragged, 1, Point::new(40.0, 0.0), &clock);

        assert!(hunt.pointer_down(tapped, 2, Point::new(0.0, 0.0)));
        let tap = hunt.pointer_up(tapped, 2, Point::new(2.0, 2.0), &clock);

        // Assert
        assert_eq!(moved, Some(origin.offset(40.0, 0.0)));
        assert_eq!(drag, Some(CollectOutcome::Ignored));
        assert_eq!(tap, Some(CollectOutcome::Collected { count: 1 }));
        assert!(!hunt.pointer_down(tapped, 3, Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_zero_winning_is_rejected() {
        let mut rng = SeededRng::from_seed(1);
        let config = HuntConfig {
            winning_count: 0,
            ..HuntConfig::default()
        };

        let result = CollectionHunt::new(config, VIEWPORT, &mut rng);

        assert!(matches!(result, Err(DomainError::Configuration(_))));
    }
}
