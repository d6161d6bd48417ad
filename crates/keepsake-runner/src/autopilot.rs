//! Plays through the experience without a human.
//!
//! Each tick the autopilot looks at the mounted stage and makes at most one
//! move, the way a guest would: solving, tapping, waiting.

use std::sync::Arc;

use keepsake_capture::application::photo_booth::PhotoBooth;
use keepsake_capture::domain::prank::{CheckoutPrank, PrankPhase};
use keepsake_capture::domain::session::CapturePhase;
use keepsake_core::clock::Clock;
use keepsake_core::geometry::Point;
use keepsake_gate::domain::aggregates::{AccessGate, GateView, SLOT_COUNT};
use keepsake_hunt::domain::aggregates::{CollectibleKind, CollectionHunt};
use keepsake_orchestrator::application::experience::MountedStage;

use crate::adapters::AutoScroll;

/// A wrong code to trip the first failure with.
const WRONG_CODE: &str = "000000";
const POINTER: i64 = 1;
/// Horizontal step between lined-up puzzle tiles. Left of the scatter range.
const TILE_STEP: f64 = 15.0;

fn lined_up_x(tile_id: u32) -> f64 {
    f64::from(tile_id) * TILE_STEP
}

/// Scripted guest.
#[derive(Debug)]
pub struct Autopilot {
    access_code: String,
    track_index: usize,
    scroll: Arc<AutoScroll>,
    downloaded: bool,
}

impl Autopilot {
    /// Creates an autopilot that knows the code and which track to pick.
    #[must_use]
    pub fn new(access_code: String, track_index: usize, scroll: Arc<AutoScroll>) -> Self {
        Self {
            access_code,
            track_index,
            scroll,
            downloaded: false,
        }
    }

    /// Makes this tick's move on the mounted stage.
    pub fn act(&mut self, stage: &mut MountedStage, clock: &dyn Clock) {
        match stage {
            MountedStage::Locked(gate) => self.act_on_gate(gate, clock),
            MountedStage::SelectingMusic(picker) => {
                picker.select(self.track_index);
            }
            MountedStage::Intro(puzzle) => {
                if puzzle.is_solved() {
                    return;
                }
                // Line tiles up left to right in id order, one per tick.
                let next = puzzle
                    .tiles()
                    .iter()
                    .find(|t| (t.position.x - lined_up_x(t.id)).abs() > 1e-6)
                    .map(|t| (t.id, t.position));
                if let Some((id, from)) = next {
                    let to = Point::new(lined_up_x(id), from.y);
                    puzzle.pointer_down(id, POINTER, from);
                    puzzle.pointer_move(id, POINTER, to);
                    puzzle.pointer_up(id, POINTER, to, clock);
                }
            }
            MountedStage::Main(hunt) => self.act_on_hunt(hunt, clock),
            MountedStage::PhotoBooth(booth) => self.act_on_booth(booth, clock),
            MountedStage::FinalMessage(message) => {
                message.continue_clicked();
            }
            MountedStage::Motivation(_) | MountedStage::Outro(_) => {}
        }
    }

    fn act_on_gate(&self, gate: &mut AccessGate, clock: &dyn Clock) {
        if gate.view() == GateView::Recommendation {
            gate.continue_to_passcode();
            return;
        }
        let code = if gate.hint_stage() > 0 {
            self.access_code.as_str()
        } else if gate.hint_available() {
            gate.advance_hint(clock);
            return;
        } else {
            WRONG_CODE
        };
        for (slot, digit) in code.chars().take(SLOT_COUNT).enumerate() {
            gate.enter(slot, &digit.to_string(), clock);
        }
    }

    fn act_on_hunt(&self, hunt: &mut CollectionHunt, clock: &dyn Clock) {
        if !hunt.can_interact() {
            self.scroll.scroll_to_bottom();
            return;
        }
        let next = hunt
            .interactable()
            .find(|c| c.kind == CollectibleKind::Winning)
            .map(|c| (c.id, c.position));
        if let Some((id, at)) = next {
            hunt.pointer_down(id, POINTER, at);
            hunt.pointer_up(id, POINTER, at, clock);
        }
    }

    fn act_on_booth(&mut self, booth: &mut PhotoBooth, clock: &dyn Clock) {
        if booth.phase() == CapturePhase::Idle && booth.shot_count() == 0 {
            booth.start_session(clock);
            return;
        }
        if booth.phase() != CapturePhase::Done {
            return;
        }
        if !self.downloaded {
            self.downloaded = booth.download(clock);
            return;
        }
        match booth.prank().map(CheckoutPrank::phase) {
            Some(PrankPhase::IdlePrompt) => {
                booth.prank_done(clock);
            }
            Some(PrankPhase::PaymentSheet) => {
                booth.prank_choose_bank(clock);
            }
            _ => {}
        }
    }
}
