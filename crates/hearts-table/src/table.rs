//! A playing session: one engine, its task queue and the policies behind automated seats.
//!
//! Collecting a full trick and every automated move are scheduled rather than performed
//! inline, so a presentation can show the table between steps. Each task carries the deal
//! it belongs to and is ignored if a new deal started in the meantime.

use std::array;
use std::time::Duration;

use hearts_bot::{Policy, PolicyContext, PolicyKind};
use hearts_core::deal::DealError;
use hearts_core::game::engine::{GameEngine, GamePhase, PlayError, PlayOutcome};
use hearts_core::game::schedule::{Scheduled, Scheduler};
use hearts_core::game::view::SeatView;
use hearts_core::model::card::Card;
use hearts_core::model::score::ScoreBoard;
use hearts_core::model::seat::Seat;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{PacingConfig, TableConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableTask {
    ResolveTrick,
    AutoPlay(Seat),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableEvent {
    CardPlayed { seat: Seat, card: Card },
    TrickResolved { winner: Seat, points: u32 },
    GameOver { scores: [u32; 4] },
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error(transparent)]
    Deal(#[from] DealError),
    #[error(transparent)]
    Play(#[from] PlayError),
    #[error("automated seat {seat} produced no card")]
    NoMove { seat: Seat },
}

pub struct Table {
    engine: GameEngine,
    scheduler: Scheduler<TableTask>,
    policies: [Option<Box<dyn Policy>>; 4],
    pacing: PacingConfig,
}

impl Table {
    /// Seats with a policy are automated; the rest wait for `play_human`.
    pub fn new(
        engine: GameEngine,
        policies: [Option<Box<dyn Policy>>; 4],
        pacing: PacingConfig,
    ) -> Self {
        let mut table = Self {
            engine,
            scheduler: Scheduler::new(),
            policies,
            pacing,
        };
        table.schedule_turn();
        table
    }

    pub fn from_config(config: &TableConfig) -> Result<Self, TableError> {
        let seed = config.seed.unwrap_or_else(rand::random);
        let engine = GameEngine::with_seed(seed)?;
        let kind = PolicyKind::from(config.bots.kind);
        let policies = array::from_fn(|index| {
            let automated = index != Seat::HUMAN.index() || config.autopilot;
            automated.then(|| kind.build(Some(seed.wrapping_add(index as u64 + 1))))
        });
        info!(seed, autopilot = config.autopilot, bots = ?kind, "table opened");
        Ok(Self::new(engine, policies, config.pacing))
    }

    /// What the human seat may see. Automated seats are only seen through their policies.
    pub fn view(&self) -> SeatView {
        self.engine.view(Seat::HUMAN)
    }

    pub fn deal_id(&self) -> u64 {
        self.engine.deal_id()
    }

    pub fn phase(&self) -> GamePhase {
        self.engine.phase()
    }

    pub fn turn(&self) -> Seat {
        self.engine.turn()
    }

    pub fn scores(&self) -> &ScoreBoard {
        self.engine.scores()
    }

    pub fn is_automated(&self, seat: Seat) -> bool {
        self.policies[seat.index()].is_some()
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }

    pub fn until_next(&self) -> Option<Duration> {
        self.scheduler.until_next()
    }

    /// Abandons the current deal, including anything still scheduled for it.
    pub fn new_deal(&mut self) -> Result<u64, TableError> {
        let deal_id = self.engine.new_deal()?;
        let dropped = self.scheduler.discard_stale(deal_id);
        debug!(deal_id, dropped, "started new deal");
        self.schedule_turn();
        Ok(deal_id)
    }

    pub fn play_human(&mut self, card: Card) -> Result<PlayOutcome, PlayError> {
        let outcome = self.engine.play_card(Seat::HUMAN, card)?;
        self.after_play(outcome);
        Ok(outcome)
    }

    /// Moves the clock forward and runs every task that came due, in order.
    ///
    /// A failing task stops the run; the events it had already produced are logged and
    /// tasks still due stay queued for the next call.
    pub fn advance(&mut self, elapsed: Duration) -> Result<Vec<TableEvent>, TableError> {
        self.scheduler.advance(elapsed);
        let mut events = Vec::new();
        while let Some(scheduled) = self.scheduler.pop_due() {
            let task = scheduled.task;
            if let Err(err) = self.fire(scheduled, &mut events) {
                warn!(
                    ?task,
                    error = %err,
                    ?events,
                    remaining = self.scheduler.len(),
                    "scheduled task failed"
                );
                return Err(err);
            }
        }
        Ok(events)
    }

    /// Runs scheduled work until nothing is left. Stops early when the human must act.
    pub fn run_until_idle(&mut self) -> Result<Vec<TableEvent>, TableError> {
        let mut events = Vec::new();
        while let Some(wait) = self.scheduler.until_next() {
            events.extend(self.advance(wait)?);
        }
        Ok(events)
    }

    fn after_play(&mut self, outcome: PlayOutcome) {
        match outcome {
            PlayOutcome::TrickFull(_) => {
                self.scheduler.schedule(
                    self.pacing.trick_delay(),
                    self.engine.deal_id(),
                    TableTask::ResolveTrick,
                );
            }
            PlayOutcome::Played { .. } => self.schedule_turn(),
        }
    }

    fn schedule_turn(&mut self) {
        if self.engine.phase() != GamePhase::Playing || self.engine.awaiting_resolution() {
            return;
        }
        let seat = self.engine.turn();
        if self.is_automated(seat) {
            self.scheduler.schedule(
                self.pacing.bot_delay(),
                self.engine.deal_id(),
                TableTask::AutoPlay(seat),
            );
        }
    }

    fn fire(
        &mut self,
        scheduled: Scheduled<TableTask>,
        events: &mut Vec<TableEvent>,
    ) -> Result<(), TableError> {
        if scheduled.deal_id != self.engine.deal_id() {
            debug!(
                task = ?scheduled.task,
                task_deal = scheduled.deal_id,
                current_deal = self.engine.deal_id(),
                "ignoring task from an abandoned deal"
            );
            return Ok(());
        }

        match scheduled.task {
            TableTask::ResolveTrick => {
                let resolution = self.engine.resolve_trick()?;
                events.push(TableEvent::TrickResolved {
                    winner: resolution.outcome.winner,
                    points: resolution.outcome.points,
                });
                if resolution.game_over {
                    events.push(TableEvent::GameOver {
                        scores: *self.engine.scores().standings(),
                    });
                } else {
                    self.schedule_turn();
                }
            }
            TableTask::AutoPlay(seat) => {
                if self.engine.phase() != GamePhase::Playing
                    || self.engine.awaiting_resolution()
                    || self.engine.turn() != seat
                {
                    debug!(seat = %seat, "automated move no longer expected");
                    return Ok(());
                }
                let view = self.engine.view(seat);
                let Some(policy) = self.policies[seat.index()].as_mut() else {
                    return Ok(());
                };
                let card = policy
                    .choose_play(&PolicyContext::from_view(&view))
                    .ok_or(TableError::NoMove { seat })?;
                let outcome = self.engine.play_card(seat, card)?;
                events.push(TableEvent::CardPlayed { seat, card });
                self.after_play(outcome);
            }
        }
        Ok(())
    }
}
