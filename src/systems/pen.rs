//! Ghost-pen release scheduling.
//!
//! Waiting ghosts form a queue ordered by ghost id. Releases are driven
//! by pellet counting under one of two policies: the per-ghost policy
//! (level start) credits each pellet to the queue head's own counter and
//! releases it at its level-specific limit; the global policy (after a
//! life is lost) counts pellets in one shared counter with fixed
//! per-ghost milestones, reverting to per-ghost once Clyde leaves. A
//! force timer releases the head whenever the player starves the
//! counters for too long.

use bevy_ecs::event::EventReader;
use bevy_ecs::prelude::{Query, Res, ResMut};
use bevy_ecs::resource::Resource;
use smallvec::SmallVec;
use tracing::debug;

use crate::constants::GLOBAL_PEN_MILESTONES;
use crate::events::GameEvent;
use crate::level::{level_params, LevelParams};
use crate::systems::components::{CurrentLevel, DeltaTime, GhostKind, PenPhase};

/// Which pellet-counting regime the pen is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenPolicy {
    /// Each queue head accrues pellets on its own counter.
    PerGhost,
    /// One shared counter with fixed milestones, used after a life loss.
    Global,
}

/// Schedules releases from the ghost pen.
#[derive(Resource, Debug)]
pub struct PenController {
    queue: SmallVec<[GhostKind; 4]>,
    policy: PenPolicy,
    dot_counters: [u32; 4],
    global_counter: u32,
    force_timer: f32,
}

impl PenController {
    pub fn new(policy: PenPolicy) -> Self {
        PenController {
            queue: SmallVec::new(),
            policy,
            dot_counters: [0; 4],
            global_counter: 0,
            force_timer: 0.0,
        }
    }

    pub fn policy(&self) -> PenPolicy {
        self.policy
    }

    pub fn head(&self) -> Option<GhostKind> {
        self.queue.first().copied()
    }

    pub fn contains(&self, kind: GhostKind) -> bool {
        self.queue.contains(&kind)
    }

    /// Adds a ghost to the queue, keeping it sorted by id so the pen
    /// always empties in Pinky, Inky, Clyde order regardless of arrival
    /// order.
    pub fn enqueue(&mut self, kind: GhostKind) {
        debug_assert!(kind != GhostKind::Blinky, "Blinky never waits in the pen");
        debug_assert!(!self.queue.contains(&kind));
        let at = self.queue.partition_point(|g| g.id() < kind.id());
        self.queue.insert(at, kind);
    }

    fn release_head(&mut self) -> Option<GhostKind> {
        if self.queue.is_empty() {
            return None;
        }
        let ghost = self.queue.remove(0);
        debug!(?ghost, "pen release");
        Some(ghost)
    }

    /// Credits one eaten pellet to the active counter and resets the
    /// starvation timer.
    pub fn note_pellet(&mut self) {
        self.force_timer = 0.0;
        match self.policy {
            PenPolicy::Global => self.global_counter += 1,
            PenPolicy::PerGhost => {
                if let Some(head) = self.queue.first() {
                    self.dot_counters[head.id()] += 1;
                }
            }
        }
    }

    /// Advances the starvation timer, force-releasing the head when the
    /// player has gone too long without a pellet.
    pub fn tick_force(&mut self, dt: f32, params: &LevelParams) -> Option<GhostKind> {
        if self.queue.is_empty() {
            self.force_timer = 0.0;
            return None;
        }
        self.force_timer += dt;
        if self.force_timer >= params.pen_force_seconds {
            self.force_timer = 0.0;
            return self.release_head();
        }
        None
    }

    /// Releases the head if its counter condition is satisfied. Called
    /// every tick so zero-limit ghosts leave without waiting for a
    /// pellet.
    pub fn due_release(&mut self, params: &LevelParams) -> Option<GhostKind> {
        let head = *self.queue.first()?;
        // Clyde's milestone retires the shared counter without freeing
        // him: he goes back to waiting on his own per-ghost counter
        // (or the force timer).
        if self.policy == PenPolicy::Global
            && head == GhostKind::Clyde
            && self.global_counter >= GLOBAL_PEN_MILESTONES[head.id()]
        {
            self.policy = PenPolicy::PerGhost;
            self.global_counter = 0;
        }
        let due = match self.policy {
            PenPolicy::PerGhost => {
                self.dot_counters[head.id()] >= params.pen_dot_limits[head.id()]
            }
            PenPolicy::Global => self.global_counter >= GLOBAL_PEN_MILESTONES[head.id()],
        };
        due.then(|| self.release_head()).flatten()
    }
}

/// Counts pellets, runs the release conditions, and starts the scripted
/// exit for every ghost released this tick.
pub fn pen_system(
    dt: Res<DeltaTime>,
    level: Res<CurrentLevel>,
    mut pen: ResMut<PenController>,
    mut events: EventReader<GameEvent>,
    mut ghosts: Query<(&GhostKind, &mut PenPhase)>,
) {
    let params = level_params(level.0);
    for event in events.read() {
        if matches!(
            event,
            GameEvent::PelletEaten { .. } | GameEvent::PowerPelletEaten { .. }
        ) {
            pen.note_pellet();
        }
    }

    let mut released: SmallVec<[GhostKind; 2]> = SmallVec::new();
    released.extend(pen.tick_force(dt.seconds, params));
    while let Some(kind) = pen.due_release(params) {
        released.push(kind);
    }

    for kind in released {
        for (ghost, mut phase) in ghosts.iter_mut() {
            if *ghost == kind {
                debug_assert!(*phase == PenPhase::Waiting);
                *phase = PenPhase::Exiting { step: 1 };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn level_one_pen() -> PenController {
        let mut pen = PenController::new(PenPolicy::PerGhost);
        pen.enqueue(GhostKind::Pinky);
        pen.enqueue(GhostKind::Inky);
        pen.enqueue(GhostKind::Clyde);
        pen
    }

    #[test]
    fn test_enqueue_sorts_by_id() {
        let mut pen = PenController::new(PenPolicy::PerGhost);
        pen.enqueue(GhostKind::Clyde);
        pen.enqueue(GhostKind::Pinky);
        pen.enqueue(GhostKind::Inky);
        assert_eq!(pen.head(), Some(GhostKind::Pinky));
    }

    #[test]
    fn test_zero_limit_head_releases_without_pellets() {
        let mut pen = level_one_pen();
        let params = level_params(1);
        assert_eq!(pen.due_release(params), Some(GhostKind::Pinky));
    }

    #[test]
    fn test_per_ghost_release_on_exact_limit() {
        let mut pen = level_one_pen();
        let params = level_params(1);
        // Pinky's limit is zero; clear it so Inky is head.
        assert_eq!(pen.due_release(params), Some(GhostKind::Pinky));

        // Inky's level-one limit is 30: pellets 1..=29 must not free it.
        for _ in 0..29 {
            pen.note_pellet();
            assert_eq!(pen.due_release(params), None);
        }
        pen.note_pellet();
        assert_eq!(pen.due_release(params), Some(GhostKind::Inky));
        assert_eq!(pen.head(), Some(GhostKind::Clyde));
    }

    #[test]
    fn test_pellets_only_credit_the_head() {
        let mut pen = level_one_pen();
        let params = level_params(1);
        pen.due_release(params);

        // All 30 pellets go to Inky; Clyde's counter stays at zero and
        // its 60-pellet wait starts only once it becomes head.
        for _ in 0..30 {
            pen.note_pellet();
        }
        assert_eq!(pen.due_release(params), Some(GhostKind::Inky));
        for _ in 0..59 {
            pen.note_pellet();
            assert_eq!(pen.due_release(params), None);
        }
        pen.note_pellet();
        assert_eq!(pen.due_release(params), Some(GhostKind::Clyde));
    }

    #[test]
    fn test_force_timer_releases_head() {
        let mut pen = level_one_pen();
        let params = level_params(1);
        pen.due_release(params);

        assert_eq!(pen.tick_force(3.9, params), None);
        assert_eq!(pen.tick_force(0.2, params), Some(GhostKind::Inky));
        // Timer restarts for the next head.
        assert_eq!(pen.tick_force(3.9, params), None);
        assert_eq!(pen.tick_force(0.2, params), Some(GhostKind::Clyde));
    }

    #[test]
    fn test_pellet_resets_force_timer() {
        let mut pen = level_one_pen();
        let params = level_params(1);
        pen.due_release(params);

        assert_eq!(pen.tick_force(3.9, params), None);
        pen.note_pellet();
        assert_eq!(pen.tick_force(3.9, params), None);
    }

    #[test]
    fn test_global_policy_milestones() {
        let mut pen = PenController::new(PenPolicy::Global);
        pen.enqueue(GhostKind::Pinky);
        pen.enqueue(GhostKind::Inky);
        pen.enqueue(GhostKind::Clyde);
        let params = level_params(1);

        for _ in 0..6 {
            pen.note_pellet();
            assert_eq!(pen.due_release(params), None);
        }
        pen.note_pellet();
        assert_eq!(pen.due_release(params), Some(GhostKind::Pinky));

        for _ in 0..9 {
            pen.note_pellet();
            assert_eq!(pen.due_release(params), None);
        }
        pen.note_pellet();
        assert_eq!(pen.due_release(params), Some(GhostKind::Inky));

        // Clyde's milestone at 32 only retires the shared counter; it
        // never frees him directly.
        for _ in 0..15 {
            pen.note_pellet();
        }
        assert_eq!(pen.due_release(params), None);
        assert_eq!(pen.policy(), PenPolicy::PerGhost);
        assert_eq!(pen.head(), Some(GhostKind::Clyde));
    }

    #[test]
    fn test_clyde_waits_out_his_own_limit_after_milestone() {
        let mut pen = PenController::new(PenPolicy::Global);
        pen.enqueue(GhostKind::Pinky);
        pen.enqueue(GhostKind::Inky);
        pen.enqueue(GhostKind::Clyde);
        let params = level_params(1);

        // Feed 32 pellets, draining whatever comes due along the way.
        for _ in 0..32 {
            pen.note_pellet();
            while pen.due_release(params).is_some() {}
        }
        assert_eq!(pen.policy(), PenPolicy::PerGhost);
        assert_eq!(pen.head(), Some(GhostKind::Clyde));

        // From here his own level-one limit of 60 pellets applies.
        for _ in 0..59 {
            pen.note_pellet();
            assert_eq!(pen.due_release(params), None);
        }
        pen.note_pellet();
        assert_eq!(pen.due_release(params), Some(GhostKind::Clyde));
    }

    #[test]
    fn test_force_timer_still_frees_clyde_after_milestone() {
        let mut pen = PenController::new(PenPolicy::Global);
        pen.enqueue(GhostKind::Clyde);
        let params = level_params(1);

        for _ in 0..32 {
            pen.note_pellet();
        }
        assert_eq!(pen.due_release(params), None);
        assert_eq!(pen.policy(), PenPolicy::PerGhost);

        assert_eq!(pen.tick_force(4.0, params), Some(GhostKind::Clyde));
    }

    #[test]
    fn test_empty_pen_never_forces() {
        let mut pen = PenController::new(PenPolicy::PerGhost);
        let params = level_params(1);
        assert_eq!(pen.tick_force(100.0, params), None);
        assert_eq!(pen.due_release(params), None);
    }
}
