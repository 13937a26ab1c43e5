//! The global scatter/chase clock and the fright overlay.
//!
//! Free ghosts mirror a shared schedule of timed scatter/chase phases.
//! Eating a power pellet overlays fright on top of that schedule: the
//! phase clock pauses, ghosts turn blue, and near the end they blink a
//! level-dependent number of times before reverting. Reverting to the
//! schedule at fright's end deliberately does NOT reverse the ghosts;
//! only phase flips and fright's start broadcast a reversal.

use bevy_ecs::event::EventReader;
use bevy_ecs::prelude::{Query, Res, ResMut};
use bevy_ecs::resource::Resource;
use smallvec::SmallVec;
use tracing::debug;

use crate::constants::FRIGHT_BLINK_INTERVAL;
use crate::events::GameEvent;
use crate::level::{level_params, LevelParams};
use crate::systems::components::{CurrentLevel, DeltaTime, GhostMode, GhostNav, PenPhase};

/// Fright overlay bookkeeping. Present only while fright is active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrightState {
    /// Seconds left in the solid (non-blinking) portion.
    pub remaining: f32,
    /// State flips left in the blink portion. Always starts even, so the
    /// overlay ends in the non-blinking state.
    pub toggles_left: u32,
    /// Seconds until the next blink flip.
    pub toggle_timer: f32,
    pub blinking: bool,
    /// Captures within this fright, for capture scoring.
    pub combo: u32,
}

/// A mode change to broadcast to the ghost entities this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeTransition {
    /// The schedule advanced a phase; free ghosts adopt `0` and reverse.
    Wave(GhostMode),
    /// Fright began; non-eyes ghosts turn frightened, free ones reverse.
    FrightStarted,
    /// The blink state flipped for every frightened ghost.
    BlinkChanged(bool),
    /// Fright expired; frightened ghosts rejoin the schedule (carried in
    /// `0`) without reversing.
    FrightEnded(GhostMode),
    /// A zero-duration fright level: broadcast the reversal and nothing
    /// else.
    ReverseOnly,
}

pub type Transitions = SmallVec<[ModeTransition; 2]>;

/// Drives the phase schedule and the fright overlay.
#[derive(Resource, Debug)]
pub struct ModeController {
    /// Index into the eight-phase schedule. Phases alternate starting at
    /// scatter; the eighth phase is chase forever.
    phase: usize,
    phase_elapsed: f32,
    fright: Option<FrightState>,
}

impl Default for ModeController {
    fn default() -> Self {
        ModeController {
            phase: 0,
            phase_elapsed: 0.0,
            fright: None,
        }
    }
}

impl ModeController {
    /// The schedule's current mode, ignoring any fright overlay.
    pub fn global_mode(&self) -> GhostMode {
        if self.phase % 2 == 0 {
            GhostMode::Scatter
        } else {
            GhostMode::Chase
        }
    }

    pub fn phase(&self) -> usize {
        self.phase
    }

    pub fn fright(&self) -> Option<&FrightState> {
        self.fright.as_ref()
    }

    pub fn is_fright_active(&self) -> bool {
        self.fright.is_some()
    }

    /// Claims the next capture combo slot during fright. Returns the
    /// zero-based combo index, or `None` outside fright.
    pub fn claim_combo(&mut self) -> Option<u32> {
        let fright = self.fright.as_mut()?;
        let combo = fright.combo;
        fright.combo += 1;
        Some(combo)
    }

    /// Starts (or restarts) the fright overlay for a power pellet.
    pub fn trigger_fright(&mut self, params: &LevelParams) -> Transitions {
        let mut out = Transitions::new();
        if params.fright_seconds <= 0.0 {
            debug!("fright duration is zero; broadcasting reversal only");
            out.push(ModeTransition::ReverseOnly);
            return out;
        }
        // A pellet while the blink countdown is mid-cycle ends the
        // overlay on the spot instead of restarting it (arcade quirk).
        if let Some(fright) = &self.fright {
            if fright.remaining <= 0.0 {
                let global = self.global_mode();
                self.fright = None;
                debug!("fright re-triggered mid-blink; ending overlay");
                out.push(ModeTransition::FrightEnded(global));
                return out;
            }
        }
        // During the solid window a pellet restarts the full window and
        // resets the capture combo.
        self.fright = Some(FrightState {
            remaining: params.fright_seconds,
            toggles_left: params.fright_blinks * 2,
            toggle_timer: FRIGHT_BLINK_INTERVAL,
            blinking: false,
            combo: 0,
        });
        debug!(seconds = params.fright_seconds, "fright started");
        out.push(ModeTransition::FrightStarted);
        out
    }

    /// Advances the controller by one tick. The phase clock runs only
    /// while no fright overlay is active.
    pub fn tick(&mut self, dt: f32, params: &LevelParams) -> Transitions {
        let mut out = Transitions::new();
        let global = self.global_mode();

        if let Some(fright) = self.fright.as_mut() {
            if fright.remaining > 0.0 {
                fright.remaining -= dt;
                if fright.remaining <= 0.0 {
                    if fright.toggles_left == 0 {
                        self.fright = None;
                        out.push(ModeTransition::FrightEnded(global));
                    } else {
                        // Carry the overshoot into the first blink.
                        fright.toggle_timer = FRIGHT_BLINK_INTERVAL + fright.remaining;
                        fright.remaining = 0.0;
                    }
                }
                return out;
            }

            fright.toggle_timer -= dt;
            let mut ended = false;
            while fright.toggle_timer <= 0.0 {
                fright.blinking = !fright.blinking;
                fright.toggles_left -= 1;
                out.push(ModeTransition::BlinkChanged(fright.blinking));
                if fright.toggles_left == 0 {
                    debug_assert!(!fright.blinking);
                    ended = true;
                    break;
                }
                fright.toggle_timer += FRIGHT_BLINK_INTERVAL;
            }
            if ended {
                self.fright = None;
                out.push(ModeTransition::FrightEnded(global));
            }
            return out;
        }

        // Final phase never ends.
        if self.phase >= params.switch_times.len() {
            return out;
        }
        self.phase_elapsed += dt;
        while self.phase < params.switch_times.len()
            && self.phase_elapsed >= params.switch_times[self.phase]
        {
            self.phase_elapsed -= params.switch_times[self.phase];
            self.phase += 1;
            debug!(phase = self.phase, mode = ?self.global_mode(), "phase flip");
            out.push(ModeTransition::Wave(self.global_mode()));
        }
        out
    }
}

/// Runs the controller and broadcasts its transitions to every ghost.
pub fn mode_system(
    dt: Res<DeltaTime>,
    level: Res<CurrentLevel>,
    mut controller: ResMut<ModeController>,
    mut events: EventReader<GameEvent>,
    mut ghosts: Query<(&mut GhostMode, &mut GhostNav, &PenPhase)>,
) {
    let params = level_params(level.0);
    let mut transitions = controller.tick(dt.seconds, params);
    for event in events.read() {
        if matches!(event, GameEvent::PowerPelletEaten { .. }) {
            transitions.extend(controller.trigger_fright(params));
        }
    }

    for transition in transitions {
        for (mut mode, mut nav, phase) in ghosts.iter_mut() {
            apply_transition(transition, &mut mode, &mut nav, *phase);
        }
    }
}

/// Applies one broadcast transition to one ghost. Eyes are exempt from
/// every broadcast; they keep homing until the pen restores them.
fn apply_transition(
    transition: ModeTransition,
    mode: &mut GhostMode,
    nav: &mut GhostNav,
    phase: PenPhase,
) {
    if *mode == GhostMode::Eyes {
        return;
    }
    let free = phase == PenPhase::Free;
    match transition {
        ModeTransition::Wave(global) => {
            if !mode.is_frightened() {
                *mode = global;
                if free {
                    nav.reverse_pending = true;
                }
            }
        }
        ModeTransition::FrightStarted => {
            *mode = GhostMode::Frightened { blinking: false };
            if free {
                nav.reverse_pending = true;
            }
        }
        ModeTransition::BlinkChanged(blinking) => {
            if mode.is_frightened() {
                *mode = GhostMode::Frightened { blinking };
            }
        }
        ModeTransition::FrightEnded(global) => {
            if mode.is_frightened() {
                // Deliberately no reversal here.
                *mode = global;
            }
        }
        ModeTransition::ReverseOnly => {
            if free {
                nav.reverse_pending = true;
            }
        }
    }
}
