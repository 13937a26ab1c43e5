//! Per-level tuning parameters.
//!
//! One immutable row per level, reproducing the arcade dossier table:
//! speed ratings (percent of [`crate::constants::FULL_SPEED`]), Cruise
//! Elroy thresholds, fright timing, pen release limits, and the
//! scatter/chase phase durations. Levels past 21 reuse the final row.

/// Immutable tuning values for one level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelParams {
    /// Player speed rating while cruising.
    pub player_speed: f32,
    /// Player speed rating during the eat-slowdown window.
    pub player_eat_speed: f32,
    /// Player speed rating while fright is active.
    pub player_fright_speed: f32,
    /// Player speed rating while eating during fright.
    pub player_fright_eat_speed: f32,
    /// Ghost speed rating on normal floor.
    pub ghost_speed: f32,
    /// Ghost speed rating inside a tunnel slow zone.
    pub ghost_tunnel_speed: f32,
    /// Ghost speed rating while frightened.
    pub ghost_fright_speed: f32,
    /// Remaining-pellet threshold for Cruise Elroy stage one.
    pub elroy1_dots: u32,
    /// Blinky's speed rating at Elroy stage one.
    pub elroy1_speed: f32,
    /// Remaining-pellet threshold for Cruise Elroy stage two.
    pub elroy2_dots: u32,
    /// Blinky's speed rating at Elroy stage two.
    pub elroy2_speed: f32,
    /// Solid (non-blinking) fright duration, in seconds.
    pub fright_seconds: f32,
    /// Blink count at the end of fright; each blink is two toggles.
    pub fright_blinks: u32,
    /// Per-ghost pen dot limits, indexed by ghost id.
    pub pen_dot_limits: [u32; 4],
    /// Seconds without a pellet before the pen force-releases its head.
    pub pen_force_seconds: f32,
    /// Durations of the seven finite scatter/chase phases; the eighth
    /// phase is chase forever.
    pub switch_times: [f32; 7],
}

#[allow(clippy::too_many_arguments)]
const fn row(
    player: [f32; 4],
    ghost: [f32; 3],
    elroy: (u32, f32, u32, f32),
    fright: (f32, u32),
    pen_dot_limits: [u32; 4],
    pen_force_seconds: f32,
    switch_times: [f32; 7],
) -> LevelParams {
    LevelParams {
        player_speed: player[0],
        player_eat_speed: player[1],
        player_fright_speed: player[2],
        player_fright_eat_speed: player[3],
        ghost_speed: ghost[0],
        ghost_tunnel_speed: ghost[1],
        ghost_fright_speed: ghost[2],
        elroy1_dots: elroy.0,
        elroy1_speed: elroy.1,
        elroy2_dots: elroy.2,
        elroy2_speed: elroy.3,
        fright_seconds: fright.0,
        fright_blinks: fright.1,
        pen_dot_limits,
        pen_force_seconds,
        switch_times,
    }
}

const SWITCH_EARLY: [f32; 7] = [7.0, 20.0, 7.0, 20.0, 5.0, 20.0, 5.0];
const SWITCH_MID: [f32; 7] = [7.0, 20.0, 7.0, 20.0, 5.0, 1033.0, 1.0 / 60.0];
const SWITCH_LATE: [f32; 7] = [5.0, 20.0, 5.0, 20.0, 5.0, 1037.0, 1.0 / 60.0];

#[rustfmt::skip]
const LEVELS: [LevelParams; 21] = [
    row([0.80, 0.71, 0.90, 0.79], [0.75, 0.40, 0.50], (20, 0.80, 10, 0.85), (6.0, 5), [0, 0, 30, 60], 4.0, SWITCH_EARLY),
    row([0.90, 0.79, 0.95, 0.83], [0.85, 0.45, 0.55], (30, 0.90, 15, 0.95), (5.0, 5), [0, 0, 0, 50], 4.0, SWITCH_MID),
    row([0.90, 0.79, 0.95, 0.83], [0.85, 0.45, 0.55], (40, 0.90, 20, 0.95), (4.0, 5), [0, 0, 0, 0], 4.0, SWITCH_MID),
    row([0.90, 0.79, 0.95, 0.83], [0.85, 0.45, 0.55], (40, 0.90, 20, 0.95), (3.0, 5), [0, 0, 0, 0], 4.0, SWITCH_MID),
    row([1.00, 0.87, 1.00, 0.87], [0.95, 0.50, 0.60], (40, 1.00, 20, 1.05), (2.0, 5), [0, 0, 0, 0], 3.0, SWITCH_LATE),
    row([1.00, 0.87, 1.00, 0.87], [0.95, 0.50, 0.60], (50, 1.00, 25, 1.05), (5.0, 5), [0, 0, 0, 0], 3.0, SWITCH_LATE),
    row([1.00, 0.87, 1.00, 0.87], [0.95, 0.50, 0.60], (50, 1.00, 25, 1.05), (2.0, 5), [0, 0, 0, 0], 3.0, SWITCH_LATE),
    row([1.00, 0.87, 1.00, 0.87], [0.95, 0.50, 0.60], (50, 1.00, 25, 1.05), (2.0, 5), [0, 0, 0, 0], 3.0, SWITCH_LATE),
    row([1.00, 0.87, 1.00, 0.87], [0.95, 0.50, 0.60], (60, 1.00, 30, 1.05), (1.0, 3), [0, 0, 0, 0], 3.0, SWITCH_LATE),
    row([1.00, 0.87, 1.00, 0.87], [0.95, 0.50, 0.60], (60, 1.00, 30, 1.05), (5.0, 5), [0, 0, 0, 0], 3.0, SWITCH_LATE),
    row([1.00, 0.87, 1.00, 0.87], [0.95, 0.50, 0.60], (60, 1.00, 30, 1.05), (2.0, 5), [0, 0, 0, 0], 3.0, SWITCH_LATE),
    row([1.00, 0.87, 1.00, 0.87], [0.95, 0.50, 0.60], (80, 1.00, 40, 1.05), (1.0, 3), [0, 0, 0, 0], 3.0, SWITCH_LATE),
    row([1.00, 0.87, 1.00, 0.87], [0.95, 0.50, 0.60], (80, 1.00, 40, 1.05), (1.0, 3), [0, 0, 0, 0], 3.0, SWITCH_LATE),
    row([1.00, 0.87, 1.00, 0.87], [0.95, 0.50, 0.60], (80, 1.00, 40, 1.05), (3.0, 5), [0, 0, 0, 0], 3.0, SWITCH_LATE),
    row([1.00, 0.87, 1.00, 0.87], [0.95, 0.50, 0.60], (100, 1.00, 50, 1.05), (1.0, 3), [0, 0, 0, 0], 3.0, SWITCH_LATE),
    row([1.00, 0.87, 1.00, 0.87], [0.95, 0.50, 0.60], (100, 1.00, 50, 1.05), (1.0, 3), [0, 0, 0, 0], 3.0, SWITCH_LATE),
    row([1.00, 0.87, 1.00, 0.87], [0.95, 0.50, 0.60], (100, 1.00, 50, 1.05), (0.0, 0), [0, 0, 0, 0], 3.0, SWITCH_LATE),
    row([1.00, 0.87, 1.00, 0.87], [0.95, 0.50, 0.60], (100, 1.00, 50, 1.05), (1.0, 3), [0, 0, 0, 0], 3.0, SWITCH_LATE),
    row([1.00, 0.87, 1.00, 0.87], [0.95, 0.50, 0.60], (120, 1.00, 60, 1.05), (0.0, 0), [0, 0, 0, 0], 3.0, SWITCH_LATE),
    row([1.00, 0.87, 1.00, 0.87], [0.95, 0.50, 0.60], (120, 1.00, 60, 1.05), (0.0, 0), [0, 0, 0, 0], 3.0, SWITCH_LATE),
    row([0.90, 0.79, 0.90, 0.79], [0.95, 0.50, 0.60], (120, 1.00, 60, 1.05), (0.0, 0), [0, 0, 0, 0], 3.0, SWITCH_LATE),
];

/// Looks up the parameter row for a level. Levels are 1-based; levels
/// past 21 clamp to the final row.
pub fn level_params(level: u32) -> &'static LevelParams {
    assert!(level >= 1, "levels are 1-based");
    let index = (level.min(21) - 1) as usize;
    &LEVELS[index]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_level_one() {
        let params = level_params(1);
        assert_eq!(params.ghost_speed, 0.75);
        assert_eq!(params.fright_seconds, 6.0);
        assert_eq!(params.fright_blinks, 5);
        assert_eq!(params.pen_dot_limits, [0, 0, 30, 60]);
        assert_eq!(params.switch_times, [7.0, 20.0, 7.0, 20.0, 5.0, 20.0, 5.0]);
    }

    #[test]
    fn test_level_clamping() {
        assert_eq!(level_params(21), level_params(99));
        assert_ne!(level_params(20), level_params(21));
    }

    #[test]
    fn test_elroy_thresholds_monotonic() {
        for level in 1..=20 {
            let a = level_params(level);
            let b = level_params(level + 1);
            assert!(b.elroy1_dots >= a.elroy1_dots);
            assert_eq!(a.elroy2_dots, a.elroy1_dots / 2);
        }
    }

    #[test]
    fn test_zero_fright_levels_have_no_blinks() {
        for level in 1..=21 {
            let params = level_params(level);
            if params.fright_seconds == 0.0 {
                assert_eq!(params.fright_blinks, 0);
            }
        }
    }

    #[test]
    #[should_panic(expected = "1-based")]
    fn test_level_zero_panics() {
        level_params(0);
    }
}
