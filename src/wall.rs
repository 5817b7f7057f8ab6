use std::f32::consts::TAU;

use crate::constants::*;

/// What the hint line under the sliding wall is currently saying.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Hint {
    /// Resting nudge while the wall is closed.
    SlideMe,
    /// Pulse shown when the locked button is clicked.
    LookLeft,
    /// The wall is open, the secret is out.
    Secret,
    Playing,
    /// Playback was denied; invites a second click.
    AllowAudio,
}

impl Hint {
    pub fn label(self) -> &'static str {
        match self {
            Self::SlideMe => "slide me",
            Self::LookLeft => "<= slide",
            Self::Secret => "a little secret",
            Self::Playing => "music playing...",
            Self::AllowAudio => "click again to allow audio",
        }
    }
}

/// Drag-to-reveal cover over the music button.
///
/// Offset is clamped to `[-WALL_TRAVEL, 0]` while dragging and snaps to
/// exactly `0` or `-WALL_TRAVEL` on release. `revealed` latches when the
/// drag distance passes `REVEAL_THRESHOLD` and un-latches if the pointer
/// comes back under it mid-drag. The same coordinate math serves mouse and
/// first-touch input.
pub struct SlidingWall {
    dragging: bool,
    start_x: f32,
    current_x: f32,
    snapped: f32,
    revealed: bool,
    hint: Hint,
    hint_visible: bool,
    hint_pulse: Option<f32>,
    shake_left: f32,
}

impl SlidingWall {
    pub fn new() -> Self {
        Self {
            dragging: false,
            start_x: 0.0,
            current_x: 0.0,
            snapped: 0.0,
            revealed: false,
            hint: Hint::SlideMe,
            hint_visible: false,
            hint_pulse: None,
            shake_left: 0.0,
        }
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Horizontal offset of the cover in pixels (0 closed, -WALL_TRAVEL open).
    pub fn offset(&self) -> f32 {
        if self.dragging {
            self.current_x
        } else {
            self.snapped
        }
    }

    pub fn hint(&self) -> Hint {
        self.hint
    }

    pub fn hint_visible(&self) -> bool {
        self.hint_visible
    }

    pub fn begin_drag(&mut self, pointer_x: f32) {
        self.dragging = true;
        self.start_x = pointer_x;
        self.current_x = 0.0;
    }

    pub fn drag_to(&mut self, pointer_x: f32) {
        if !self.dragging {
            return;
        }
        // Leftward only, hard stop at full travel
        self.current_x = (pointer_x - self.start_x).clamp(-WALL_TRAVEL, 0.0);

        if self.current_x.abs() >= REVEAL_THRESHOLD && !self.revealed {
            self.revealed = true;
            self.hint = Hint::Secret;
            self.hint_visible = true;
            self.hint_pulse = None;
        } else if self.current_x.abs() < REVEAL_THRESHOLD && self.revealed {
            self.revealed = false;
            self.hint = Hint::SlideMe;
            self.hint_visible = false;
        }
    }

    /// Exits the drag and snaps fully open or fully closed.
    pub fn end_drag(&mut self) {
        if !self.dragging {
            return;
        }
        self.dragging = false;
        self.snapped = if self.revealed { -WALL_TRAVEL } else { 0.0 };
    }

    /// Locked-click feedback: a short shake of the cover plus a transient
    /// hint pulse. Leaves `revealed` untouched.
    pub fn nudge_locked(&mut self) {
        self.shake_left = SHAKE_DURATION;
        self.hint = Hint::LookLeft;
        self.hint_visible = true;
        self.hint_pulse = Some(HINT_REVERT_DELAY);
    }

    /// Transient hint driven by the music control (denied playback).
    pub fn pulse_hint(&mut self, hint: Hint) {
        self.hint = hint;
        self.hint_visible = true;
        self.hint_pulse = Some(HINT_REVERT_DELAY);
    }

    /// Steady hint driven by the music control (playing / paused).
    pub fn set_hint(&mut self, hint: Hint) {
        self.hint = hint;
        self.hint_visible = true;
        self.hint_pulse = None;
    }

    pub fn update(&mut self, dt: f32) {
        if self.shake_left > 0.0 {
            self.shake_left = (self.shake_left - dt).max(0.0);
        }
        if let Some(left) = self.hint_pulse {
            let left = left - dt;
            if left <= 0.0 {
                self.hint_pulse = None;
                if self.revealed {
                    self.hint = Hint::Secret;
                } else {
                    self.hint = Hint::SlideMe;
                    self.hint_visible = false;
                }
            } else {
                self.hint_pulse = Some(left);
            }
        }
    }

    /// Damped oscillation added to the draw offset while shaking.
    pub fn shake_offset(&self) -> f32 {
        if self.shake_left <= 0.0 {
            return 0.0;
        }
        let phase = 1.0 - self.shake_left / SHAKE_DURATION;
        (phase * TAU * 2.0).sin() * SHAKE_AMPLITUDE * (self.shake_left / SHAKE_DURATION)
    }

    /// Back to fully covered and locked; clears any in-flight shake or
    /// hint pulse. Used by the replay path.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dragged(distance: f32) -> SlidingWall {
        let mut wall = SlidingWall::new();
        wall.begin_drag(200.0);
        wall.drag_to(200.0 + distance);
        wall
    }

    #[test]
    fn starts_closed_and_locked() {
        let wall = SlidingWall::new();
        assert!(!wall.is_revealed());
        assert_eq!(wall.offset(), 0.0);
        assert!(!wall.hint_visible());
    }

    #[test]
    fn offset_is_clamped_both_ways() {
        assert_eq!(dragged(50.0).offset(), 0.0, "rightward drag pins at 0");
        assert_eq!(dragged(-500.0).offset(), -WALL_TRAVEL);
    }

    #[test]
    fn reveal_latches_exactly_at_threshold() {
        assert!(!dragged(-(REVEAL_THRESHOLD - 1.0)).is_revealed());
        assert!(dragged(-REVEAL_THRESHOLD).is_revealed());
    }

    #[test]
    fn reveal_unlatches_when_dragged_back() {
        let mut wall = dragged(-80.0);
        assert!(wall.is_revealed());
        assert_eq!(wall.hint(), Hint::Secret);
        wall.drag_to(200.0 - 20.0);
        assert!(!wall.is_revealed());
        assert!(!wall.hint_visible());
    }

    #[test]
    fn release_snaps_to_extremes_only() {
        let mut wall = dragged(-70.0);
        wall.end_drag();
        assert_eq!(wall.offset(), -WALL_TRAVEL);
        assert!(wall.is_revealed());

        let mut wall = dragged(-30.0);
        wall.end_drag();
        assert_eq!(wall.offset(), 0.0);
        assert!(!wall.is_revealed());
    }

    #[test]
    fn new_drag_measures_from_its_own_origin() {
        let mut wall = dragged(-70.0);
        wall.end_drag();
        // Second drag starts over; a tiny move does not stay revealed
        wall.begin_drag(500.0);
        wall.drag_to(499.0);
        assert!(!wall.is_revealed());
    }

    #[test]
    fn nudge_shakes_without_unlocking() {
        let mut wall = SlidingWall::new();
        wall.nudge_locked();
        assert!(!wall.is_revealed());
        assert!(wall.hint_visible());
        assert_eq!(wall.hint(), Hint::LookLeft);
        wall.update(SHAKE_DURATION * 0.5);
        assert!(wall.shake_offset().abs() <= SHAKE_AMPLITUDE);

        // Pulse self-reverts after the fixed delay
        wall.update(HINT_REVERT_DELAY);
        assert!(!wall.hint_visible());
        assert_eq!(wall.hint(), Hint::SlideMe);
        assert_eq!(wall.shake_offset(), 0.0);
    }

    #[test]
    fn pulse_reverts_to_secret_when_revealed() {
        let mut wall = dragged(-80.0);
        wall.end_drag();
        wall.pulse_hint(Hint::AllowAudio);
        wall.update(HINT_REVERT_DELAY + 0.01);
        assert_eq!(wall.hint(), Hint::Secret);
        assert!(wall.hint_visible());
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut wall = dragged(-80.0);
        wall.end_drag();
        wall.nudge_locked();
        wall.reset();
        assert!(!wall.is_revealed());
        assert_eq!(wall.offset(), 0.0);
        assert_eq!(wall.shake_offset(), 0.0);
        assert!(!wall.hint_visible());
    }
}
