use raylib::prelude::*;
use tracing::info;

use crate::constants::*;
use crate::interval::Interval;
use crate::scene::Props;

/// Rotation core of the photo gallery: a current index, one `active` flag
/// per slide, and the auto-advance timer. `timer` is `Some` iff rotation is
/// scheduled; `restart_delay` is `Some` only during the pause a `reset`
/// inserts before rotation resumes.
pub struct Rotator {
    current: usize,
    active: Vec<bool>,
    timer: Option<Interval>,
    restart_delay: Option<f32>,
}

impl Rotator {
    /// `None` when there is nothing to rotate; callers treat the gallery as
    /// an absent collaborator in that case.
    pub fn new(count: usize) -> Option<Self> {
        if count == 0 {
            return None;
        }
        let mut active = vec![false; count];
        active[0] = true;
        let mut rotator = Self {
            current: 0,
            active,
            timer: None,
            restart_delay: None,
        };
        rotator.start();
        Some(rotator)
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn is_active(&self, i: usize) -> bool {
        self.active.get(i).copied().unwrap_or(false)
    }

    /// Deactivates the current slide and activates the next, wrapping.
    pub fn advance(&mut self) {
        self.active[self.current] = false;
        self.current = (self.current + 1) % self.active.len();
        self.active[self.current] = true;
    }

    pub fn start(&mut self) {
        if self.timer.is_some() {
            return;
        }
        self.timer = Some(Interval::new(SLIDE_INTERVAL));
    }

    pub fn stop(&mut self) {
        self.timer = None;
        self.restart_delay = None;
    }

    /// Back to slide 0, timer stopped, rotation resuming only after the
    /// fixed pause so a viewer notices the reset.
    pub fn reset(&mut self) {
        self.stop();
        self.active.fill(false);
        self.current = 0;
        self.active[0] = true;
        self.restart_delay = Some(GALLERY_RESTART_DELAY);
    }

    /// Advances timers by `dt` and returns how many slides were stepped.
    pub fn update(&mut self, dt: f32) -> u32 {
        if let Some(left) = self.restart_delay {
            let left = left - dt;
            if left <= 0.0 {
                self.restart_delay = None;
                self.start();
            } else {
                self.restart_delay = Some(left);
            }
            // The delay frame never also advances; the fresh interval
            // starts counting next frame.
            return 0;
        }
        let Some(timer) = self.timer.as_mut() else {
            return 0;
        };
        let steps = timer.tick(dt);
        for _ in 0..steps {
            self.advance();
        }
        steps
    }
}

/// The on-screen gallery: the rotator plus its photo textures and a short
/// crossfade between the outgoing and incoming slide.
pub struct Gallery {
    rotator: Rotator,
    photos: Vec<Texture2D>,
    previous: Option<usize>,
    fade: f32,
}

impl Gallery {
    pub fn new(photos: Vec<Texture2D>) -> Option<Self> {
        let rotator = Rotator::new(photos.len())?;
        info!(photos = photos.len(), "gallery ready");
        Some(Self {
            rotator,
            photos,
            previous: None,
            fade: 1.0,
        })
    }

    pub fn reset(&mut self) {
        self.rotator.reset();
        self.previous = None;
        self.fade = 1.0;
    }

    pub fn update(&mut self, dt: f32) {
        let before = self.rotator.current();
        if self.rotator.update(dt) > 0 {
            self.previous = Some(before);
            self.fade = 0.0;
        }
        if self.fade < 1.0 {
            self.fade = (self.fade + dt / GALLERY_FADE_DURATION).min(1.0);
        } else {
            self.previous = None;
        }
    }

    /// Draws the active photo (and the fading previous one) inside `frame`,
    /// modulated by the section props the storyboard sampled.
    pub fn draw(&self, d: &mut RaylibDrawHandle, frame: Rectangle, props: &Props) {
        if props.opacity <= 0.0 {
            return;
        }
        let frame = Rectangle::new(frame.x + props.x, frame.y + props.y, frame.width, frame.height);
        if let Some(prev) = self.previous {
            self.draw_photo(d, prev, frame, props.opacity * (1.0 - self.fade));
        }
        self.draw_photo(d, self.rotator.current(), frame, props.opacity * self.fade);
    }

    fn draw_photo(&self, d: &mut RaylibDrawHandle, index: usize, frame: Rectangle, alpha: f32) {
        let Some(photo) = self.photos.get(index) else {
            return;
        };
        let (tw, th) = (photo.width() as f32, photo.height() as f32);
        // Fit inside the frame, preserving aspect
        let scale = (frame.width / tw).min(frame.height / th);
        let (w, h) = (tw * scale, th * scale);
        let dest = Rectangle::new(
            frame.x + (frame.width - w) * 0.5,
            frame.y + (frame.height - h) * 0.5,
            w,
            h,
        );
        let tint = Color::new(255, 255, 255, (alpha.clamp(0.0, 1.0) * 255.0) as u8);
        d.draw_texture_pro(
            photo,
            Rectangle::new(0.0, 0.0, tw, th),
            dest,
            Vector2::zero(),
            0.0,
            tint,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_count(r: &Rotator, n: usize) -> usize {
        (0..n).filter(|&i| r.is_active(i)).count()
    }

    #[test]
    fn empty_rotator_is_absent() {
        assert!(Rotator::new(0).is_none());
    }

    #[test]
    fn starts_on_slide_zero_running() {
        let r = Rotator::new(4).unwrap();
        assert_eq!(r.current(), 0);
        assert!(r.is_active(0));
        assert!(r.is_running());
        assert_eq!(active_count(&r, 4), 1);
    }

    #[test]
    fn advance_wraps_and_keeps_one_active() {
        for n in 1..=5 {
            let mut r = Rotator::new(n).unwrap();
            for step in 0..n * 2 {
                let initial = r.current();
                assert_eq!(active_count(&r, n), 1, "before advance {step}");
                r.advance();
                assert_eq!(r.current(), (initial + 1) % n);
                assert_eq!(active_count(&r, n), 1, "after advance {step}");
            }
        }
    }

    #[test]
    fn timer_advances_once_per_interval() {
        let mut r = Rotator::new(3).unwrap();
        let mut advanced = 0;
        for _ in 0..60 {
            advanced += r.update(SLIDE_INTERVAL / 10.0);
        }
        // Six intervals worth of dt
        assert_eq!(advanced, 6);
        assert_eq!(r.current(), 0); // 6 % 3
    }

    #[test]
    fn double_start_does_not_double_cadence() {
        let mut r = Rotator::new(3).unwrap();
        r.update(SLIDE_INTERVAL * 0.5);
        r.start(); // no-op, must not reset or duplicate the interval
        let advanced = r.update(SLIDE_INTERVAL * 0.5);
        assert_eq!(advanced, 1);
        assert_eq!(r.current(), 1);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut r = Rotator::new(3).unwrap();
        r.stop();
        r.stop();
        assert!(!r.is_running());
        assert_eq!(r.update(SLIDE_INTERVAL * 4.0), 0);
        assert_eq!(r.current(), 0);
    }

    #[test]
    fn reset_restores_slide_zero_and_pauses() {
        let mut r = Rotator::new(4).unwrap();
        r.update(SLIDE_INTERVAL * 2.0);
        assert_eq!(r.current(), 2);

        r.reset();
        assert_eq!(r.current(), 0);
        assert!(r.is_active(0));
        assert_eq!(active_count(&r, 4), 1);
        assert!(!r.is_running());

        // Still paused short of the delay
        assert_eq!(r.update(GALLERY_RESTART_DELAY * 0.9), 0);
        assert!(!r.is_running());

        // Delay elapses, rotation rearms
        assert_eq!(r.update(GALLERY_RESTART_DELAY * 0.2), 0);
        assert!(r.is_running());

        // And the fresh interval has a full period ahead of it
        assert_eq!(r.update(SLIDE_INTERVAL - 0.01), 0);
        assert_eq!(r.update(0.02), 1);
        assert_eq!(r.current(), 1);
    }

    #[test]
    fn single_slide_rotation_is_a_visible_noop() {
        let mut r = Rotator::new(1).unwrap();
        r.advance();
        assert_eq!(r.current(), 0);
        assert!(r.is_active(0));
    }
}
