/// Fixed-period tick accumulator driven by per-frame `dt`.
///
/// Components keep one inside an `Option`: `Some` means the periodic effect
/// is scheduled, `None` means stopped. Dropping the `Option` back to `None`
/// is the whole cancellation story, so stop is idempotent by construction.
pub struct Interval {
    period: f32,
    elapsed: f32,
}

impl Interval {
    pub fn new(period: f32) -> Self {
        Self {
            period,
            elapsed: 0.0,
        }
    }

    /// Advances the accumulator and returns how many whole periods elapsed.
    /// A large `dt` (a stalled frame) yields several ticks at once so the
    /// long-run cadence stays correct.
    pub fn tick(&mut self, dt: f32) -> u32 {
        self.elapsed += dt;
        let mut fired = 0;
        while self.elapsed >= self.period {
            self.elapsed -= self.period;
            fired += 1;
        }
        fired
    }
}
