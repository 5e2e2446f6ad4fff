//! Delayed fill animation for the confidence and prediction bars.
//!
//! A bar stays empty for `delay`, then eases out to full over `duration`.
//! Callers pass the time since the results screen appeared and scale the
//! returned fraction by the bar's target width.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reveal {
    pub delay: Duration,
    pub duration: Duration,
}

pub const CONFIDENCE_REVEAL: Reveal = Reveal {
    delay: Duration::from_millis(100),
    duration: Duration::from_millis(800),
};

pub const PREDICTION_REVEAL: Reveal = Reveal {
    delay: Duration::from_millis(120),
    duration: Duration::from_millis(800),
};

impl Reveal {
    /// Share of the target shown after `elapsed`, in 0.0–1.0.
    pub fn fraction(&self, elapsed: Duration) -> f64 {
        let Some(since) = elapsed.checked_sub(self.delay) else {
            return 0.0;
        };
        if self.duration.is_zero() || since >= self.duration {
            return 1.0;
        }
        let t = since.as_secs_f64() / self.duration.as_secs_f64();
        // cubic ease-out
        1.0 - (1.0 - t).powi(3)
    }

    pub fn is_settled(&self, elapsed: Duration) -> bool {
        elapsed >= self.delay + self.duration
    }

    /// Scale `width` cells by the current fraction of `percent`.
    pub fn cells(&self, elapsed: Duration, percent: u32, width: u16) -> u16 {
        let target = f64::from(percent.min(100)) / 100.0 * f64::from(width);
        (target * self.fraction(elapsed)).round() as u16
    }
}
