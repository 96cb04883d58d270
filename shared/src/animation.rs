use serde::Deserialize;

use crate::geometry::Point;

/// Anything that progresses with wall-clock time and can be driven one
/// frame at a time.
///
/// `advance` returns `true` while more frames are needed. Drivers (a
/// requestAnimationFrame loop, a timer, or [`FixedStepClock`] in tests) keep
/// calling it until it returns `false`.
pub trait Animated {
    fn advance(&mut self, now_ms: f64) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    /// Decelerating to zero velocity.
    EaseOutCubic,
    #[default]
    EaseInOutCubic,
    /// `3t² - 2t³`; zero velocity at both ends.
    Smoothstep,
}

impl Easing {
    /// Map linear progress `t` (clamped to 0..=1) onto the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 1.0 };
        match self {
            Easing::Linear => t,
            Easing::EaseOutCubic => {
                let t = t - 1.0;
                t * t * t + 1.0
            }
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
            Easing::Smoothstep => t * t * (3.0 - 2.0 * t),
        }
    }
}

/// Linear blend between two values of the same kind.
pub trait Lerp: Copy {
    fn lerp(self, other: Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(self, other: Self, t: f64) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for Point {
    fn lerp(self, other: Self, t: f64) -> Self {
        Point::lerp(self, other, t)
    }
}

/// Eased interpolation between `from` and `to` at linear `progress`.
pub fn interpolate<T: Lerp>(from: T, to: T, progress: f64, easing: Easing) -> T {
    from.lerp(to, easing.apply(progress))
}

/// A fixed-duration transition between two values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween<T> {
    pub from: T,
    pub to: T,
    pub start_ms: f64,
    pub duration_ms: f64,
    pub easing: Easing,
}

impl<T: Lerp> Tween<T> {
    pub fn new(from: T, to: T, start_ms: f64, duration_ms: f64, easing: Easing) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms,
            easing,
        }
    }

    /// Linear progress in 0..=1. Zero-length tweens are complete immediately.
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms.is_nan() || self.duration_ms <= 0.0 {
            return 1.0;
        }
        let t = (now_ms - self.start_ms) / self.duration_ms;
        if t.is_finite() { t.clamp(0.0, 1.0) } else { 1.0 }
    }

    pub fn sample(&self, now_ms: f64) -> T {
        interpolate(self.from, self.to, self.progress(now_ms), self.easing)
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }
}

/// Deterministic frame clock for headless driving of [`Animated`] values.
#[derive(Debug, Clone, Copy)]
pub struct FixedStepClock {
    now_ms: f64,
    step_ms: f64,
}

impl FixedStepClock {
    pub fn new(start_ms: f64, step_ms: f64) -> Self {
        Self {
            now_ms: start_ms,
            step_ms: step_ms.max(f64::MIN_POSITIVE),
        }
    }

    pub fn now(&self) -> f64 {
        self.now_ms
    }

    /// Advance by one step and return the new time.
    pub fn tick(&mut self) -> f64 {
        self.now_ms += self.step_ms;
        self.now_ms
    }

    /// Drive `anim` for at most `max_frames` steps, stopping early once it
    /// settles. Returns the number of frames run.
    #[cfg(test)]
    pub(crate) fn run<A: Animated + ?Sized>(&mut self, anim: &mut A, max_frames: usize) -> usize {
        for frame in 1..=max_frames {
            let now = self.tick();
            if !anim.advance(now) {
                return frame;
            }
        }
        max_frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        let diff = (actual - expected).abs();
        assert!(
            diff < 1e-9,
            "expected {expected}, got {actual} (diff: {diff})"
        );
    }

    #[test]
    fn easings_hit_their_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::EaseOutCubic,
            Easing::EaseInOutCubic,
            Easing::Smoothstep,
        ] {
            assert_close(easing.apply(0.0), 0.0);
            assert_close(easing.apply(1.0), 1.0);
            assert_close(easing.apply(-3.0), 0.0);
            assert_close(easing.apply(7.0), 1.0);
        }
    }

    #[test]
    fn in_out_curves_are_symmetric() {
        assert_close(Easing::EaseInOutCubic.apply(0.5), 0.5);
        assert_close(Easing::Smoothstep.apply(0.5), 0.5);
        assert_close(
            Easing::EaseInOutCubic.apply(0.25) + Easing::EaseInOutCubic.apply(0.75),
            1.0,
        );
    }

    #[test]
    fn ease_out_is_ahead_of_linear() {
        assert!(Easing::EaseOutCubic.apply(0.3) > 0.3);
    }

    #[test]
    fn tween_samples_over_its_duration() {
        let tween = Tween::new(10.0, 20.0, 1000.0, 100.0, Easing::Linear);
        assert_close(tween.sample(900.0), 10.0);
        assert_close(tween.sample(1050.0), 15.0);
        assert_close(tween.sample(5000.0), 20.0);
        assert!(!tween.is_finished(1099.0));
        assert!(tween.is_finished(1100.0));
    }

    #[test]
    fn zero_duration_tween_is_complete() {
        let tween = Tween::new(Point::new(0.0, 0.0), Point::new(4.0, 2.0), 0.0, 0.0, Easing::Linear);
        assert_eq!(tween.sample(0.0), Point::new(4.0, 2.0));
    }

    struct Countdown(u32);

    impl Animated for Countdown {
        fn advance(&mut self, _now_ms: f64) -> bool {
            self.0 = self.0.saturating_sub(1);
            self.0 > 0
        }
    }

    #[test]
    fn fixed_step_clock_stops_when_settled() {
        let mut clock = FixedStepClock::new(0.0, 16.0);
        let mut anim = Countdown(3);
        assert_eq!(clock.run(&mut anim, 100), 3);
        assert_close(clock.now(), 48.0);
    }
}
