//! L4 Atomic Layer: A single property interpolation

use super::easing::{TweenAlgorithm, TweenAlgorithmExt};
use marquee_core::TweenProperty;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub property: TweenProperty,
    pub algorithm: TweenAlgorithm,
    pub start: f32,
    pub end: f32,
    /// Seconds; zero snaps straight to `end`
    pub duration: f32,
}

impl Tween {
    pub fn new(
        property: TweenProperty,
        algorithm: TweenAlgorithm,
        start: f32,
        end: f32,
        duration: f32,
    ) -> Self {
        Self {
            property,
            algorithm,
            start,
            end,
            duration,
        }
    }

    /// Value at `elapsed` seconds. Exact at both ends.
    pub fn evaluate(&self, elapsed: f32) -> f32 {
        if !(self.duration > 0.0) || elapsed >= self.duration {
            return self.end;
        }
        if !(elapsed > 0.0) {
            return self.start;
        }
        let start = self.start as f64;
        let value = self.algorithm.ease(
            elapsed as f64,
            self.duration as f64,
            start,
            self.end as f64 - start,
        );
        value as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_exactness() {
        for algorithm in TweenAlgorithm::ALL {
            let tween = Tween::new(TweenProperty::X, algorithm, 3.25, -17.5, 0.75);
            assert_eq!(tween.evaluate(0.0), 3.25, "{:?} at start", algorithm);
            assert_eq!(tween.evaluate(0.75), -17.5, "{:?} at end", algorithm);
            assert_eq!(tween.evaluate(5.0), -17.5, "{:?} past end", algorithm);
            assert_eq!(tween.evaluate(-1.0), 3.25, "{:?} before start", algorithm);
        }
    }

    #[test]
    fn test_zero_duration_snaps() {
        for algorithm in TweenAlgorithm::ALL {
            let tween = Tween::new(TweenProperty::Alpha, algorithm, 0.0, 1.0, 0.0);
            for t in [0.0, 0.5, 10.0, -3.0] {
                let v = tween.evaluate(t);
                assert_eq!(v, 1.0, "{:?} at t={}", algorithm, t);
            }
        }
    }

    #[test]
    fn test_linear_midpoint() {
        let tween = Tween::new(TweenProperty::Y, TweenAlgorithm::Linear, 10.0, 20.0, 2.0);
        assert!((tween.evaluate(1.0) - 15.0).abs() < 1e-5);
    }

    #[test]
    fn test_nan_elapsed_holds_start() {
        let tween = Tween::new(TweenProperty::Y, TweenAlgorithm::EaseInSine, 1.0, 2.0, 1.0);
        assert_eq!(tween.evaluate(f32::NAN), 1.0);
    }
}
