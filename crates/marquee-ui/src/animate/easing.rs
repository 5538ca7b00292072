//! L4 Atomic Layer: Pure easing curves
//!
//! Classic interpolation formulas over `(t, d, b, c)`: elapsed time,
//! duration, start value and change in value (`end - start`).

use std::f64::consts::PI;

// Re-export TweenAlgorithm from core
pub use marquee_core::TweenAlgorithm;

/// Extension trait for TweenAlgorithm with calculation methods
pub trait TweenAlgorithmExt {
    /// Evaluate the curve at elapsed time `t` of `d`, starting at `b` and moving by `c`
    ///
    /// Callers guard the edges (`d <= 0`, `t <= 0`, `t >= d`); this only
    /// evaluates the formula.
    fn ease(&self, t: f64, d: f64, b: f64, c: f64) -> f64;
}

impl TweenAlgorithmExt for TweenAlgorithm {
    fn ease(&self, t: f64, d: f64, b: f64, c: f64) -> f64 {
        match self {
            TweenAlgorithm::Linear => c * t / d + b,
            TweenAlgorithm::EaseInQuadratic => {
                let t = t / d;
                c * t * t + b
            }
            TweenAlgorithm::EaseOutQuadratic => {
                let t = t / d;
                -c * t * (t - 2.0) + b
            }
            TweenAlgorithm::EaseInOutQuadratic => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    return c / 2.0 * t * t + b;
                }
                let t = t - 1.0;
                -c / 2.0 * (t * (t - 2.0) - 1.0) + b
            }
            TweenAlgorithm::EaseInCubic => c * (t / d).powi(3) + b,
            TweenAlgorithm::EaseOutCubic => {
                let t = t / d - 1.0;
                c * (t.powi(3) + 1.0) + b
            }
            TweenAlgorithm::EaseInOutCubic => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    return c / 2.0 * t.powi(3) + b;
                }
                let t = t - 2.0;
                c / 2.0 * (t.powi(3) + 2.0) + b
            }
            TweenAlgorithm::EaseInQuartic => c * (t / d).powi(4) + b,
            TweenAlgorithm::EaseOutQuartic => {
                let t = t / d - 1.0;
                -c * (t.powi(4) - 1.0) + b
            }
            TweenAlgorithm::EaseInOutQuartic => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    return c / 2.0 * t.powi(4) + b;
                }
                let t = t - 2.0;
                -c / 2.0 * (t.powi(4) - 2.0) + b
            }
            TweenAlgorithm::EaseInQuintic => c * (t / d).powi(5) + b,
            TweenAlgorithm::EaseOutQuintic => {
                let t = t / d - 1.0;
                c * (t.powi(5) + 1.0) + b
            }
            TweenAlgorithm::EaseInOutQuintic => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    return c / 2.0 * t.powi(5) + b;
                }
                let t = t - 2.0;
                c / 2.0 * (t.powi(5) + 2.0) + b
            }
            TweenAlgorithm::EaseInSine => -c * (t / d * (PI / 2.0)).cos() + c + b,
            TweenAlgorithm::EaseOutSine => c * (t / d * (PI / 2.0)).sin() + b,
            TweenAlgorithm::EaseInOutSine => -c / 2.0 * ((PI * t / d).cos() - 1.0) + b,
            TweenAlgorithm::EaseInExponential => c * 2f64.powf(10.0 * (t / d - 1.0)) + b,
            TweenAlgorithm::EaseOutExponential => c * (-(2f64.powf(-10.0 * t / d)) + 1.0) + b,
            TweenAlgorithm::EaseInOutExponential => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    return c / 2.0 * 2f64.powf(10.0 * (t - 1.0)) + b;
                }
                let t = t - 1.0;
                c / 2.0 * (-(2f64.powf(-10.0 * t)) + 2.0) + b
            }
            TweenAlgorithm::EaseInCircular => {
                let t = t / d;
                -c * ((1.0 - t * t).sqrt() - 1.0) + b
            }
            TweenAlgorithm::EaseOutCircular => {
                let t = t / d - 1.0;
                c * (1.0 - t * t).sqrt() + b
            }
            TweenAlgorithm::EaseInOutCircular => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    return -c / 2.0 * ((1.0 - t * t).sqrt() - 1.0) + b;
                }
                let t = t - 2.0;
                c / 2.0 * ((1.0 - t * t).sqrt() + 1.0) + b
            }
        }
    }
}
