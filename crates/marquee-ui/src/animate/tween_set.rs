//! L4 Atomic Layer: Tweens that run in parallel as one step

use marquee_core::TweenProperty;

use super::tween::Tween;
use crate::view_info::ViewInfo;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TweenSet {
    tweens: Vec<Tween>,
}

impl TweenSet {
    pub fn new(tweens: Vec<Tween>) -> Self {
        Self { tweens }
    }

    pub fn push(&mut self, tween: Tween) {
        self.tweens.push(tween);
    }

    pub fn tweens(&self) -> &[Tween] {
        &self.tweens
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Longest member duration
    pub fn duration(&self) -> f32 {
        self.tweens
            .iter()
            .map(|t| t.duration)
            .fold(0.0, f32::max)
    }

    pub fn find(&self, property: TweenProperty) -> Option<&Tween> {
        self.tweens.iter().find(|t| t.property == property)
    }

    /// Write every member's value at `elapsed`. Properties without a tween
    /// are left alone; finished members hold their end value.
    pub fn apply(&self, elapsed: f32, view: &mut ViewInfo) {
        for tween in &self.tweens {
            view.set_property(tween.property, tween.evaluate(elapsed));
        }
    }

    pub fn snap(&self, view: &mut ViewInfo) {
        for tween in &self.tweens {
            view.set_property(tween.property, tween.end);
        }
    }

    /// Replace every start value with the view's current value
    pub fn capture_start(&mut self, view: &ViewInfo) {
        for tween in &mut self.tweens {
            tween.start = view.property(tween.property);
        }
    }
}
