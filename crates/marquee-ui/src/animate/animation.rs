//! L3 Molecular Layer: Sequential steps with a playback cursor

use super::tween_set::TweenSet;
use crate::view_info::ViewInfo;

/// Ordered steps plus "which step, how far into it"
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Animation {
    steps: Vec<TweenSet>,
    step: usize,
    elapsed: f32,
}

impl Animation {
    pub fn new(steps: Vec<TweenSet>) -> Self {
        Self {
            steps,
            step: 0,
            elapsed: 0.0,
        }
    }

    pub fn push(&mut self, step: TweenSet) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[TweenSet] {
        &self.steps
    }

    pub fn steps_mut(&mut self) -> &mut [TweenSet] {
        &mut self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step_index(&self) -> usize {
        self.step
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Total length of all steps
    pub fn duration(&self) -> f32 {
        self.steps.iter().map(TweenSet::duration).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.step >= self.steps.len()
    }

    /// Rewind to the first step
    pub fn reset(&mut self) {
        self.step = 0;
        self.elapsed = 0.0;
    }

    /// Play `dt` more seconds onto `view`. Returns true once the last step
    /// has been consumed; with `looping` the cursor is rewound at that point.
    pub fn advance(&mut self, dt: f32, view: &mut ViewInfo, looping: bool) -> bool {
        if self.steps.is_empty() {
            return true;
        }
        if self.is_complete() {
            if !looping {
                return true;
            }
            self.reset();
        }

        if dt > 0.0 {
            self.elapsed += dt;
        }

        loop {
            let set = &self.steps[self.step];
            if self.elapsed < set.duration() {
                set.apply(self.elapsed, view);
                return false;
            }

            set.snap(view);
            self.step += 1;
            self.elapsed = 0.0;

            if self.is_complete() {
                if looping {
                    self.step = 0;
                }
                return true;
            }
        }
    }
}
