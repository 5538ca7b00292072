//! L3 Molecular Layer: Scheduler for ad-hoc animation chains
//!
//! Chains are started by sending commands through an [`AnimationHandle`];
//! the manager picks them up on its next `update` and drives them against
//! whatever owns the target components.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};
use uuid::Uuid;

use marquee_core::{TweenAlgorithm, TweenProperty};

use super::tween::Tween;
use super::tween_set::TweenSet;
use crate::component::ComponentId;
use crate::view_info::ViewInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub Uuid);

impl ChainId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// One link of a chain: move `target` towards `end` over `duration`.
/// Start values are taken from the target when the step begins.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedStep {
    pub target: ComponentId,
    pub end: Vec<(TweenProperty, f32)>,
    pub duration: f32,
    pub algorithm: TweenAlgorithm,
}

impl ScriptedStep {
    pub fn new(target: ComponentId, duration: f32, algorithm: TweenAlgorithm) -> Self {
        Self {
            target,
            end: Vec::new(),
            duration,
            algorithm,
        }
    }

    pub fn to(mut self, property: TweenProperty, value: f32) -> Self {
        self.end.push((property, value));
        self
    }

    fn tweens(&self) -> TweenSet {
        TweenSet::new(
            self.end
                .iter()
                .map(|&(property, end)| Tween::new(property, self.algorithm, 0.0, end, self.duration))
                .collect(),
        )
    }
}

#[derive(Debug)]
pub enum AnimationCommand {
    Start {
        id: ChainId,
        steps: Vec<ScriptedStep>,
        looping: bool,
        auto_destroy: bool,
    },
    Destroy(ChainId),
}

/// Whoever can hand out a component's view by id
pub trait AnimationTarget {
    fn view_info_mut(&mut self, id: ComponentId) -> Option<&mut ViewInfo>;
}

/// Cloneable sender side of the manager
#[derive(Debug, Clone)]
pub struct AnimationHandle {
    tx: UnboundedSender<AnimationCommand>,
}

impl AnimationHandle {
    pub fn start(&self, step: ScriptedStep, looping: bool, auto_destroy: bool) -> ChainId {
        self.start_chain(vec![step], looping, auto_destroy)
    }

    pub fn start_chain(&self, steps: Vec<ScriptedStep>, looping: bool, auto_destroy: bool) -> ChainId {
        let id = ChainId::new();
        let command = AnimationCommand::Start {
            id,
            steps,
            looping,
            auto_destroy,
        };
        if self.tx.send(command).is_err() {
            warn!(chain = ?id, "Animation manager is gone, chain dropped");
        }
        id
    }

    pub fn destroy(&self, id: ChainId) {
        let _ = self.tx.send(AnimationCommand::Destroy(id));
    }
}

#[derive(Debug)]
struct Chain {
    id: ChainId,
    steps: Vec<ScriptedStep>,
    index: usize,
    elapsed: f32,
    /// Tweens of the running step with their captured start values
    active: Option<TweenSet>,
    looping: bool,
    auto_destroy: bool,
    loop_count: u32,
}

impl Chain {
    fn is_finished(&self) -> bool {
        self.index >= self.steps.len()
    }

    /// Advance by `dt`; true when the last step was consumed this frame
    fn update(&mut self, dt: f32, target: &mut dyn AnimationTarget) -> bool {
        if self.is_finished() {
            return false;
        }
        let step = &self.steps[self.index];
        let Some(view) = target.view_info_mut(step.target) else {
            debug!(chain = ?self.id, target = ?step.target, "Animation target missing, step skipped");
            self.next_step();
            return self.is_finished();
        };

        let tweens = self.active.get_or_insert_with(|| {
            let mut tweens = step.tweens();
            tweens.capture_start(view);
            tweens
        });

        self.elapsed += dt.max(0.0);
        if self.elapsed < step.duration {
            tweens.apply(self.elapsed, view);
            return false;
        }
        tweens.snap(view);
        self.next_step();
        self.is_finished()
    }

    fn next_step(&mut self) {
        self.index += 1;
        self.elapsed = 0.0;
        self.active = None;
    }
}

/// Owns every running chain
#[derive(Debug)]
pub struct AnimationManager {
    rx: UnboundedReceiver<AnimationCommand>,
    tx: UnboundedSender<AnimationCommand>,
    chains: Vec<Chain>,
}

impl Default for AnimationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationManager {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            rx,
            tx,
            chains: Vec::new(),
        }
    }

    pub fn handle(&self) -> AnimationHandle {
        AnimationHandle {
            tx: self.tx.clone(),
        }
    }

    /// Number of chains alive, finished ones included
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    pub fn contains(&self, id: ChainId) -> bool {
        self.chains.iter().any(|c| c.id == id)
    }

    /// Times the chain ran to its end
    pub fn loop_count(&self, id: ChainId) -> Option<u32> {
        self.chains.iter().find(|c| c.id == id).map(|c| c.loop_count)
    }

    /// Apply pending commands, then advance every chain by `dt`
    pub fn update(&mut self, dt: f32, target: &mut dyn AnimationTarget) {
        while let Ok(command) = self.rx.try_recv() {
            self.apply(command);
        }

        let mut destroyed = Vec::new();
        for chain in &mut self.chains {
            if !chain.update(dt, target) {
                continue;
            }
            chain.loop_count += 1;
            if chain.looping {
                chain.index = 0;
            }
            if chain.auto_destroy {
                destroyed.push(chain.id);
            }
        }
        if !destroyed.is_empty() {
            self.chains.retain(|c| !destroyed.contains(&c.id));
        }
    }

    fn apply(&mut self, command: AnimationCommand) {
        match command {
            AnimationCommand::Start {
                id,
                steps,
                looping,
                auto_destroy,
            } => {
                debug!(chain = ?id, steps = steps.len(), looping, auto_destroy, "Animation chain started");
                self.chains.push(Chain {
                    id,
                    steps,
                    index: 0,
                    elapsed: 0.0,
                    active: None,
                    looping,
                    auto_destroy,
                    loop_count: 0,
                });
            }
            AnimationCommand::Destroy(id) => {
                self.chains.retain(|c| c.id != id);
            }
        }
    }
}
