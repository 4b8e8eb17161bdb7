//! Self-rescheduling per-frame driver
//!
//! The host (a winit window in the binaries, a recording fake in tests) calls
//! [`FrameLoop::tick`] whenever the frame it was asked for comes due. Every
//! tick asks for the next frame before doing any fallible work, so a failed
//! frame never ends the loop. Only the [`StopToken`] does.

use std::cell::Cell;
use std::rc::Rc;

use crate::controls::ControlPanel;
use crate::error::Result;
use crate::gfx::scene::Scene;

use super::animation::{AnimationRules, AnimationState};
use super::clock::{Clock, SystemTimeSource, TimeSource};

/// Lifecycle of a [`FrameLoop`]; a new loop is already running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// Shared flag that ends a running loop at its next tick
#[derive(Debug, Clone, Default)]
pub struct StopToken(Rc<Cell<bool>>);

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.get()
    }
}

/// Services the loop calls into every frame, in this order:
/// `request_frame`, `update_stats`, `update_controls`, `render`
pub trait FrameHost {
    /// Schedule one more call to [`FrameLoop::tick`]
    fn request_frame(&mut self);

    fn update_stats(&mut self, _delta: f32) {}

    /// Camera and pointer interaction
    fn update_controls(&mut self, _scene: &mut Scene, _delta: f32) {}

    /// Draw the scene and the panel; blocks until the frame is submitted
    fn render(&mut self, scene: &mut Scene, panel: &mut ControlPanel) -> Result<()>;
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    Rendered { delta: f32 },
    Stopped,
}

pub struct FrameLoop<T: TimeSource = SystemTimeSource> {
    clock: Clock<T>,
    rules: AnimationRules,
    animation: AnimationState,
    state: LoopState,
    stop: StopToken,
    frame_pending: bool,
    frames: u64,
}

impl FrameLoop<SystemTimeSource> {
    pub fn new(rules: AnimationRules, scene: &Scene) -> Result<Self> {
        Self::with_clock(Clock::new(), rules, scene)
    }
}

impl<T: TimeSource> FrameLoop<T> {
    /// Builds a running loop around an already running clock
    pub fn with_clock(clock: Clock<T>, rules: AnimationRules, scene: &Scene) -> Result<Self> {
        let animation = AnimationState::capture(&rules, scene)?;
        log::debug!("frame loop running");
        Ok(Self {
            clock,
            rules,
            animation,
            state: LoopState::Running,
            stop: StopToken::new(),
            frame_pending: false,
            frames: 0,
        })
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn animation(&self) -> &AnimationState {
        &self.animation
    }

    pub fn stop_token(&self) -> StopToken {
        self.stop.clone()
    }

    /// Requests the first frame from `host`
    ///
    /// Does nothing while a frame is already pending or after the loop
    /// stopped.
    pub fn start(&mut self, host: &mut impl FrameHost) {
        if self.state == LoopState::Stopped || self.stop.is_stopped() {
            return;
        }
        self.schedule(host);
    }

    fn schedule(&mut self, host: &mut impl FrameHost) {
        if self.frame_pending {
            return;
        }
        self.frame_pending = true;
        host.request_frame();
    }

    /// Runs one frame
    pub fn tick(
        &mut self,
        scene: &mut Scene,
        panel: &mut ControlPanel,
        host: &mut impl FrameHost,
    ) -> Result<TickOutcome> {
        self.frame_pending = false;

        if self.stop.is_stopped() {
            if self.state != LoopState::Stopped {
                log::debug!("frame loop stopped after {} frames", self.frames);
            }
            self.state = LoopState::Stopped;
            return Ok(TickOutcome::Stopped);
        }

        self.schedule(host);
        let delta = self.clock.get_delta();

        // A rejected edit must not cost the others or this frame's time step
        let mut edit_error = None;
        for edit in panel.drain_edits() {
            if let Err(err) = edit.apply(scene) {
                log::warn!("dropped edit of {}: {err}", edit.property);
                edit_error.get_or_insert(err);
            }
        }

        self.animation = std::mem::take(&mut self.animation).advance(delta, &self.rules);
        self.animation.apply(&self.rules, scene)?;

        host.update_stats(delta);
        host.update_controls(scene, delta);
        host.render(scene, panel)?;

        self.frames += 1;
        match edit_error {
            Some(err) => Err(err),
            None => Ok(TickOutcome::Rendered { delta }),
        }
    }

    /// Runs at most `n` ticks, returning how many rendered
    ///
    /// Stops early when the stop token fires. A failed frame aborts the run
    /// and returns its error.
    pub fn run_ticks(
        &mut self,
        n: usize,
        scene: &mut Scene,
        panel: &mut ControlPanel,
        host: &mut impl FrameHost,
    ) -> Result<usize> {
        let mut rendered = 0;
        for _ in 0..n {
            match self.tick(scene, panel, host)? {
                TickOutcome::Rendered { .. } => rendered += 1,
                TickOutcome::Stopped => break,
            }
        }
        Ok(rendered)
    }
}
