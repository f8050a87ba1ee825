//! Renderer lifecycle state machine.
//!
//! Transitions on [`Lifecycle`] are pure `(state, input) -> (state, output)`
//! functions. [`RenderState`] applies them and carries the remaining per-renderer
//! counters.

use crate::error::{RendererError, Result};
use crate::paint::ClearColor;
use crate::platform::FrameHandle;

/// Tagged lifecycle. `Destroyed` is terminal and never running.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Lifecycle {
    Active { running: bool },
    Destroyed,
}

impl Lifecycle {
    pub const INITIAL: Self = Self::Active { running: false };

    /// Returns the next state and whether a transition happened.
    pub fn start(self) -> Result<(Self, bool)> {
        match self {
            Self::Destroyed => Err(RendererError::RendererDestroyed),
            Self::Active { running: true } => Ok((self, false)),
            Self::Active { running: false } => Ok((Self::Active { running: true }, true)),
        }
    }

    pub fn stop(self) -> (Self, bool) {
        match self {
            Self::Active { running: true } => (Self::Active { running: false }, true),
            other => (other, false),
        }
    }

    pub fn destroy(self) -> (Self, bool) {
        match self {
            Self::Destroyed => (Self::Destroyed, false),
            Self::Active { .. } => (Self::Destroyed, true),
        }
    }

    pub fn ensure_active(self) -> Result<()> {
        match self {
            Self::Destroyed => Err(RendererError::RendererDestroyed),
            Self::Active { .. } => Ok(()),
        }
    }

    pub fn is_running(self) -> bool {
        matches!(self, Self::Active { running: true })
    }

    pub fn is_destroyed(self) -> bool {
        matches!(self, Self::Destroyed)
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// Outcome of [`RenderState::stop`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum Stopped {
    NotRunning,
    /// The loop stopped; `pending` is the callback still to cancel.
    Stopped { pending: Option<FrameHandle> },
}

#[derive(Debug, Clone)]
pub(crate) struct RenderState {
    lifecycle: Lifecycle,
    frame: u64,
    last_timestamp: f64,
    clear_color: ClearColor,
    xr_active: bool,
    scheduled: Option<FrameHandle>,
    /// Bumped on every stop; callbacks scheduled under an older epoch are stale.
    epoch: u64,
    /// Set between `begin_frame` and `end_frame`.
    rendering: bool,
    released: bool,
}

impl RenderState {
    pub fn new(clear_color: ClearColor) -> Self {
        Self {
            lifecycle: Lifecycle::INITIAL,
            frame: 0,
            last_timestamp: 0.0,
            clear_color,
            xr_active: false,
            scheduled: None,
            epoch: 0,
            rendering: false,
            released: false,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn last_timestamp(&self) -> f64 {
        self.last_timestamp
    }

    pub fn clear_color(&self) -> ClearColor {
        self.clear_color
    }

    pub fn xr_active(&self) -> bool {
        self.xr_active
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn ensure_active(&self) -> Result<()> {
        self.lifecycle.ensure_active()
    }

    pub fn start(&mut self) -> Result<bool> {
        let (next, changed) = self.lifecycle.start()?;
        self.lifecycle = next;
        Ok(changed)
    }

    pub fn stop(&mut self) -> Stopped {
        let (next, changed) = self.lifecycle.stop();
        self.lifecycle = next;
        if !changed {
            return Stopped::NotRunning;
        }
        self.epoch += 1;
        Stopped::Stopped {
            pending: self.scheduled.take(),
        }
    }

    /// Returns `true` the first time only.
    pub fn destroy(&mut self) -> bool {
        let (next, changed) = self.lifecycle.destroy();
        self.lifecycle = next;
        if changed {
            self.epoch += 1;
            self.scheduled = None;
        }
        changed
    }

    /// Whether a callback scheduled under `epoch` may still render.
    pub fn accepts_tick(&self, epoch: u64) -> bool {
        self.lifecycle.is_running() && self.epoch == epoch
    }

    /// Admits a fired callback; its handle is no longer pending.
    pub fn begin_tick(&mut self, epoch: u64) -> bool {
        if !self.accepts_tick(epoch) {
            return false;
        }
        self.scheduled = None;
        true
    }

    /// Admits a frame. Frames never nest.
    pub fn begin_frame(&mut self) -> Result<()> {
        self.ensure_active()?;
        if self.rendering {
            return Err(RendererError::FrameInProgress);
        }
        self.rendering = true;
        Ok(())
    }

    pub fn end_frame(&mut self) {
        self.rendering = false;
    }

    pub fn set_scheduled(&mut self, handle: FrameHandle) {
        self.scheduled = Some(handle);
    }

    /// Records a submitted frame and returns the new frame index.
    pub fn complete_frame(&mut self, timestamp: f64) -> u64 {
        self.frame += 1;
        self.last_timestamp = timestamp;
        self.frame
    }

    pub fn set_clear_color(&mut self, color: ClearColor) {
        self.clear_color = color;
    }

    pub fn set_xr_active(&mut self, active: bool) {
        self.xr_active = active;
    }

    /// Destroyed but the surface configuration has not been released yet.
    pub fn needs_release(&self) -> bool {
        self.lifecycle.is_destroyed() && !self.released
    }

    pub fn mark_released(&mut self) {
        self.released = true;
    }
}
