//! Frame clock with a fixed, framerate-independent time step

use crate::pointer::PointerState;
use crate::system::ShadingTarget;

/// Time added per tick when the config does not override it
pub const DEFAULT_TIME_STEP: f64 = 0.01;

/// Clock lifecycle. There is no terminal phase: the loop runs until the
/// host stops scheduling ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockPhase {
    /// Before the first tick
    #[default]
    Idle,
    /// Steady per-frame loop
    Running,
}

/// Clock state after a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    pub phase: ClockPhase,
    /// Number of ticks taken so far
    pub frame: u64,
    /// Accumulated time in seconds-equivalent units
    pub time: f64,
}

impl FrameState {
    pub const IDLE: Self = Self {
        phase: ClockPhase::Idle,
        frame: 0,
        time: 0.0,
    };
}

impl Default for FrameState {
    fn default() -> Self {
        Self::IDLE
    }
}

/// Advance the clock by one tick.
///
/// Time is derived from the frame count, so `k` ticks always yield exactly
/// `k * step` regardless of how often the host calls back.
pub fn advance(state: FrameState, step: f64) -> FrameState {
    let frame = state.frame + 1;
    FrameState {
        phase: ClockPhase::Running,
        frame,
        time: frame as f64 * step,
    }
}

/// Drives every shading target from one global time value
pub struct FrameClock {
    state: FrameState,
    step: f64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::with_step(DEFAULT_TIME_STEP)
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock with a custom per-tick step
    pub fn with_step(step: f64) -> Self {
        Self {
            state: FrameState::IDLE,
            step: step.max(0.0),
        }
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    pub fn phase(&self) -> ClockPhase {
        self.state.phase
    }

    pub fn time(&self) -> f64 {
        self.state.time
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Advance one tick and push time (and the pointer, where tracked) into
    /// every target. All targets observe the same value.
    pub fn tick<'a, I, T>(&mut self, targets: I, pointer: &PointerState) -> FrameState
    where
        I: IntoIterator<Item = &'a mut T>,
        T: ShadingTarget + 'a,
    {
        if self.state.phase == ClockPhase::Idle {
            log::debug!("Frame clock starting (step = {})", self.step);
        }
        self.state = advance(self.state, self.step);

        let time = self.state.time as f32;
        let point = pointer.world.point();
        for target in targets {
            target.set_time(time);
            if let Some(point) = point {
                if target.receives_pointer() {
                    target.set_pointer(point);
                }
            }
        }

        self.state
    }
}
