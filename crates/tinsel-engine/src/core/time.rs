/// Fixed timestep accumulator.
/// Runs frame logic at a steady rate whatever the host's frame time.
pub struct FixedTimestep {
    /// The fixed delta time per tick, in seconds.
    dt: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
    /// Most steps a single host frame may run.
    max_steps: u32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self::with_max_steps(dt, 10)
    }

    /// Timestep for a target rate, e.g. 60 frames per second.
    pub fn from_fps(fps: u32, max_steps: u32) -> Self {
        Self::with_max_steps(1.0 / fps.max(1) as f32, max_steps)
    }

    pub fn with_max_steps(dt: f32, max_steps: u32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            max_steps: max_steps.max(1),
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        if !frame_dt.is_finite() || frame_dt <= 0.0 {
            return 0;
        }
        self.accumulator += frame_dt;
        // Cap to prevent a spiral of death after a long stall.
        self.accumulator = self.accumulator.min(self.dt * self.max_steps as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// Interpolation alpha between ticks (0.0 to 1.0).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }

    /// The fixed delta time, in seconds.
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// The fixed delta time, in milliseconds.
    pub fn dt_ms(&self) -> f64 {
        self.dt as f64 * 1000.0
    }
}

/// Logical clock advanced once per fixed step, alongside the host's wall
/// clock. The two drift apart once the step cap drops host time.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    frame: u64,
    elapsed_ms: f64,
    real_ms: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, dt_ms: f64) {
        self.frame += 1;
        self.elapsed_ms += dt_ms;
    }

    /// Frames run so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Milliseconds of game time elapsed.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Add one host frame's duration. Bad frame times are dropped.
    pub fn advance_real(&mut self, dt_ms: f64) {
        if dt_ms.is_finite() && dt_ms > 0.0 {
            self.real_ms += dt_ms;
        }
    }

    /// Milliseconds of host time elapsed, uncapped.
    pub fn real_ms(&self) -> f64 {
        self.real_ms
    }
}
