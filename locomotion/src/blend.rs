/// Outcome of advancing a [`TimedBlend`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BlendStep {
    Continuing(f32),
    /// Finished; carries the exact target value.
    Done(f32),
}

impl BlendStep {
    pub fn value(self) -> f32 {
        match self {
            BlendStep::Continuing(v) | BlendStep::Done(v) => v,
        }
    }

    pub fn is_done(self) -> bool {
        matches!(self, BlendStep::Done(_))
    }
}

/// Linear ramp from `start` to `target` over `duration`, advanced once per tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimedBlend {
    elapsed: f32,
    duration: f32,
    start: f32,
    target: f32,
}

impl TimedBlend {
    pub fn new(start: f32, target: f32, duration: f32) -> Self {
        Self {
            elapsed: 0.0,
            duration,
            start,
            target,
        }
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn step(&mut self, dt: f32) -> BlendStep {
        self.elapsed += dt;
        if self.duration <= 0.0 || self.elapsed >= self.duration {
            return BlendStep::Done(self.target);
        }
        let t = self.elapsed / self.duration;
        BlendStep::Continuing(self.start + (self.target - self.start) * t)
    }
}
