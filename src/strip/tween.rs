/// A single eased value over a fixed duration, stepped by frame time.
#[derive(Debug, Clone)]
pub struct Tween {
    from: f32,
    to: f32,
    duration_ms: u64,
    elapsed_ms: u64,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration_ms: u64) -> Self {
        Self {
            from,
            to,
            duration_ms,
            elapsed_ms: 0,
        }
    }

    /// Advance by `dt_ms` and return the eased value.
    pub fn apply(&mut self, dt_ms: u64) -> f32 {
        self.elapsed_ms = (self.elapsed_ms + dt_ms).min(self.duration_ms);
        let t = if self.duration_ms == 0 {
            1.0
        } else {
            self.elapsed_ms as f32 / self.duration_ms as f32
        };
        self.from + (self.to - self.from) * cubic_out(t)
    }

    pub fn finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }
}

fn cubic_out(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}
