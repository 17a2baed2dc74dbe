/// Notifications a carousel engine queues for its adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    SlideChange { native: usize }, // Active native index changed
    TransitionEnd { native: usize }, // Animation towards `native` finished
}

/// The host carousel engine behind one track.
///
/// Indices here are engine-native: in loop mode an engine may hold clones of
/// the real slides around them, and `loop_offset` says how many clones lead.
pub trait Engine {
    /// Number of real (authored) slides.
    fn slide_count(&self) -> usize;
    /// Number of clones placed before the first real slide.
    fn loop_offset(&self) -> usize;
    /// Total slides held by the engine, clones included.
    fn native_len(&self) -> usize;
    fn native_index(&self) -> usize;
    fn is_transitioning(&self) -> bool;
    /// Visual position in native slide units; fractional while sliding.
    fn position(&self) -> f32 {
        self.native_index() as f32
    }

    fn slide_to(&mut self, native: usize, duration_ms: u64, animate: bool);
    fn set_navigation_enabled(&mut self, enabled: bool);

    fn update(&mut self, dt_ms: u64);
    fn poll_event(&mut self) -> Option<EngineEvent>;
}

pub type BoxedEngine = Box<dyn Engine>;

/// Direction of travel along a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn from_delta(delta: isize) -> Option<Self> {
        match delta.signum() {
            1 => Some(Direction::Forward),
            -1 => Some(Direction::Backward),
            _ => None,
        }
    }
}
