#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripState {
    Idle,    // Resting on the active slide
    Sliding, // Animating towards the active slide
}
