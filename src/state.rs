#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CrossfadeState {
    Resting,     // Exactly one slide fully opaque, waiting for the next cue
    Overlapping, // Next slide raised to half opacity, settle pending
}
