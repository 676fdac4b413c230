use std::time::Duration;

pub const RENDER_WIDTH: i32 = 1920;           // Width of the render texture
pub const RENDER_HEIGHT: i32 = 1080;          // Height of the render texture
pub const FPS: u32 = 60;                      // Frames per second
pub const FRAME_TIME: f32 = 1.0 / FPS as f32; // Time per frame when recording (seconds)

pub const START_DELAY: Duration = Duration::from_millis(7000);      // Page ready -> first overlap cue
pub const OVERLAP_DURATION: Duration = Duration::from_millis(2000); // Overlap cue -> settle
pub const CYCLE_PERIOD: Duration = Duration::from_millis(7000);     // Overlap cue -> next overlap cue

pub const OVERLAP_OPACITY: f32 = 0.5;
