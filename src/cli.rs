use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::slide::FitMode;

#[derive(Parser, Debug)]
#[command(
    name = "crossfade",
    version,
    about = "Endlessly cross-fades the images of a directory"
)]
pub struct Cli {
    /// Directory holding the images (png, jpg, jpeg, bmp, gif), shown in file name order.
    #[arg(value_name = "IMAGE_DIR")]
    pub image_dir: PathBuf,

    /// Record the rendered frames to this video file through ffmpeg.
    #[arg(long, value_name = "FILE")]
    pub record: Option<PathBuf>,

    /// Stop after this many seconds of playback instead of running until the window closes.
    #[arg(long, value_name = "SECONDS", value_parser = parse_seconds)]
    pub duration: Option<Duration>,

    /// Shuffle the images once before starting.
    #[arg(long)]
    pub shuffle: bool,

    /// Seed for --shuffle, for a reproducible order.
    #[arg(long, value_name = "N", requires = "shuffle")]
    pub seed: Option<u64>,

    /// How each image is scaled onto the frame.
    #[arg(long, value_enum, default_value_t = FitMode::Cover)]
    pub fit: FitMode,

    /// Draw the cursor, state and elapsed time on top of the images.
    #[arg(long)]
    pub debug_overlay: bool,
}

fn parse_seconds(raw: &str) -> Result<Duration, String> {
    let seconds: f32 = raw
        .parse()
        .map_err(|_| format!("'{raw}' is not a number of seconds"))?;
    if !(seconds.is_finite() && seconds > 0.0) {
        return Err(format!("duration must be positive, got {raw}"));
    }
    Duration::try_from_secs_f32(seconds).map_err(|e| format!("duration {raw} is out of range: {e}"))
}
