use std::io::Write;
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};
use raylib::prelude::*;
use crate::error::{Error, Result};

/// Pipes raw RGBA frames into an `ffmpeg` child encoding H.264.
pub struct Ffmpeg {
    process: Child,
    stdin: Option<ChildStdin>,
}

impl Ffmpeg {
    pub fn spawn(width: i32, height: i32, fps: u32, output: &Path) -> Result<Ffmpeg> {
        let mut process = Command::new("ffmpeg")
            .stdin(Stdio::piped())
            .args(["-loglevel", "error"])
            .arg("-y")
            .args(["-f", "rawvideo"])
            .args(["-pixel_format", "rgba"])
            .args(["-video_size", &format!("{}x{}", width, height)])
            .args(["-framerate", &format!("{}", fps)])
            .args(["-i", "-"])
            .args(["-c:v", "libx264"])
            .args(["-pix_fmt", "yuv420p"])
            .arg(output)
            .spawn()
            .map_err(Error::FfmpegSpawn)?;
        let stdin = process.stdin.take().ok_or(Error::FfmpegClosed)?;
        tracing::info!(output = %output.display(), width, height, fps, "recording started");
        Ok(Ffmpeg { process, stdin: Some(stdin) })
    }

    pub fn write(&mut self, image: &Image) -> Result<()> {
        let width = image.width().max(0) as usize;
        let height = image.height().max(0) as usize;
        let stdin = self.stdin.as_mut().ok_or(Error::FfmpegClosed)?;
        // SAFETY: framebuffer images are uncompressed RGBA8, width * height * 4 bytes
        let pixels = unsafe {
            std::slice::from_raw_parts(image.data() as *const u8, width * height * 4)
        };
        write_flipped(stdin, pixels, width, height).map_err(Error::FfmpegWrite)
    }
}

/// Writes RGBA rows bottom-up: raylib render textures are stored upside down.
pub fn write_flipped<W: Write>(out: &mut W, pixels: &[u8], width: usize, height: usize) -> std::io::Result<()> {
    let stride = width * 4;
    if stride == 0 {
        return Ok(());
    }
    for row in pixels.chunks_exact(stride).take(height).rev() {
        out.write_all(row)?;
    }
    Ok(())
}

impl Drop for Ffmpeg {
    fn drop(&mut self) {
        // Closing stdin lets ffmpeg finish the file
        self.stdin = None;
        match self.process.wait() {
            Ok(status) if status.success() => tracing::info!("recording finished"),
            Ok(status) => tracing::warn!(%status, "ffmpeg exited with an error"),
            Err(e) => tracing::warn!(error = %e, "failed to wait for ffmpeg"),
        }
    }
}
