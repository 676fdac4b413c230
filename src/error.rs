use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read directory {path:?}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read file {path:?}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image {path:?}: {reason}")]
    Decode { path: PathBuf, reason: String },
    #[error("failed to create texture for {path:?}: {reason}")]
    Texture { path: PathBuf, reason: String },
    #[error("failed to create render texture: {0}")]
    RenderTarget(String),
    #[error("failed to start ffmpeg: {0}")]
    FfmpegSpawn(#[source] std::io::Error),
    #[error("ffmpeg stdin is closed")]
    FfmpegClosed,
    #[error("failed to write frame to ffmpeg: {0}")]
    FfmpegWrite(#[source] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
