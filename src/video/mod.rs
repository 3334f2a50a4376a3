//! # Video Module
//!
//! Probes source clips and encodes the finished timeline through ffmpeg.

pub mod encoder;
pub mod probe;
pub mod types;

pub use encoder::{FfmpegRenderer, Renderer};
pub use probe::{FfprobeProbe, MediaInfo, MediaProbe};
pub use types::{AudioMode, EncodeParams, OutputArtifact, VideoSegment};
