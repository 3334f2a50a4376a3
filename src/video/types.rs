use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Encoder parameters for the final render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeParams {
    /// Output frame rate
    pub fps: f64,

    /// Video codec handed to ffmpeg (`-c:v`)
    pub video_codec: String,

    /// Audio codec handed to ffmpeg (`-c:a`)
    pub audio_codec: String,

    /// Video bitrate in kbit/s
    pub video_bitrate_kbps: u32,

    /// Audio bitrate in kbit/s
    pub audio_bitrate_kbps: u32,

    /// Encoder speed/quality preset
    pub preset: String,

    /// Pixel format of the output stream
    pub pixel_format: String,

    /// Sample rate every audio track is resampled to before concatenation
    pub audio_sample_rate: u32,

    /// Encoder threads
    pub threads: usize,
}

impl Default for EncodeParams {
    fn default() -> Self {
        Self {
            fps: 30.0,
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            video_bitrate_kbps: 4000,
            audio_bitrate_kbps: 192,
            preset: "medium".to_string(),
            pixel_format: "yuv420p".to_string(),
            audio_sample_rate: 44100,
            threads: num_cpus::get(),
        }
    }
}

impl EncodeParams {
    pub(crate) fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;

        if !(self.fps > 0.0) {
            return Err(ConfigError::InvalidValue {
                key: "output.fps".to_string(),
                value: self.fps.to_string(),
            }
            .into());
        }

        if self.video_bitrate_kbps == 0 || self.audio_bitrate_kbps == 0 {
            return Err(ConfigError::InvalidValue {
                key: "output.bitrate".to_string(),
                value: format!("{}k/{}k", self.video_bitrate_kbps, self.audio_bitrate_kbps),
            }
            .into());
        }

        if self.threads == 0 {
            return Err(ConfigError::InvalidValue {
                key: "output.threads".to_string(),
                value: self.threads.to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Whether a render keeps the audio tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioMode {
    WithAudio,
    Silent,
}

impl AudioMode {
    pub fn has_audio(self) -> bool {
        matches!(self, Self::WithAudio)
    }
}

/// One source video, normalized and ready to be placed on the timeline
#[derive(Debug, Clone, PartialEq)]
pub struct VideoSegment {
    /// Path to the source file
    pub path: PathBuf,

    /// 1-based position in the assembly order
    pub position: usize,

    /// Canvas the clip is force-resized to
    pub frame_size: (u32, u32),

    /// Duration reported by the probe (seconds)
    pub source_duration: f64,

    /// Duration kept after the tail trim (seconds)
    pub duration: f64,

    /// Whether the source carries its own audio stream
    pub has_audio: bool,
}

impl VideoSegment {
    /// File name for logs
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Whether the tail trim removed anything
    pub fn is_trimmed(&self) -> bool {
        self.duration < self.source_duration
    }
}

/// The rendered reel
#[derive(Debug, Clone)]
pub struct OutputArtifact {
    pub path: PathBuf,
    pub params: EncodeParams,
}

impl OutputArtifact {
    pub fn new<P: Into<PathBuf>>(path: P, params: EncodeParams) -> Self {
        Self {
            path: path.into(),
            params,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the rendered file, if it exists
    pub fn file_size(&self) -> Option<u64> {
        std::fs::metadata(&self.path).ok().map(|meta| meta.len())
    }

    /// A render only counts when the file exists and is not empty
    pub fn is_valid(&self) -> bool {
        self.file_size().map(|size| size > 0).unwrap_or(false)
    }
}
