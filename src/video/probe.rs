use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{Result, VideoError};

/// What the pipeline needs to know about a source video
#[derive(Debug, Clone, PartialEq)]
pub struct MediaInfo {
    pub duration: f64,
    pub width: u32,
    pub height: u32,
    pub has_audio: bool,
}

/// Reads stream information from a media file
#[async_trait]
pub trait MediaProbe: Send + Sync {
    async fn probe(&self, path: &Path) -> Result<MediaInfo>;

    /// Program name shown when the probe cannot be run
    fn program(&self) -> &str {
        "probe"
    }

    async fn is_available(&self) -> bool {
        true
    }
}

/// `ffprobe`-backed probe
pub struct FfprobeProbe {
    program: String,
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

impl FfprobeProbe {
    pub fn new() -> Self {
        Self::with_program("ffprobe")
    }

    pub fn with_program<S: Into<String>>(program: S) -> Self {
        Self { program: program.into() }
    }

    /// Turn ffprobe's JSON into [`MediaInfo`]
    ///
    /// A missing duration is reported as `0.0`; deciding whether that is
    /// acceptable is up to the caller.
    pub fn parse_output(json: &str) -> Option<MediaInfo> {
        let output: ProbeOutput = serde_json::from_str(json).ok()?;

        let video = output
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"));
        let has_audio = output
            .streams
            .iter()
            .any(|s| s.codec_type.as_deref() == Some("audio"));

        let parse = |value: &Option<String>| value.as_deref().and_then(|v| v.trim().parse::<f64>().ok());
        let duration = output
            .format
            .as_ref()
            .and_then(|f| parse(&f.duration))
            .or_else(|| video.and_then(|v| parse(&v.duration)))
            .unwrap_or(0.0);

        Some(MediaInfo {
            duration,
            width: video.and_then(|v| v.width).unwrap_or(0),
            height: video.and_then(|v| v.height).unwrap_or(0),
            has_audio,
        })
    }
}

impl Default for FfprobeProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaProbe for FfprobeProbe {
    async fn probe(&self, path: &Path) -> Result<MediaInfo> {
        let output = Command::new(&self.program)
            .args(["-v", "quiet", "-print_format", "json", "-show_format", "-show_streams"])
            .arg(path)
            .output()
            .await
            .map_err(|e| {
                warn!("Could not run {}: {}", self.program, e);
                if e.kind() == std::io::ErrorKind::NotFound {
                    VideoError::ToolMissing { program: self.program.clone() }
                } else {
                    VideoError::ProbeFailed { path: path.display().to_string() }
                }
            })?;

        if !output.status.success() {
            return Err(VideoError::ProbeFailed { path: path.display().to_string() }.into());
        }

        let json = String::from_utf8_lossy(&output.stdout);
        let info = Self::parse_output(&json)
            .ok_or_else(|| VideoError::ProbeFailed { path: path.display().to_string() })?;

        debug!(
            "Probed {}: {}x{}, {:.2}s, audio: {}",
            path.display(),
            info.width,
            info.height,
            info.duration,
            info.has_audio
        );
        Ok(info)
    }

    fn program(&self) -> &str {
        &self.program
    }

    async fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|status| status.success())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_video_with_audio() {
        let json = r#"{
            "streams": [
                {"codec_type": "video", "width": 1080, "height": 1920, "duration": "12.480000"},
                {"codec_type": "audio", "duration": "12.500000"}
            ],
            "format": {"duration": "12.500000"}
        }"#;

        let info = FfprobeProbe::parse_output(json).unwrap();
        assert_eq!(info.width, 1080);
        assert_eq!(info.height, 1920);
        assert_eq!(info.duration, 12.5);
        assert!(info.has_audio);
    }

    #[test]
    fn test_parse_falls_back_to_stream_duration() {
        let json = r#"{
            "streams": [{"codec_type": "video", "width": 720, "height": 1280, "duration": "3.0"}],
            "format": {}
        }"#;

        let info = FfprobeProbe::parse_output(json).unwrap();
        assert_eq!(info.duration, 3.0);
        assert!(!info.has_audio);
    }

    #[test]
    fn test_parse_missing_duration_is_zero() {
        let info = FfprobeProbe::parse_output(r#"{"streams": []}"#).unwrap();
        assert_eq!(info.duration, 0.0);
        assert!(FfprobeProbe::parse_output("not json").is_none());
    }

    #[tokio::test]
    async fn test_missing_program() {
        let probe = FfprobeProbe::with_program("reel-stitch-no-such-ffprobe");
        assert!(!probe.is_available().await);

        let err = probe.probe(Path::new("clip.mp4")).await.unwrap_err();
        assert!(matches!(
            err,
            crate::error::StitchError::Video(VideoError::ToolMissing { .. })
        ));
    }
}
