use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::assembly::timeline::{ClipUnit, Timeline};
use crate::cards::{CardAudio, CardClip};
use crate::error::{Result, VideoError};
use crate::video::types::{AudioMode, EncodeParams, OutputArtifact, VideoSegment};

/// Concatenates a timeline into a single encoded file
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, timeline: &Timeline, output: &OutputArtifact, mode: AudioMode) -> Result<()>;

    /// Program name shown when the renderer cannot be run
    fn program(&self) -> &str {
        "renderer"
    }

    async fn is_available(&self) -> bool {
        true
    }
}

/// `ffmpeg`-backed renderer using a single concat filter graph
pub struct FfmpegRenderer {
    program: String,
}

/// Inputs and filter chains accumulated while walking the timeline
struct GraphBuilder<'a> {
    params: &'a EncodeParams,
    canvas: (u32, u32),
    mode: AudioMode,
    inputs: Vec<String>,
    filters: Vec<String>,
    concat_pads: String,
    next_input: usize,
}

impl<'a> GraphBuilder<'a> {
    fn new(params: &'a EncodeParams, canvas: (u32, u32), mode: AudioMode) -> Self {
        Self {
            params,
            canvas,
            mode,
            inputs: Vec::new(),
            filters: Vec::new(),
            concat_pads: String::new(),
            next_input: 0,
        }
    }

    fn add_input<I, S>(&mut self, args: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs.extend(args.into_iter().map(Into::into));
        let index = self.next_input;
        self.next_input += 1;
        index
    }

    fn silence_input(&mut self, duration: f64) -> usize {
        let source = format!(
            "anullsrc=channel_layout=stereo:sample_rate={}",
            self.params.audio_sample_rate
        );
        self.add_input(["-f".to_string(), "lavfi".to_string(), "-t".to_string(), seconds(duration), "-i".to_string(), source])
    }

    fn video_chain(&mut self, input: usize, unit: usize, duration: f64) {
        let (width, height) = self.canvas;
        self.filters.push(format!(
            "[{input}:v:0]scale={width}:{height},setsar=1,fps={fps},format={pix},trim=duration={d},setpts=PTS-STARTPTS[v{unit}]",
            fps = self.params.fps,
            pix = self.params.pixel_format,
            d = seconds(duration),
        ));
    }

    fn audio_chain(&mut self, input: usize, unit: usize, duration: f64) {
        self.filters.push(format!(
            "[{input}:a:0]apad,atrim=duration={d},asetpts=PTS-STARTPTS,aresample={rate},aformat=sample_fmts=fltp:channel_layouts=stereo[a{unit}]",
            d = seconds(duration),
            rate = self.params.audio_sample_rate,
        ));
    }

    fn pads(&mut self, unit: usize) {
        self.concat_pads.push_str(&format!("[v{}]", unit));
        if self.mode.has_audio() {
            self.concat_pads.push_str(&format!("[a{}]", unit));
        }
    }

    fn add_card(&mut self, unit: usize, card: &CardClip) {
        let image = self.add_input([
            "-loop".to_string(),
            "1".to_string(),
            "-framerate".to_string(),
            self.params.fps.to_string(),
            "-t".to_string(),
            seconds(card.duration),
            "-i".to_string(),
            card.image_path.display().to_string(),
        ]);
        self.video_chain(image, unit, card.duration);

        if self.mode.has_audio() {
            let audio = match &card.audio {
                CardAudio::Cue(path) => self.add_input(["-i".to_string(), path.display().to_string()]),
                CardAudio::Silence => self.silence_input(card.duration),
            };
            self.audio_chain(audio, unit, card.duration);
        }

        self.pads(unit);
    }

    fn add_segment(&mut self, unit: usize, segment: &VideoSegment) {
        let input = self.add_input(["-i".to_string(), segment.path.display().to_string()]);
        self.video_chain(input, unit, segment.duration);

        if self.mode.has_audio() {
            let audio = if segment.has_audio {
                input
            } else {
                self.silence_input(segment.duration)
            };
            self.audio_chain(audio, unit, segment.duration);
        }

        self.pads(unit);
    }

    fn finish(mut self, count: usize, output: &OutputArtifact) -> Vec<String> {
        let audio_streams = if self.mode.has_audio() { 1 } else { 0 };
        let concat = format!(
            "{}concat=n={}:v=1:a={}[outv]{}",
            self.concat_pads,
            count,
            audio_streams,
            if self.mode.has_audio() { "[outa]" } else { "" }
        );
        self.filters.push(concat);

        let params = self.params;
        let mut args: Vec<String> = ["-y", "-hide_banner", "-loglevel", "error"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        args.append(&mut self.inputs);
        args.push("-filter_complex".to_string());
        args.push(self.filters.join(";"));
        args.extend(["-map".to_string(), "[outv]".to_string()]);
        if self.mode.has_audio() {
            args.extend(["-map".to_string(), "[outa]".to_string()]);
        }

        args.extend([
            "-c:v".to_string(),
            params.video_codec.clone(),
            "-preset".to_string(),
            params.preset.clone(),
            "-b:v".to_string(),
            format!("{}k", params.video_bitrate_kbps),
            "-r".to_string(),
            params.fps.to_string(),
            "-pix_fmt".to_string(),
            params.pixel_format.clone(),
            "-threads".to_string(),
            params.threads.to_string(),
        ]);

        match self.mode {
            AudioMode::WithAudio => args.extend([
                "-c:a".to_string(),
                params.audio_codec.clone(),
                "-b:a".to_string(),
                format!("{}k", params.audio_bitrate_kbps),
            ]),
            AudioMode::Silent => args.push("-an".to_string()),
        }

        args.extend([
            "-movflags".to_string(),
            "+faststart".to_string(),
            output.path.display().to_string(),
        ]);
        args
    }
}

fn seconds(value: f64) -> String {
    format!("{:.3}", value)
}

impl FfmpegRenderer {
    pub fn new() -> Self {
        Self::with_program("ffmpeg")
    }

    pub fn with_program<S: Into<String>>(program: S) -> Self {
        Self { program: program.into() }
    }

    /// Full ffmpeg argument list for one render attempt
    pub fn build_args(timeline: &Timeline, output: &OutputArtifact, mode: AudioMode) -> Vec<String> {
        let mut graph = GraphBuilder::new(&output.params, timeline.canvas(), mode);

        for (unit, clip) in timeline.units().iter().enumerate() {
            match clip {
                ClipUnit::Card(card) => graph.add_card(unit, card),
                ClipUnit::Video(segment) => graph.add_segment(unit, segment),
            }
        }

        graph.finish(timeline.len(), output)
    }
}

impl Default for FfmpegRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Renderer for FfmpegRenderer {
    async fn render(&self, timeline: &Timeline, output: &OutputArtifact, mode: AudioMode) -> Result<()> {
        if timeline.is_empty() {
            return Err(VideoError::EncodingFailed {
                reason: "nothing to render".to_string(),
            }
            .into());
        }

        let args = Self::build_args(timeline, output, mode);
        info!(
            "🎞️  Encoding {} clips ({:.1}s) to {} {}",
            timeline.len(),
            timeline.total_duration(),
            output.path.display(),
            if mode.has_audio() { "with audio" } else { "without audio" }
        );
        debug!("{} {}", self.program, args.join(" "));

        let result = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| VideoError::EncodingFailed {
                reason: format!("Failed to spawn {}: {}", self.program, e),
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(VideoError::EncodingFailed {
                reason: format!("{} exited with {}: {}", self.program, result.status, stderr.trim()),
            }
            .into());
        }

        Ok(())
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
