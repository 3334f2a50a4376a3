use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::{
    assembly::{
        order::{AssemblyOrder, SegmentSource},
        report::{Reporter, RunState},
        resources::ResourceScope,
        timeline::Timeline,
    },
    cards::{card_image_path, CardRenderer, CardSpec, ColorScheme},
    config::Config,
    error::{AssemblyError, Result, VideoError},
    video::{AudioMode, FfmpegRenderer, FfprobeProbe, MediaProbe, OutputArtifact, Renderer, VideoSegment},
};

/// Parameters of one assembly run
#[derive(Debug, Clone)]
pub struct AssemblyRequest {
    pub source: SegmentSource,
    /// File name (or path) of the clip that opens the reel
    pub first: Option<String>,
    /// Defaults to `<MM-DD>_merged.mp4` in the input folder
    pub output: Option<PathBuf>,
    pub title: Option<String>,
    pub author: Option<String>,
    /// Overrides the configured scheme
    pub color_scheme: Option<ColorScheme>,
    /// Where card images and the sound cue live
    pub work_dir: PathBuf,
    /// `MM-DD` stamp used on the first card and in the default output name
    pub date_stamp: String,
}

impl AssemblyRequest {
    pub fn new(source: SegmentSource) -> Self {
        Self {
            source,
            first: None,
            output: None,
            title: None,
            author: None,
            color_scheme: None,
            work_dir: PathBuf::from("."),
            date_stamp: chrono::Local::now().format("%m-%d").to_string(),
        }
    }

    pub fn from_dir<P: Into<PathBuf>>(dir: P) -> Self {
        Self::new(SegmentSource::Directory(dir.into()))
    }

    pub fn with_first(mut self, first: Option<String>) -> Self {
        self.first = first.filter(|f| !f.trim().is_empty());
        self
    }

    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        self.output = output;
        self
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn with_author(mut self, author: Option<String>) -> Self {
        self.author = author;
        self
    }

    pub fn with_color_scheme(mut self, scheme: Option<ColorScheme>) -> Self {
        self.color_scheme = scheme;
        self
    }

    pub fn with_work_dir<P: Into<PathBuf>>(mut self, work_dir: P) -> Self {
        self.work_dir = work_dir.into();
        self
    }

    pub fn with_date_stamp<S: Into<String>>(mut self, date_stamp: S) -> Self {
        self.date_stamp = date_stamp.into();
        self
    }

    /// Where the reel will be written
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.source.base_dir().join(format!("{}_merged.mp4", self.date_stamp)))
    }
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct AssemblyOutcome {
    pub artifact: OutputArtifact,
    /// Number of source videos
    pub segments: usize,
    /// Number of concatenated units (cards included)
    pub clip_units: usize,
    /// Playing time of the reel
    pub duration: f64,
    /// Whether the audio-preserving render succeeded or the silent fallback was used
    pub audio: AudioMode,
}

/// Orders clips, interleaves transition cards and renders the reel
///
/// The pipeline follows a fixed sequence:
/// 1. Resolve the clip order (folder scan or explicit list, optional first clip)
/// 2. Render one numbered card per clip and probe the clip itself
/// 3. Append the closing card
/// 4. Render with audio, falling back to a silent render once
/// 5. Verify the output and remove every card image
pub struct AssemblyPipeline {
    config: Config,
    probe: Box<dyn MediaProbe>,
    renderer: Box<dyn Renderer>,
}

impl AssemblyPipeline {
    /// Pipeline backed by `ffprobe` and `ffmpeg`
    pub fn new(config: Config) -> Self {
        Self::with_backends(config, Box::new(FfprobeProbe::new()), Box::new(FfmpegRenderer::new()))
    }

    pub fn with_backends(config: Config, probe: Box<dyn MediaProbe>, renderer: Box<dyn Renderer>) -> Self {
        Self { config, probe, renderer }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fail early when the probe or the renderer program cannot be run
    pub async fn preflight(&self) -> Result<()> {
        if !self.probe.is_available().await {
            return Err(VideoError::ToolMissing {
                program: self.probe.program().to_string(),
            }
            .into());
        }
        if !self.renderer.is_available().await {
            return Err(VideoError::ToolMissing {
                program: self.renderer.program().to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Run the whole assembly; card images are removed whatever the outcome
    pub async fn run(&self, request: &AssemblyRequest, reporter: &dyn Reporter) -> Result<AssemblyOutcome> {
        reporter.transition(&RunState::Idle);
        info!("🎬 Starting reel assembly");
        info!("   Output: {}", request.output_path().display());
        info!("   Work dir: {}", request.work_dir.display());

        let mut scope = ResourceScope::new();
        let result = self.execute(request, reporter, &mut scope).await;

        reporter.transition(&RunState::Cleanup);
        debug!("Removing {} card images", scope.tracked().len());
        scope.release();

        match &result {
            Ok(outcome) => {
                reporter.transition(&RunState::Done);
                info!(
                    "🎉 Reel complete: {} ({} videos, {:.1}s)",
                    outcome.artifact.path().display(),
                    outcome.segments,
                    outcome.duration
                );
            }
            Err(e) => {
                error!("Assembly failed: {}", e);
                reporter.transition(&RunState::Failed);
            }
        }

        result
    }

    async fn execute(
        &self,
        request: &AssemblyRequest,
        reporter: &dyn Reporter,
        scope: &mut ResourceScope,
    ) -> Result<AssemblyOutcome> {
        // Step 1: clip order
        reporter.transition(&RunState::Scanning);
        let order = self.resolve_order(request)?;
        let total = order.len();
        reporter.note(&format!("{} videos to merge", total));

        let output_path = request.output_path();
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::create_dir_all(&request.work_dir)?;

        // Step 2: cards and clips
        let canvas = self.config.assembly.canvas;
        let scheme = request.color_scheme.unwrap_or(self.config.cards.color_scheme);
        let cards = CardRenderer::new(&self.config.cards, canvas, scheme, &request.work_dir);
        let mut timeline = Timeline::new(canvas);

        for (index, path) in order.files().iter().enumerate() {
            let position = index + 1;
            reporter.transition(&RunState::ProcessingSegment { index: position, total });

            let mut spec = CardSpec::numbered(position, request.date_stamp.as_str());
            if position == 1 {
                if let Some(title) = &request.title {
                    spec = spec.with_title(title.as_str());
                }
                spec = spec.with_author(request.author.clone());
            }

            scope.track(card_image_path(&request.work_dir, position));
            let card = cards.render(&spec)?;
            let segment = self.load_segment(path, position).await?;

            timeline.push_card(card);
            timeline.push_video(segment);
        }

        // Step 3: closing card
        let closing = total + 1;
        scope.track(card_image_path(&request.work_dir, closing));
        timeline.push_card(cards.render(&CardSpec::closing(closing))?);

        reporter.transition(&RunState::Concatenating);
        debug!(
            "Timeline: {} units, {:.2}s, well formed: {}",
            timeline.len(),
            timeline.total_duration(),
            timeline.is_well_formed()
        );

        // Step 4: render
        let artifact = OutputArtifact::new(output_path, self.config.output.clone());
        let audio = self.render_with_fallback(&timeline, &artifact, reporter).await?;

        // Step 5: verify
        if !artifact.is_valid() {
            return Err(VideoError::EmptyOutput {
                path: artifact.path().display().to_string(),
            }
            .into());
        }

        if let Some(size) = artifact.file_size() {
            reporter.note(&format!("wrote {} ({:.1} MB)", artifact.path().display(), size as f64 / 1_048_576.0));
        }

        Ok(AssemblyOutcome {
            segments: total,
            clip_units: timeline.len(),
            duration: timeline.total_duration(),
            audio,
            artifact,
        })
    }

    fn resolve_order(&self, request: &AssemblyRequest) -> Result<AssemblyOrder> {
        let mut order = AssemblyOrder::resolve(&request.source, &self.config.assembly.extensions)?
            .without(&request.output_path());

        if order.is_empty() {
            return Err(AssemblyError::NoVideosFound {
                path: request.source.base_dir().display().to_string(),
            }
            .into());
        }

        if let Some(first) = &request.first {
            order = order.with_first(first)?;
        }

        for (index, file) in order.files().iter().enumerate() {
            debug!("   {:02} - {}", index + 1, file.display());
        }

        Ok(order)
    }

    async fn load_segment(&self, path: &Path, position: usize) -> Result<VideoSegment> {
        let info = self.probe.probe(path).await?;

        if !(info.duration > 0.0) {
            return Err(VideoError::InvalidDuration {
                path: path.display().to_string(),
                duration: info.duration,
            }
            .into());
        }

        let segment = VideoSegment {
            path: path.to_path_buf(),
            position,
            frame_size: self.config.assembly.canvas,
            source_duration: info.duration,
            duration: self.config.assembly.trimmed_duration(info.duration),
            has_audio: info.has_audio,
        };

        info!(
            "   {} - {}: {:.2}s -> {:.2}s{}",
            position,
            segment.name(),
            segment.source_duration,
            segment.duration,
            if segment.has_audio { "" } else { " (no audio)" }
        );

        Ok(segment)
    }

    /// Render with audio; on failure render once more without it
    async fn render_with_fallback(
        &self,
        timeline: &Timeline,
        artifact: &OutputArtifact,
        reporter: &dyn Reporter,
    ) -> Result<AudioMode> {
        reporter.transition(&RunState::Rendering { with_audio: true });
        let primary = match self.renderer.render(timeline, artifact, AudioMode::WithAudio).await {
            Ok(()) => return Ok(AudioMode::WithAudio),
            Err(e) => e,
        };

        warn!("Render with audio failed: {}", primary);
        reporter.note("retrying without audio");
        reporter.transition(&RunState::Rendering { with_audio: false });

        match self.renderer.render(timeline, artifact, AudioMode::Silent).await {
            Ok(()) => Ok(AudioMode::Silent),
            Err(fallback) => Err(VideoError::FallbackFailed {
                primary: primary.to_string(),
                fallback: fallback.to_string(),
            }
            .into()),
        }
    }
}
