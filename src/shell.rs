//! Front-end operations shared by the command line tools.
//!
//! Every operation ends in a [`Status`]: a success flag plus a message meant
//! for the person who asked. Errors never escape this layer.

use std::fmt;
use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use tracing::{error, info, warn};

use crate::{
    assembly::{AssemblyOrder, AssemblyPipeline, AssemblyRequest, Reporter, SegmentSource, TracingReporter},
    cards::ColorScheme,
    config::Config,
    error::Result,
    fetch::{Fetcher, YtDlpDownloader},
    links::{extract_links, SUPPORTED_FORMATS},
};

/// Human readable result of a front-end operation
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub success: bool,
    pub message: String,
}

impl Status {
    pub fn ok<S: Into<String>>(message: S) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed<S: Into<String>>(message: S) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Parameters of a merge
#[derive(Debug, Clone, Default)]
pub struct MergeParams {
    pub input_dir: PathBuf,
    /// Explicit clip order; relative names are resolved against `input_dir`
    pub order: Option<Vec<String>>,
    pub first: Option<String>,
    pub output: Option<PathBuf>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub color_scheme: Option<ColorScheme>,
}

impl MergeParams {
    pub fn new<P: Into<PathBuf>>(input_dir: P) -> Self {
        Self {
            input_dir: input_dir.into(),
            ..Self::default()
        }
    }

    fn source(&self) -> SegmentSource {
        match &self.order {
            Some(names) if !names.is_empty() => SegmentSource::Explicit(
                names
                    .iter()
                    .map(|name| {
                        let path = Path::new(name);
                        if path.is_absolute() {
                            path.to_path_buf()
                        } else {
                            self.input_dir.join(path)
                        }
                    })
                    .collect(),
            ),
            _ => SegmentSource::Directory(self.input_dir.clone()),
        }
    }
}

/// Folder downloads land in when none is given: the link file's stem
pub fn default_download_folder(input: &str) -> PathBuf {
    let path = Path::new(input.trim());
    if path.is_file() {
        if let Some(stem) = path.file_stem() {
            return PathBuf::from(stem);
        }
    }
    PathBuf::from("downloads")
}

fn no_links_message() -> String {
    let mut message = String::from("No valid Instagram links found. Supported formats:");
    for format in SUPPORTED_FORMATS {
        message.push_str("\n  - ");
        message.push_str(format);
    }
    message
}

/// Entry point for downloads and merges
pub struct Shell {
    config: Config,
    work_dir: PathBuf,
    fetcher: Fetcher,
    pipeline: AssemblyPipeline,
    reporter: Box<dyn Reporter>,
}

impl Shell {
    /// Shell backed by yt-dlp, ffprobe and ffmpeg
    pub fn new(config: Config, work_dir: PathBuf) -> Self {
        let downloader = YtDlpDownloader::new(&config.fetch, &work_dir);
        let fetcher = Fetcher::new(config.fetch.clone(), Box::new(downloader));
        let pipeline = AssemblyPipeline::new(config.clone());
        Self::with_parts(config, work_dir, fetcher, pipeline)
    }

    pub fn with_parts(config: Config, work_dir: PathBuf, fetcher: Fetcher, pipeline: AssemblyPipeline) -> Self {
        Self {
            config,
            work_dir,
            fetcher,
            pipeline,
            reporter: Box::new(TracingReporter),
        }
    }

    pub fn with_reporter(mut self, reporter: Box<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Extract links from `links` (text or link file) and download them
    pub async fn download_only(&self, links: &str, folder: Option<&Path>, shuffle: bool) -> Status {
        let mut urls = extract_links(links);
        if urls.is_empty() {
            warn!("No links recognized in input");
            return Status::failed(no_links_message());
        }

        if shuffle {
            urls.shuffle(&mut rand::thread_rng());
            info!("🔀 Shuffled {} links", urls.len());
        }

        if let Err(e) = self.fetcher.preflight().await {
            error!("{}", e);
            return Status::failed(format!("Download failed: {}", e.user_message()));
        }

        let folder = folder
            .map(Path::to_path_buf)
            .unwrap_or_else(|| default_download_folder(links));

        match self.fetcher.fetch_all(&urls, &folder).await {
            Ok(report) if report.succeeded.is_empty() => Status::failed(format!(
                "None of the {} downloads succeeded; see the log for details.",
                report.attempted
            )),
            Ok(report) => {
                let mut message = format!(
                    "Download finished: {}/{} videos saved to {}",
                    report.succeeded.len(),
                    report.attempted,
                    folder.display()
                );
                for url in &report.failed {
                    message.push_str(&format!("\n  failed: {}", url));
                }
                Status::ok(message)
            }
            Err(e) => {
                error!("Download failed: {}", e);
                Status::failed(format!("Download failed: {}", e.user_message()))
            }
        }
    }

    /// Merge the videos of a folder (or an explicit list) into one reel
    pub async fn merge_only(&self, params: &MergeParams) -> Status {
        if let Err(e) = self.pipeline.preflight().await {
            error!("{}", e);
            return Status::failed(format!("Merge failed: {}", e.user_message()));
        }

        let request = AssemblyRequest::new(params.source())
            .with_first(params.first.clone())
            .with_output(params.output.clone())
            .with_title(params.title.clone())
            .with_author(params.author.clone())
            .with_color_scheme(params.color_scheme)
            .with_work_dir(&self.work_dir);

        match self.pipeline.run(&request, self.reporter.as_ref()).await {
            Ok(outcome) => {
                let mut message = format!(
                    "Merge finished: {} videos saved to {}",
                    outcome.segments,
                    outcome.artifact.path().display()
                );
                if !outcome.audio.has_audio() {
                    message.push_str(" (without audio)");
                }
                Status::ok(message)
            }
            Err(e) => Status::failed(format!("Merge failed: {}", e.user_message())),
        }
    }

    /// Download into `params.input_dir`, then merge that folder
    pub async fn download_and_merge(&self, links: &str, shuffle: bool, params: &MergeParams) -> Status {
        // check the merge tools before spending time on downloads
        if let Err(e) = self.pipeline.preflight().await {
            error!("{}", e);
            return Status::failed(format!("Merge failed: {}", e.user_message()));
        }

        let download = self.download_only(links, Some(&params.input_dir), shuffle).await;
        if !download.success {
            return download;
        }
        info!("{}", download.message);

        self.merge_only(params).await
    }

    /// Videos of `folder` in the order a merge would use
    pub fn list_videos(&self, folder: &Path) -> Result<Vec<PathBuf>> {
        let order = AssemblyOrder::scan(folder, &self.config.assembly.extensions)?;
        Ok(order.files().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assembly::Timeline,
        config::DelayRange,
        error::{FetchError, VideoError},
        fetch::{Downloader, RequestHeaders},
        video::{AudioMode, MediaInfo, MediaProbe, OutputArtifact, Renderer},
    };
    use async_trait::async_trait;
    use tempfile::tempdir;

    /// Writes a placeholder clip per link, or fails for links containing "private"
    struct FileDownloader;

    #[async_trait]
    impl Downloader for FileDownloader {
        async fn download(&self, url: &str, dest_dir: &Path, _headers: &RequestHeaders) -> Result<()> {
            if url.contains("private") {
                return Err(FetchError::DownloadFailed {
                    url: url.to_string(),
                    reason: "private".to_string(),
                }
                .into());
            }
            let id = url.split('/').nth(4).unwrap_or("clip");
            std::fs::write(dest_dir.join(format!("{}.mp4", id)), b"clip")?;
            Ok(())
        }
    }

    /// Stands in for a machine without yt-dlp
    struct AbsentDownloader;

    #[async_trait]
    impl Downloader for AbsentDownloader {
        async fn download(&self, _url: &str, _dest_dir: &Path, _headers: &RequestHeaders) -> Result<()> {
            Err(FetchError::DownloaderMissing { program: "yt-dlp".into() }.into())
        }

        fn program(&self) -> &str {
            "yt-dlp"
        }

        async fn is_available(&self) -> bool {
            false
        }
    }

    struct FixedProbe;

    #[async_trait]
    impl MediaProbe for FixedProbe {
        async fn probe(&self, _path: &Path) -> Result<MediaInfo> {
            Ok(MediaInfo {
                duration: 2.0,
                width: 720,
                height: 1280,
                has_audio: true,
            })
        }
    }

    struct FileRenderer {
        fail_with_audio: bool,
        installed: bool,
    }

    #[async_trait]
    impl Renderer for FileRenderer {
        async fn render(&self, _timeline: &Timeline, output: &OutputArtifact, mode: AudioMode) -> Result<()> {
            if self.fail_with_audio && mode.has_audio() {
                return Err(VideoError::EncodingFailed { reason: "aac".into() }.into());
            }
            std::fs::write(output.path(), b"reel")?;
            Ok(())
        }

        fn program(&self) -> &str {
            "ffmpeg"
        }

        async fn is_available(&self) -> bool {
            self.installed
        }
    }

    fn shell(work_dir: &Path, fail_with_audio: bool) -> Shell {
        shell_with(work_dir, Box::new(FileDownloader), FileRenderer { fail_with_audio, installed: true })
    }

    fn shell_with(work_dir: &Path, downloader: Box<dyn Downloader>, renderer: FileRenderer) -> Shell {
        let mut config = Config::default();
        config.fetch.delay = DelayRange::new(0.0, 0.0);
        config.fetch.penalty = DelayRange::new(0.0, 0.0);
        config.cards.number_fonts.clear();
        config.cards.title_fonts.clear();
        config.cards.byline_fonts.clear();
        config.cards.closing_fonts.clear();

        let fetcher = Fetcher::with_seed(config.fetch.clone(), downloader, 3);
        let pipeline = AssemblyPipeline::with_backends(config.clone(), Box::new(FixedProbe), Box::new(renderer));
        Shell::with_parts(config, work_dir.to_path_buf(), fetcher, pipeline)
    }

    #[tokio::test]
    async fn test_download_without_links_lists_formats() {
        let dir = tempdir().unwrap();
        let status = shell(dir.path(), false)
            .download_only("no links here", Some(dir.path()), false)
            .await;

        assert!(!status.success);
        assert!(status.message.contains("/reel/"));
        assert!(status.message.contains("/tv/"));
    }

    #[tokio::test]
    async fn test_download_reports_partial_failures() {
        let dir = tempdir().unwrap();
        let folder = dir.path().join("batch");
        let links = "https://www.instagram.com/reel/A1/?s=1\nhttps://www.instagram.com/reel/private/?s=1";

        let status = shell(dir.path(), false)
            .download_only(links, Some(&folder), true)
            .await;

        assert!(status.success);
        assert!(status.message.contains("1/2"));
        assert!(status.message.contains("private"));
        assert!(folder.join("A1.mp4").exists());
    }

    #[tokio::test]
    async fn test_download_and_merge() {
        let dir = tempdir().unwrap();
        let work = tempdir().unwrap();
        let folder = dir.path().join("11-25");
        let output = dir.path().join("reel.mp4");
        let links = "https://www.instagram.com/reel/B2/?s=1 https://www.instagram.com/reel/A1/?s=1";

        let params = MergeParams {
            output: Some(output.clone()),
            title: Some("Best Of".into()),
            ..MergeParams::new(&folder)
        };
        let shell = shell(work.path(), false);
        let status = shell.download_and_merge(links, false, &params).await;

        assert!(status.success, "{}", status.message);
        assert!(status.message.contains("2 videos"));
        assert!(output.exists());

        let names: Vec<String> = shell
            .list_videos(&folder)
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["A1.mp4", "B2.mp4"]);
    }

    #[tokio::test]
    async fn test_merge_with_explicit_order_and_silent_fallback() {
        let dir = tempdir().unwrap();
        let work = tempdir().unwrap();
        for name in ["a.mp4", "b.mp4"] {
            std::fs::write(dir.path().join(name), b"clip").unwrap();
        }

        let params = MergeParams {
            order: Some(vec!["b.mp4".into(), "a.mp4".into()]),
            output: Some(dir.path().join("out.mp4")),
            ..MergeParams::new(dir.path())
        };
        let status = shell(work.path(), true).merge_only(&params).await;

        assert!(status.success, "{}", status.message);
        assert!(status.message.contains("without audio"));
    }

    #[tokio::test]
    async fn test_merge_missing_folder_fails_with_message() {
        let dir = tempdir().unwrap();
        let params = MergeParams::new(dir.path().join("missing"));
        let status = shell(dir.path(), false).merge_only(&params).await;

        assert!(!status.success);
        assert!(status.message.contains("does not exist"));
    }

    #[tokio::test]
    async fn test_missing_downloader_fails_before_any_download() {
        let dir = tempdir().unwrap();
        let folder = dir.path().join("batch");
        let renderer = FileRenderer { fail_with_audio: false, installed: true };

        let status = shell_with(dir.path(), Box::new(AbsentDownloader), renderer)
            .download_only("https://www.instagram.com/reel/A1/?s=1", Some(&folder), false)
            .await;

        assert!(!status.success);
        assert!(status.message.contains("'yt-dlp' was not found"));
        assert!(!folder.exists());
    }

    #[tokio::test]
    async fn test_missing_ffmpeg_fails_before_downloading() {
        let dir = tempdir().unwrap();
        let work = tempdir().unwrap();
        let folder = dir.path().join("11-25");
        let renderer = FileRenderer { fail_with_audio: false, installed: false };
        let shell = shell_with(work.path(), Box::new(FileDownloader), renderer);

        let status = shell
            .download_and_merge("https://www.instagram.com/reel/A1/?s=1", false, &MergeParams::new(&folder))
            .await;

        assert!(!status.success);
        assert!(status.message.contains("'ffmpeg' was not found"));
        assert!(!folder.exists());
    }

    #[test]
    fn test_default_download_folder() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("11-25.txt");
        std::fs::write(&file, "").unwrap();

        assert_eq!(default_download_folder(&file.display().to_string()), PathBuf::from("11-25"));
        assert_eq!(
            default_download_folder("https://www.instagram.com/reel/A/?s=1"),
            PathBuf::from("downloads")
        );
    }
}
