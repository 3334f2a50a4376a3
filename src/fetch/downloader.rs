use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::FetchConfig;
use crate::error::{FetchError, Result};
use crate::fetch::headers::RequestHeaders;

/// Fetches the media behind one link into a folder
#[async_trait]
pub trait Downloader: Send + Sync {
    async fn download(&self, url: &str, dest_dir: &Path, headers: &RequestHeaders) -> Result<()>;

    /// Program name shown when the downloader cannot be run
    fn program(&self) -> &str {
        "downloader"
    }

    async fn is_available(&self) -> bool {
        true
    }
}

/// Downloads through the `yt-dlp` program
pub struct YtDlpDownloader {
    program: String,
    format: String,
    output_template: String,
    cookie_file: PathBuf,
}

impl YtDlpDownloader {
    /// `cookie_file` is resolved against `work_dir`
    pub fn new(config: &FetchConfig, work_dir: &Path) -> Self {
        Self {
            program: config.downloader.clone(),
            format: config.format.clone(),
            output_template: config.output_template.clone(),
            cookie_file: work_dir.join(&config.cookie_file),
        }
    }

    pub fn build_args(&self, url: &str, dest_dir: &Path, headers: &RequestHeaders) -> Vec<String> {
        let mut args = vec![
            "-f".to_string(),
            self.format.clone(),
            "-o".to_string(),
            dest_dir.join(&self.output_template).display().to_string(),
            "--user-agent".to_string(),
            headers.user_agent.clone(),
        ];

        for (name, value) in headers.extra() {
            args.push("--add-header".to_string());
            args.push(format!("{}:{}", name, value));
        }

        if self.cookie_file.is_file() {
            args.push("--cookies".to_string());
            args.push(self.cookie_file.display().to_string());
        } else {
            warn!(
                "Cookie file {} not found, downloading without cookies",
                self.cookie_file.display()
            );
        }

        args.push("--".to_string());
        args.push(url.to_string());
        args
    }
}

#[async_trait]
impl Downloader for YtDlpDownloader {
    async fn download(&self, url: &str, dest_dir: &Path, headers: &RequestHeaders) -> Result<()> {
        let args = self.build_args(url, dest_dir, headers);
        debug!("{} {}", self.program, args.join(" "));

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    FetchError::DownloaderMissing {
                        program: self.program.clone(),
                    }
                } else {
                    FetchError::DownloadFailed {
                        url: url.to_string(),
                        reason: e.to_string(),
                    }
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FetchError::DownloadFailed {
                url: url.to_string(),
                reason: stderr.trim().lines().last().unwrap_or("unknown error").to_string(),
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
            .arg("--version")
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
    use tempfile::tempdir;

    #[test]
    fn test_args_without_cookie_file() {
        let work = tempdir().unwrap();
        let downloader = YtDlpDownloader::new(&FetchConfig::default(), work.path());
        let args = downloader.build_args(
            "https://www.instagram.com/reel/A/?s=1",
            Path::new("/dl/11-25"),
            &RequestHeaders::new("agent"),
        );

        assert_eq!(&args[..6], ["-f", "best", "-o", "/dl/11-25/%(title)s.%(ext)s", "--user-agent", "agent"]);
        assert!(!args.contains(&"--cookies".to_string()));
        assert_eq!(args.iter().filter(|a| *a == "--add-header").count(), 6);
        assert!(args.contains(&"Connection:keep-alive".to_string()));
        assert!(args.contains(&"Referer:https://www.instagram.com/".to_string()));
        assert_eq!(&args[args.len() - 2..], ["--", "https://www.instagram.com/reel/A/?s=1"]);
    }

    #[test]
    fn test_args_with_cookie_file() {
        let work = tempdir().unwrap();
        std::fs::write(work.path().join("cookies.txt"), "# Netscape HTTP Cookie File\n").unwrap();

        let downloader = YtDlpDownloader::new(&FetchConfig::default(), work.path());
        let args = downloader.build_args("u", Path::new("out"), &RequestHeaders::new("agent"));

        let at = args.iter().position(|a| a == "--cookies").unwrap();
        assert_eq!(args[at + 1], work.path().join("cookies.txt").display().to_string());
    }

    #[tokio::test]
    async fn test_missing_program_is_reported() {
        let work = tempdir().unwrap();
        let config = FetchConfig {
            downloader: "reel-stitch-no-such-downloader".to_string(),
            ..FetchConfig::default()
        };
        let downloader = YtDlpDownloader::new(&config, work.path());

        assert!(!downloader.is_available().await);
        assert_eq!(downloader.program(), "reel-stitch-no-such-downloader");

        let err = downloader
            .download("u", work.path(), &RequestHeaders::new("agent"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::StitchError::Fetch(FetchError::DownloaderMissing { .. })
        ));
    }
}
