use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use rand::{rngs::SmallRng, Rng, SeedableRng};
use tracing::{error, info, warn};

use crate::config::{DelayRange, FetchConfig};
use crate::error::{FetchError, Result};
use crate::fetch::downloader::Downloader;
use crate::fetch::headers::RequestHeaders;

/// Outcome of a download batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchReport {
    pub attempted: usize,
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
}

impl FetchReport {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Downloads links one after another with randomized identity and pacing
pub struct Fetcher {
    config: FetchConfig,
    downloader: Box<dyn Downloader>,
    rng: Mutex<SmallRng>,
}

impl Fetcher {
    pub fn new(config: FetchConfig, downloader: Box<dyn Downloader>) -> Self {
        Self {
            config,
            downloader,
            rng: Mutex::new(SmallRng::from_entropy()),
        }
    }

    /// Deterministic pacing and identities
    pub fn with_seed(config: FetchConfig, downloader: Box<dyn Downloader>, seed: u64) -> Self {
        Self {
            config,
            downloader,
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }

    /// Fail early when the downloader program cannot be run
    pub async fn preflight(&self) -> Result<()> {
        if self.downloader.is_available().await {
            return Ok(());
        }
        Err(FetchError::DownloaderMissing {
            program: self.downloader.program().to_string(),
        }
        .into())
    }

    fn next_headers(&self) -> RequestHeaders {
        match self.rng.lock() {
            Ok(mut rng) => RequestHeaders::random(&self.config.user_agents, &mut *rng),
            Err(poisoned) => RequestHeaders::random(&self.config.user_agents, &mut *poisoned.into_inner()),
        }
    }

    fn pick_delay(&self, range: DelayRange) -> Duration {
        if !range.is_finite() {
            warn!("Ignoring non-finite delay range {}-{}", range.min, range.max);
            return Duration::ZERO;
        }
        if range.max <= range.min {
            return Duration::from_secs_f64(range.min.max(0.0));
        }
        let seconds = match self.rng.lock() {
            Ok(mut rng) => rng.gen_range(range.min..=range.max),
            Err(poisoned) => poisoned.into_inner().gen_range(range.min..=range.max),
        };
        Duration::from_secs_f64(seconds)
    }

    /// Download every link into `dest_dir`, in order
    ///
    /// One link failing never stops the batch; it is recorded in the report
    /// and followed by a longer pause.
    pub async fn fetch_all(&self, urls: &[String], dest_dir: &Path) -> Result<FetchReport> {
        tokio::fs::create_dir_all(dest_dir)
            .await
            .map_err(|_| FetchError::DirectoryFailed {
                path: dest_dir.display().to_string(),
            })?;

        info!("📥 Downloading {} links to {}", urls.len(), dest_dir.display());
        let mut report = FetchReport::default();

        for (index, url) in urls.iter().enumerate() {
            report.attempted += 1;
            info!("[{}/{}] {}", index + 1, urls.len(), url);

            let headers = self.next_headers();
            match self.downloader.download(url, dest_dir, &headers).await {
                Ok(()) => {
                    report.succeeded.push(url.clone());
                    let delay = self.pick_delay(self.config.delay);
                    info!("   waiting {:.1}s", delay.as_secs_f64());
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    error!("   download failed: {}", e);
                    report.failed.push(url.clone());
                    let penalty = self.pick_delay(self.config.penalty);
                    warn!("   backing off {:.1}s", penalty.as_secs_f64());
                    tokio::time::sleep(penalty).await;
                }
            }
        }

        info!(
            "✅ Downloads finished: {} ok, {} failed",
            report.succeeded.len(),
            report.failed.len()
        );
        Ok(report)
    }
}
