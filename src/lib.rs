//! # reel-stitch
//!
//! Download short vertical videos in bulk and stitch them into one reel with
//! numbered transition cards between the clips.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use reel_stitch::{
//!     assembly::{AssemblyPipeline, AssemblyRequest, TracingReporter},
//!     config::Config,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let pipeline = AssemblyPipeline::new(Config::default());
//! let request = AssemblyRequest::from_dir("11-25/")
//!     .with_title(Some("Daily Dose of Joy".to_string()))
//!     .with_author(Some("someone".to_string()));
//!
//! let outcome = pipeline.run(&request, &TracingReporter).await?;
//! println!("reel written to {}", outcome.artifact.path().display());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`links`] - Link extraction from text or link files
//! - [`fetch`] - Paced, sequential downloads through `yt-dlp`
//! - [`cards`] - Transition card painting
//! - [`video`] - Probing and encoding through `ffprobe`/`ffmpeg`
//! - [`assembly`] - Ordering, timeline building, render with silent fallback, cleanup
//! - [`shell`] - Front-end operations returning human readable status
//! - [`config`] - Configuration management
//!
//! ## Swapping Backends
//!
//! The external programs sit behind the [`MediaProbe`](video::MediaProbe),
//! [`Renderer`](video::Renderer) and [`Downloader`](fetch::Downloader) traits:
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use reel_stitch::{
//!     assembly::Timeline,
//!     video::{AudioMode, OutputArtifact, Renderer},
//!     Result,
//! };
//!
//! struct DryRun;
//!
//! #[async_trait]
//! impl Renderer for DryRun {
//!     async fn render(&self, timeline: &Timeline, output: &OutputArtifact, _mode: AudioMode) -> Result<()> {
//!         println!("would write {} clips to {}", timeline.len(), output.path().display());
//!         Ok(())
//!     }
//! }
//! ```

pub mod assembly;
pub mod cards;
pub mod config;
pub mod error;
pub mod fetch;
pub mod links;
pub mod shell;
pub mod video;

// Re-export commonly used types for convenience
pub use crate::{
    assembly::{AssemblyPipeline, AssemblyRequest},
    config::Config,
    error::{Result, StitchError},
    shell::{MergeParams, Shell, Status},
};
