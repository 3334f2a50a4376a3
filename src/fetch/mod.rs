//! # Fetch Module
//!
//! Sequential link downloading through an external downloader, with a fresh
//! browser identity per request and randomized pauses in between.

pub mod downloader;
pub mod fetcher;
pub mod headers;

pub use downloader::{Downloader, YtDlpDownloader};
pub use fetcher::{FetchReport, Fetcher};
pub use headers::{default_user_agents, RequestHeaders};
