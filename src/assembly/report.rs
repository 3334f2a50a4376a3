use std::fmt;

use tracing::{debug, info};

/// Phase of an assembly run
#[derive(Debug, Clone, PartialEq)]
pub enum RunState {
    Idle,
    Scanning,
    ProcessingSegment { index: usize, total: usize },
    Concatenating,
    Rendering { with_audio: bool },
    Cleanup,
    Done,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Scanning => write!(f, "scanning input"),
            Self::ProcessingSegment { index, total } => write!(f, "processing video {}/{}", index, total),
            Self::Concatenating => write!(f, "concatenating clips"),
            Self::Rendering { with_audio: true } => write!(f, "rendering with audio"),
            Self::Rendering { with_audio: false } => write!(f, "rendering without audio"),
            Self::Cleanup => write!(f, "cleaning up"),
            Self::Done => write!(f, "done"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Receives progress from a run
pub trait Reporter: Send + Sync {
    fn transition(&self, state: &RunState);

    fn note(&self, message: &str);
}

/// Reports progress through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn transition(&self, state: &RunState) {
        match state {
            RunState::Scanning => info!("🔍 {}", state),
            RunState::ProcessingSegment { .. } => info!("🎬 {}", state),
            RunState::Concatenating => info!("🧩 {}", state),
            RunState::Rendering { .. } => info!("🎞️  {}", state),
            RunState::Cleanup => info!("🧹 {}", state),
            RunState::Done => info!("✅ {}", state),
            RunState::Failed => info!("❌ {}", state),
            RunState::Idle => debug!("{}", state),
        }
    }

    fn note(&self, message: &str) {
        info!("   {}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display() {
        assert_eq!(
            RunState::ProcessingSegment { index: 2, total: 5 }.to_string(),
            "processing video 2/5"
        );
        assert_eq!(RunState::Rendering { with_audio: false }.to_string(), "rendering without audio");
    }
}
