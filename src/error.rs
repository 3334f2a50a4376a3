use thiserror::Error;

/// Main error type for the reel-stitch library
#[derive(Error, Debug)]
pub enum StitchError {
    #[error("Download error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Transition card error: {0}")]
    Card(#[from] CardError),

    #[error("Video processing error: {0}")]
    Video(#[from] VideoError),

    #[error("Assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Download errors
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Downloader program not available: {program}")]
    DownloaderMissing { program: String },

    #[error("Download failed for {url}: {reason}")]
    DownloadFailed { url: String, reason: String },

    #[error("Cannot create download directory: {path}")]
    DirectoryFailed { path: String },
}

/// Transition card errors
#[derive(Error, Debug)]
pub enum CardError {
    #[error("Failed to save card image {path}: {reason}")]
    SaveFailed { path: String, reason: String },

    #[error("Invalid card parameters: {details}")]
    InvalidParameters { details: String },
}

/// Video probing and encoding errors
#[derive(Error, Debug)]
pub enum VideoError {
    #[error("Media program not available: {program}")]
    ToolMissing { program: String },

    #[error("Failed to probe video file: {path}")]
    ProbeFailed { path: String },

    #[error("Video has invalid duration ({duration:.3}s): {path}")]
    InvalidDuration { path: String, duration: f64 },

    #[error("Video encoding failed: {reason}")]
    EncodingFailed { reason: String },

    #[error("Silent fallback encoding also failed: {primary}; {fallback}")]
    FallbackFailed { primary: String, fallback: String },

    #[error("Output file missing or empty: {path}")]
    EmptyOutput { path: String },
}

/// Assembly pipeline input errors
#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("Input directory does not exist: {path}")]
    MissingDirectory { path: String },

    #[error("No video files found in: {path}")]
    NoVideosFound { path: String },

    #[error("Requested first video is not part of the input: {name}")]
    UnknownFirst { name: String },

    #[error("Video listed in explicit order does not exist: {path}")]
    MissingVideo { path: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using StitchError
pub type Result<T> = std::result::Result<T, StitchError>;

impl StitchError {
    /// Check if this error is recoverable (can be retried)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(_) => true,
            // A single download failing does not poison the batch
            Self::Fetch(FetchError::DownloadFailed { .. }) => true,
            // The audio-inclusive encode has a silent fallback
            Self::Video(VideoError::EncodingFailed { .. }) => true,
            _ => false,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Assembly(AssemblyError::MissingDirectory { path }) => {
                format!("Input folder '{}' does not exist.", path)
            }
            Self::Assembly(AssemblyError::NoVideosFound { path }) => {
                format!("No .mp4 or .mov files found in '{}'.", path)
            }
            Self::Video(VideoError::InvalidDuration { path, .. }) => {
                format!("Video '{}' has no playable duration.", path)
            }
            Self::Fetch(FetchError::DownloaderMissing { program })
            | Self::Video(VideoError::ToolMissing { program }) => {
                format!("'{}' was not found. Please install it and make sure it is on PATH.", program)
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_for_empty_folder() {
        let err: StitchError = AssemblyError::NoVideosFound { path: "clips".into() }.into();
        assert_eq!(err.user_message(), "No .mp4 or .mov files found in 'clips'.");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_encoding_failure_is_recoverable_but_fallback_is_not() {
        let primary: StitchError = VideoError::EncodingFailed { reason: "aac".into() }.into();
        let fallback: StitchError = VideoError::FallbackFailed {
            primary: "aac".into(),
            fallback: "x264".into(),
        }
        .into();
        assert!(primary.is_recoverable());
        assert!(!fallback.is_recoverable());
    }

    #[test]
    fn test_user_message_for_missing_program() {
        let err: StitchError = VideoError::ToolMissing { program: "ffprobe".into() }.into();
        assert_eq!(
            err.user_message(),
            "'ffprobe' was not found. Please install it and make sure it is on PATH."
        );
    }
}
