use std::path::{Path, PathBuf};

/// Prefix of every generated card image in the working directory
pub const CARD_IMAGE_PREFIX: &str = "transition_";

/// Where the image for card `ordinal` is written
pub fn card_image_path(work_dir: &Path, ordinal: usize) -> PathBuf {
    work_dir.join(format!("{}{}.png", CARD_IMAGE_PREFIX, ordinal))
}

/// Whether a file name looks like a generated card image
pub fn is_card_image_name(name: &str) -> bool {
    name.strip_prefix(CARD_IMAGE_PREFIX)
        .and_then(|rest| rest.strip_suffix(".png"))
        .map(|number| !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false)
}

/// Layout variant of a transition card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    /// Circle badge with the ordinal number
    Numbered,
    /// Final call-to-action card
    Closing,
}

/// Everything needed to paint one card
#[derive(Debug, Clone, PartialEq)]
pub struct CardSpec {
    pub ordinal: usize,
    pub kind: CardKind,
    /// Only painted on card 1
    pub title: Option<String>,
    /// Only painted on card 1, prefixed with `@`
    pub author: Option<String>,
    /// `MM-DD` stamp shown above the title
    pub date_stamp: String,
}

impl CardSpec {
    pub fn numbered(ordinal: usize, date_stamp: impl Into<String>) -> Self {
        Self {
            ordinal,
            kind: CardKind::Numbered,
            title: None,
            author: None,
            date_stamp: date_stamp.into(),
        }
    }

    pub fn closing(ordinal: usize) -> Self {
        Self {
            ordinal,
            kind: CardKind::Closing,
            title: None,
            author: None,
            date_stamp: String::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_author(mut self, author: Option<String>) -> Self {
        self.author = author.filter(|a| !a.trim().is_empty());
        self
    }

    /// Title block and byline belong to the opening card only
    pub fn shows_heading(&self) -> bool {
        self.kind == CardKind::Numbered && self.ordinal == 1
    }
}

/// Audio attached to a card clip
#[derive(Debug, Clone, PartialEq)]
pub enum CardAudio {
    /// Sound cue looped or truncated to the card duration
    Cue(PathBuf),
    /// No cue available
    Silence,
}

/// A rendered card, ready to go on the timeline
#[derive(Debug, Clone, PartialEq)]
pub struct CardClip {
    pub ordinal: usize,
    pub kind: CardKind,
    pub image_path: PathBuf,
    pub duration: f64,
    pub audio: CardAudio,
    /// Whether the title block and byline were painted
    pub has_heading: bool,
}
