use crate::cards::{CardClip, CardKind};
use crate::video::VideoSegment;

/// One entry of the concatenation sequence
#[derive(Debug, Clone, PartialEq)]
pub enum ClipUnit {
    Card(CardClip),
    Video(VideoSegment),
}

impl ClipUnit {
    /// Seconds this unit occupies in the output
    pub fn duration(&self) -> f64 {
        match self {
            Self::Card(card) => card.duration,
            Self::Video(segment) => segment.duration,
        }
    }

    pub fn is_card(&self) -> bool {
        matches!(self, Self::Card(_))
    }
}

/// Ordered clips to be concatenated into the reel
#[derive(Debug, Clone)]
pub struct Timeline {
    units: Vec<ClipUnit>,
    canvas: (u32, u32),
}

impl Timeline {
    pub fn new(canvas: (u32, u32)) -> Self {
        Self {
            units: Vec::new(),
            canvas,
        }
    }

    /// Frame size every unit is scaled to
    pub fn canvas(&self) -> (u32, u32) {
        self.canvas
    }

    pub fn push_card(&mut self, card: CardClip) {
        self.units.push(ClipUnit::Card(card));
    }

    pub fn push_video(&mut self, segment: VideoSegment) {
        self.units.push(ClipUnit::Video(segment));
    }

    pub fn units(&self) -> &[ClipUnit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn total_duration(&self) -> f64 {
        self.units.iter().map(ClipUnit::duration).sum()
    }

    pub fn cards(&self) -> impl Iterator<Item = &CardClip> {
        self.units.iter().filter_map(|unit| match unit {
            ClipUnit::Card(card) => Some(card),
            ClipUnit::Video(_) => None,
        })
    }

    pub fn segments(&self) -> impl Iterator<Item = &VideoSegment> {
        self.units.iter().filter_map(|unit| match unit {
            ClipUnit::Video(segment) => Some(segment),
            ClipUnit::Card(_) => None,
        })
    }

    /// Whether the sequence reads card, video, card, video, ..., closing card
    pub fn is_well_formed(&self) -> bool {
        let n = self.segments().count();
        if n == 0 || self.units.len() != 2 * n + 1 {
            return false;
        }

        let alternates = self
            .units
            .iter()
            .enumerate()
            .all(|(i, unit)| unit.is_card() == (i % 2 == 0));
        let closes = matches!(
            self.units.last(),
            Some(ClipUnit::Card(card)) if card.kind == CardKind::Closing
        );

        alternates && closes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardAudio;
    use std::path::PathBuf;

    fn card(ordinal: usize, kind: CardKind) -> CardClip {
        CardClip {
            ordinal,
            kind,
            image_path: PathBuf::from(format!("transition_{}.png", ordinal)),
            duration: 1.0,
            audio: CardAudio::Silence,
            has_heading: ordinal == 1,
        }
    }

    fn segment(position: usize, duration: f64) -> VideoSegment {
        VideoSegment {
            path: PathBuf::from(format!("{}.mp4", position)),
            position,
            frame_size: (720, 1280),
            source_duration: duration + 0.5,
            duration,
            has_audio: true,
        }
    }

    #[test]
    fn test_timeline_operations() {
        let mut timeline = Timeline::new((720, 1280));
        timeline.push_card(card(1, CardKind::Numbered));
        timeline.push_video(segment(1, 2.5));
        timeline.push_card(card(2, CardKind::Numbered));
        timeline.push_video(segment(2, 4.0));
        timeline.push_card(card(3, CardKind::Closing));

        assert_eq!(timeline.len(), 5);
        assert_eq!(timeline.total_duration(), 9.5);
        assert_eq!(timeline.cards().map(|c| c.ordinal).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(timeline.is_well_formed());
    }

    #[test]
    fn test_missing_closing_card_is_not_well_formed() {
        let mut timeline = Timeline::new((720, 1280));
        timeline.push_card(card(1, CardKind::Numbered));
        timeline.push_video(segment(1, 2.5));
        assert!(!timeline.is_well_formed());

        timeline.push_card(card(2, CardKind::Numbered));
        assert!(!timeline.is_well_formed());
        assert!(!Timeline::new((720, 1280)).is_well_formed());
    }
}
