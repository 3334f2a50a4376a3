use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::{
    cards::{
        canvas::Canvas,
        fonts::Face,
        scheme::ColorScheme,
        types::{card_image_path, CardAudio, CardClip, CardKind, CardSpec},
    },
    config::CardConfig,
    error::{CardError, Result},
};

const RING_STROKE: f32 = 5.0;
const RING_TO_TEXT: f32 = 0.8;
const BOX_STROKE: i64 = 3;
const BOX_PADDING: i32 = 20;
const LINE_GAP: i32 = 20;
/// Distance kept between the circle and the title box / byline
const HEADING_OFFSET: i32 = 320;

/// Geometry of the number badge, shared by the badge and the heading blocks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BadgeLayout {
    pub center: (i32, i32),
    pub radius: f32,
    /// Line top-left corner of the number text
    pub text_origin: (i64, i64),
    /// Ink height of the number text
    pub text_height: i32,
}

/// Fonts resolved once per renderer
struct CardFaces {
    number: Face,
    title: Face,
    byline: Face,
    closing: Face,
}

/// Paints transition cards and writes them next to the run's working files
pub struct CardRenderer {
    config: CardConfig,
    size: (u32, u32),
    scheme: ColorScheme,
    work_dir: PathBuf,
    faces: CardFaces,
    audio: CardAudio,
}

impl CardRenderer {
    pub fn new(config: &CardConfig, size: (u32, u32), scheme: ColorScheme, work_dir: &Path) -> Self {
        let faces = CardFaces {
            number: Face::from_candidates(&config.number_fonts),
            title: Face::from_candidates(&config.title_fonts),
            byline: Face::from_candidates(&config.byline_fonts),
            closing: Face::from_candidates(&config.closing_fonts),
        };
        let audio = probe_sound_cue(&work_dir.join(&config.sound_cue));

        info!(
            "Card renderer ready: {}x{}, {} scheme, number font {}, sound cue: {}",
            size.0,
            size.1,
            scheme,
            faces.number.name(),
            matches!(audio, CardAudio::Cue(_))
        );

        Self {
            config: config.clone(),
            size,
            scheme,
            work_dir: work_dir.to_path_buf(),
            faces,
            audio,
        }
    }

    pub fn audio(&self) -> &CardAudio {
        &self.audio
    }

    /// Paint the card image and save it as `transition_<ordinal>.png`
    pub fn render(&self, spec: &CardSpec) -> Result<CardClip> {
        if spec.ordinal == 0 {
            return Err(CardError::InvalidParameters {
                details: "card ordinals start at 1".to_string(),
            }
            .into());
        }

        let canvas = self.paint(spec);
        let image_path = card_image_path(&self.work_dir, spec.ordinal);
        canvas.save_png(&image_path).map_err(|e| CardError::SaveFailed {
            path: image_path.display().to_string(),
            reason: e.to_string(),
        })?;

        debug!("Saved card {} to {}", spec.ordinal, image_path.display());

        Ok(CardClip {
            ordinal: spec.ordinal,
            kind: spec.kind,
            image_path,
            duration: self.config.duration,
            audio: self.audio.clone(),
            has_heading: spec.shows_heading(),
        })
    }

    /// Paint a card without touching the filesystem
    pub fn paint(&self, spec: &CardSpec) -> Canvas {
        let mut canvas = Canvas::new_filled(self.size.0, self.size.1, self.scheme.background());

        match spec.kind {
            CardKind::Numbered => {
                let badge = self.badge_layout(spec.ordinal);
                self.paint_badge(&mut canvas, spec.ordinal, &badge);

                if spec.shows_heading() {
                    let title = spec.title.as_deref().unwrap_or(&self.config.default_title);
                    self.paint_title_box(&mut canvas, &spec.date_stamp, title, &badge);
                    if let Some(author) = &spec.author {
                        self.paint_byline(&mut canvas, author, &badge);
                    }
                }
            }
            CardKind::Closing => self.paint_closing(&mut canvas),
        }

        canvas
    }

    /// Circle sized to the number, number shifted up by a quarter of (ascent - descent)
    pub fn badge_layout(&self, ordinal: usize) -> BadgeLayout {
        let size = self.config.number_font_size;
        let text = ordinal.to_string();
        let ink = self.faces.number.measure(&text, size);
        let metrics = self.faces.number.line_metrics(size);

        let center = (self.size.0 as i32 / 2, self.size.1 as i32 / 2);
        let radius = ink.width().max(ink.height()) as f32 * RING_TO_TEXT;

        let text_offset = ((metrics.ascent - metrics.descent) / 2.0).floor() as i64;
        let x = (center.0 - ink.width() / 2 - ink.left) as i64;
        let y = (center.1 - ink.height() / 2) as i64 - text_offset / 2;

        BadgeLayout {
            center,
            radius,
            text_origin: (x, y),
            text_height: ink.height(),
        }
    }

    fn paint_badge(&self, canvas: &mut Canvas, ordinal: usize, badge: &BadgeLayout) {
        let color = self.scheme.foreground();
        canvas.draw_ring(badge.center.0 as f32, badge.center.1 as f32, badge.radius, RING_STROKE, color);
        self.faces.number.draw(
            canvas,
            &ordinal.to_string(),
            self.config.number_font_size,
            badge.text_origin.0,
            badge.text_origin.1,
            color,
        );
    }

    /// Bordered box above the circle: date stamp on top, title below
    fn paint_title_box(&self, canvas: &mut Canvas, date: &str, title: &str, badge: &BadgeLayout) {
        let face = &self.faces.title;
        let size = self.config.title_font_size;
        let color = self.scheme.foreground();
        let width = self.size.0 as i32;

        let title_ink = face.measure(title, size);
        let date_ink = face.measure(date, size);

        let text_height = title_ink.height() + LINE_GAP + date_ink.height();
        let box_width = title_ink.width().max(date_ink.width()) + BOX_PADDING * 2;
        let box_height = text_height + BOX_PADDING * 2;

        let box_x = (width - box_width) / 2;
        let box_y = badge.center.1 - badge.radius as i32 - HEADING_OFFSET - (box_height - text_height) / 2;

        canvas.draw_rect_outline(
            box_x as i64,
            box_y as i64,
            (box_x + box_width) as i64,
            (box_y + box_height) as i64,
            BOX_STROKE,
            color,
        );

        let date_x = (width - date_ink.width()) / 2 - date_ink.left;
        let date_y = box_y + BOX_PADDING;
        face.draw(canvas, date, size, date_x as i64, date_y as i64, color);

        let title_x = (width - title_ink.width()) / 2 - title_ink.left;
        let title_y = date_y + title_ink.height() + BOX_PADDING;
        face.draw(canvas, title, size, title_x as i64, title_y as i64, color);
    }

    fn paint_byline(&self, canvas: &mut Canvas, author: &str, badge: &BadgeLayout) {
        let face = &self.faces.byline;
        let size = self.config.byline_font_size;
        let text = format!("@{}", author);
        let ink = face.measure(&text, size);

        let x = (self.size.0 as i32 - ink.width()) / 2 - ink.left;
        let y = badge.center.1 + badge.radius as i32 + badge.text_height + HEADING_OFFSET;
        face.draw(canvas, &text, size, x as i64, y as i64, self.scheme.foreground());
    }

    /// Call-to-action lines from a quarter of the height downward
    fn paint_closing(&self, canvas: &mut Canvas) {
        let face = &self.faces.closing;
        let size = self.config.closing_font_size;
        let color = self.scheme.foreground();
        let mut y = self.size.1 as i32 / 4;

        for line in &self.config.closing_lines {
            let ink = face.measure(line, size);
            let x = (self.size.0 as i32 - ink.width()) / 2 - ink.left;
            face.draw(canvas, line, size, x as i64, y as i64, color);
            y += self.config.closing_line_pitch as i32;
        }
    }
}

/// A cue only counts if it decodes as WAV; anything else means silent cards
fn probe_sound_cue(path: &Path) -> CardAudio {
    match hound::WavReader::open(path) {
        Ok(reader) if reader.duration() > 0 => CardAudio::Cue(path.to_path_buf()),
        Ok(_) => {
            debug!("Sound cue {} is empty, cards will be silent", path.display());
            CardAudio::Silence
        }
        Err(e) => {
            debug!("No usable sound cue at {} ({}), cards will be silent", path.display(), e);
            CardAudio::Silence
        }
    }
}
