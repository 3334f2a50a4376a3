//! # Transition Cards
//!
//! Static title/number/closing images placed between the clips of a reel.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use reel_stitch::cards::{CardRenderer, CardSpec, ColorScheme};
//! use reel_stitch::config::CardConfig;
//!
//! # fn main() -> reel_stitch::Result<()> {
//! let renderer = CardRenderer::new(&CardConfig::default(), (720, 1280), ColorScheme::Classic, Path::new("."));
//! let first = renderer.render(&CardSpec::numbered(1, "05-01").with_title("Best of May"))?;
//! println!("card written to {}", first.image_path.display());
//! # Ok(())
//! # }
//! ```

pub mod canvas;
pub mod fonts;
pub mod renderer;
pub mod scheme;
pub mod types;

pub use canvas::Canvas;
pub use fonts::{Face, FontSource};
pub use renderer::{BadgeLayout, CardRenderer};
pub use scheme::ColorScheme;
pub use types::{card_image_path, is_card_image_name, CardAudio, CardClip, CardKind, CardSpec};
