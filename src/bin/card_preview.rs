// Renders the first, a regular and the closing card for visual inspection

use std::path::PathBuf;

use reel_stitch::{
    cards::{CardRenderer, CardSpec, ColorScheme},
    config::Config,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| "card_preview".to_string()));
    let scheme: ColorScheme = match args.next() {
        Some(name) => name.parse()?,
        None => ColorScheme::Classic,
    };

    println!("🎴 Rendering preview cards ({} scheme)", scheme);
    std::fs::create_dir_all(&out_dir)?;

    let config = match std::env::var("REEL_STITCH_CONFIG") {
        Ok(path) => Config::from_file(path)?,
        Err(_) => Config::default(),
    };
    let date = chrono::Local::now().format("%m-%d").to_string();
    let renderer = CardRenderer::new(&config.cards, config.assembly.canvas, scheme, &out_dir);

    let cards = [
        CardSpec::numbered(1, date.as_str())
            .with_title(config.cards.default_title.as_str())
            .with_author(Some("author".to_string())),
        CardSpec::numbered(2, date.as_str()),
        CardSpec::numbered(12, date.as_str()),
        CardSpec::closing(13),
    ];

    for spec in &cards {
        match renderer.render(spec) {
            Ok(clip) => println!("   📁 Card {} saved to {}", clip.ordinal, clip.image_path.display()),
            Err(e) => {
                println!("   ❌ Card {} failed: {}", spec.ordinal, e);
                return Err(e.into());
            }
        }
    }

    println!("\n🎉 {} cards written to {}", cards.len(), out_dir.display());
    Ok(())
}
