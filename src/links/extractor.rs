use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, warn};

const HOST: &str = r"https?://(?:www\.)?instagram\.com";
const SEGMENT: &str = r"[^/\s]+";
const QUERY: &str = r#"\?[^\s"')]+"#;

/// Recognized link shapes, tried leftmost-first
static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let with_query = |path: &str| format!("{HOST}/{path}/?{QUERY}");
    let alternatives = [
        with_query(&format!("reel/{SEGMENT}")),
        with_query(&format!("p/{SEGMENT}")),
        with_query(&format!("reels/{SEGMENT}")),
        with_query(&format!("stories/{SEGMENT}")),
        with_query(&format!("tv/{SEGMENT}")),
        with_query(&format!("{SEGMENT}/{SEGMENT}")),
        with_query(SEGMENT),
        format!("{HOST}/{SEGMENT}/{SEGMENT}/?"),
    ];
    Regex::new(&alternatives.join("|")).expect("link pattern is a valid regex")
});

/// Human readable list of the supported link shapes
pub const SUPPORTED_FORMATS: &[&str] = &[
    "https://www.instagram.com/reel/<id>/?<query>",
    "https://www.instagram.com/p/<id>/?<query>",
    "https://www.instagram.com/reels/<id>/?<query>",
    "https://www.instagram.com/stories/<user>/?<query>",
    "https://www.instagram.com/tv/<id>/?<query>",
    "https://www.instagram.com/<user>/<id>",
];

/// Pull every recognized link out of `input`
///
/// `input` is read as a file when it names one, otherwise it is the text to
/// search. Matches are returned in order of appearance, duplicates kept. An
/// unreadable file yields no links.
pub fn extract_links(input: &str) -> Vec<String> {
    let path = Path::new(input.trim());
    let looks_like_path = !input.contains('\n') && path.is_file();

    let links = if looks_like_path {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                debug!("Reading links from {}", path.display());
                extract_from_text(&content)
            }
            Err(e) => {
                warn!("Could not read link file {}: {}", path.display(), e);
                Vec::new()
            }
        }
    } else {
        extract_from_text(input)
    };

    if links.is_empty() {
        debug!("No links recognized");
    } else {
        info!("🔗 Found {} links", links.len());
        for link in &links {
            debug!("   - {}", link);
        }
    }

    links
}

/// Pull every recognized link out of a block of text
pub fn extract_from_text(text: &str) -> Vec<String> {
    LINK_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_no_links_yields_empty() {
        assert!(extract_links("nothing to see here").is_empty());
        assert!(extract_links("").is_empty());
        assert!(extract_links("https://example.com/reel/abc/?x=1").is_empty());
    }

    #[test]
    fn test_supported_shapes_in_order() {
        let text = "\
first https://www.instagram.com/reel/C1abc/?igsh=xyz
then http://instagram.com/p/B2def?utm_source=ig_web
\"https://www.instagram.com/reels/D3ghi/?a=b\" and
https://instagram.com/tv/E4jkl/?x=1)
https://www.instagram.com/someone/F5mno
https://www.instagram.com/stories/someone/?story_media_id=33
https://www.instagram.com/someone/G6pqr?igsh=abc
https://instagram.com/someone?hl=en
";
        let links = extract_links(text);
        assert_eq!(
            links,
            vec![
                "https://www.instagram.com/reel/C1abc/?igsh=xyz",
                "http://instagram.com/p/B2def?utm_source=ig_web",
                "https://www.instagram.com/reels/D3ghi/?a=b",
                "https://instagram.com/tv/E4jkl/?x=1",
                "https://www.instagram.com/someone/F5mno",
                "https://www.instagram.com/stories/someone/?story_media_id=33",
                "https://www.instagram.com/someone/G6pqr?igsh=abc",
                "https://instagram.com/someone?hl=en",
            ]
        );
        assert_eq!(links.len(), text.lines().count());
    }

    #[test]
    fn test_duplicates_are_kept() {
        let link = "https://www.instagram.com/reel/C1abc/?igsh=xyz";
        let links = extract_links(&format!("{link} {link}\n{link}"));
        assert_eq!(links.len(), 3);
    }

    #[test]
    fn test_reads_link_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("11-25.txt");
        std::fs::write(
            &file,
            "https://www.instagram.com/reel/A/?s=1\nhttps://www.instagram.com/reel/B/?s=2\n",
        )
        .unwrap();

        let links = extract_links(&file.display().to_string());
        assert_eq!(
            links,
            vec![
                "https://www.instagram.com/reel/A/?s=1",
                "https://www.instagram.com/reel/B/?s=2",
            ]
        );
    }

    #[test]
    fn test_missing_file_is_treated_as_text() {
        assert!(extract_links("/no/such/links.txt").is_empty());
    }
}
