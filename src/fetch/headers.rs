use rand::seq::SliceRandom;
use rand::Rng;

/// Browser identities rotated between requests
pub fn default_user_agents() -> Vec<String> {
    [
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:89.0) Gecko/20100101 Firefox/89.0",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36 Edg/91.0.864.59",
    ]
    .iter()
    .map(|ua| ua.to_string())
    .collect()
}

const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "zh-CN,zh;q=0.9,en;q=0.8";
const ACCEPT_ENCODING: &str = "gzip, deflate, br";
const REFERER: &str = "https://www.instagram.com/";

/// Header set sent with one download
#[derive(Debug, Clone, PartialEq)]
pub struct RequestHeaders {
    pub user_agent: String,
}

impl RequestHeaders {
    pub fn new<S: Into<String>>(user_agent: S) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }

    /// Pick a random identity from `agents`
    pub fn random<R: Rng + ?Sized>(agents: &[String], rng: &mut R) -> Self {
        let user_agent = agents
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| default_user_agents().remove(0));
        Self { user_agent }
    }

    /// Name/value pairs other than the user agent
    pub fn extra(&self) -> [(&'static str, &'static str); 6] {
        [
            ("Accept", ACCEPT),
            ("Accept-Language", ACCEPT_LANGUAGE),
            ("Accept-Encoding", ACCEPT_ENCODING),
            ("Referer", REFERER),
            ("DNT", "1"),
            ("Connection", "keep-alive"),
        ]
    }

    /// Every header, user agent first
    pub fn as_pairs(&self) -> Vec<(&str, &str)> {
        std::iter::once(("User-Agent", self.user_agent.as_str()))
            .chain(self.extra())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn test_random_headers_use_known_agent() {
        let agents = default_user_agents();
        let mut rng = SmallRng::seed_from_u64(7);

        for _ in 0..20 {
            let headers = RequestHeaders::random(&agents, &mut rng);
            assert!(agents.contains(&headers.user_agent));
        }
    }

    #[test]
    fn test_fixed_headers() {
        let headers = RequestHeaders::new("test-agent");
        let pairs = headers.as_pairs();

        assert_eq!(pairs[0], ("User-Agent", "test-agent"));
        assert!(pairs.contains(&("Referer", "https://www.instagram.com/")));
        assert!(pairs.contains(&("DNT", "1")));
        assert!(pairs.contains(&("Connection", "keep-alive")));
        assert_eq!(pairs.len(), 7);
    }
}
