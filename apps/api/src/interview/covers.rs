//! Cover images attached to every stored interview.

use rand::seq::SliceRandom;

/// Company logos served by the frontend under `/covers`.
pub const DEFAULT_COVERS: &[&str] = &[
    "/covers/adobe.png",
    "/covers/amazon.png",
    "/covers/facebook.png",
    "/covers/hostinger.png",
    "/covers/pinterest.png",
    "/covers/quora.png",
    "/covers/reddit.png",
    "/covers/skype.png",
    "/covers/spotify.png",
    "/covers/telegram.png",
    "/covers/tiktok.png",
    "/covers/yahoo.png",
];

/// Supplies the cover image identifier stored verbatim on a new interview.
pub trait CoverImagePicker: Send + Sync {
    fn pick(&self) -> String;
}

/// Uniform choice over a fixed list.
pub struct RandomCoverPicker {
    covers: Vec<String>,
}

impl RandomCoverPicker {
    /// Falls back to `DEFAULT_COVERS` when `covers` is empty.
    pub fn new(covers: Vec<String>) -> Self {
        let covers = if covers.is_empty() {
            DEFAULT_COVERS.iter().map(|c| c.to_string()).collect()
        } else {
            covers
        };
        Self { covers }
    }
}

impl Default for RandomCoverPicker {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl CoverImagePicker for RandomCoverPicker {
    fn pick(&self) -> String {
        self.covers
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_default()
    }
}
