use std::sync::OnceLock;

use regex::Regex;

const AD_KEYWORDS: [&str; 4] = [
    "sponsored",
    "promoted",
    "paid partnership",
    "paid promotion",
];

/// Which rule flagged a snapshot as sponsored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdSignal {
    Keyword(&'static str),
    /// Ad label directly followed by a `•` or `·` separator.
    BulletLabel,
}

fn bullet_label_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(sponsored|promoted|paid partnership)\s*[•·]")
            .expect("static regex compiles")
    })
}

/// Permissive by intent: ads are excluded from dedup entirely, so a missed ad
/// costs more than a false positive.
pub fn classify(flattened: &str) -> Option<AdSignal> {
    let lower = flattened.to_lowercase();
    if let Some(keyword) = AD_KEYWORDS.iter().copied().find(|kw| lower.contains(kw)) {
        return Some(AdSignal::Keyword(keyword));
    }

    if bullet_label_regex().is_match(flattened) {
        return Some(AdSignal::BulletLabel);
    }

    None
}

pub fn is_ad(flattened: &str) -> bool {
    classify(flattened).is_some()
}
