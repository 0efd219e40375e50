//! Content identity reconstructed from fuzzy on-screen signals.
//!
//! No surface exposes a real content id, so a fingerprint is assembled from the
//! username, bucketed engagement counts, a duration token and a caption sample,
//! using the first rule whose inputs are all present. Like and comment counts
//! tick up while an item stays on screen, so they only enter the fingerprint
//! through [`like_band`] and [`comment_band`].
//!
//! Rule priority means a later render exposing more signals can produce a
//! different fingerprint for the same item than an earlier one. That drift is a
//! known limitation of the heuristic.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

const CAPTION_WORD_COUNT: usize = 3;
const CAPTION_MAX_CHARS: usize = 20;
const NO_CAPTION: &str = "nocap";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Assembly rules, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FingerprintRule {
    UserLikesComments,
    UserLikes,
    UserComments,
    UserDuration,
    UserCaption,
    AnonymousEngagement,
    CaptionOnly,
}

/// Raw signals pulled out of one flattened snapshot. Each is independent and may
/// be missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReelSignals {
    pub username: Option<String>,
    pub like_count: Option<u64>,
    pub comment_count: Option<u64>,
    /// First `MM:SS` token with `:` rewritten to `m`. Not a parsed duration.
    pub duration: Option<String>,
    pub caption_words: String,
}

fn username_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"@([a-zA-Z0-9_.]+)").expect("static regex compiles"))
}

fn like_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)like number is\s*([0-9]+)|([0-9]+)\s*likes?")
            .expect("static regex compiles")
    })
}

fn comment_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)comment number is\s*([0-9]+)|([0-9]+)\s*comments?")
            .expect("static regex compiles")
    })
}

fn duration_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]+:[0-9]+").expect("static regex compiles"))
}

/// First count matched by either the verbose or the terse alternative.
fn first_count(re: &Regex, text: &str) -> Option<u64> {
    let caps = re.captures(text)?;
    caps.iter()
        .skip(1)
        .flatten()
        .map(|m| m.as_str())
        .find(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
}

pub fn caption_words(flattened: &str) -> String {
    let joined = flattened
        .split_whitespace()
        .filter(|word| {
            word.chars().count() > 3
                && !word.contains('@')
                && word.chars().any(char::is_alphabetic)
        })
        .take(CAPTION_WORD_COUNT)
        .collect::<Vec<_>>()
        .join("_");

    let truncated: String = joined.chars().take(CAPTION_MAX_CHARS).collect();
    if truncated.is_empty() {
        NO_CAPTION.to_string()
    } else {
        truncated
    }
}

impl ReelSignals {
    pub fn extract(flattened: &str) -> Self {
        let username = username_regex()
            .captures(flattened)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());

        Self {
            username,
            like_count: first_count(like_regex(), flattened),
            comment_count: first_count(comment_regex(), flattened),
            duration: duration_regex()
                .find(flattened)
                .map(|m| m.as_str().replace(':', "m")),
            caption_words: caption_words(flattened),
        }
    }

    pub fn rule(&self) -> FingerprintRule {
        match (
            self.username.is_some(),
            self.like_count.is_some(),
            self.comment_count.is_some(),
            self.duration.is_some(),
        ) {
            (true, true, true, _) => FingerprintRule::UserLikesComments,
            (true, true, false, _) => FingerprintRule::UserLikes,
            (true, false, true, _) => FingerprintRule::UserComments,
            (true, false, false, true) => FingerprintRule::UserDuration,
            (true, false, false, false) => FingerprintRule::UserCaption,
            (false, true, true, _) => FingerprintRule::AnonymousEngagement,
            _ => FingerprintRule::CaptionOnly,
        }
    }

    pub fn fingerprint(&self) -> Fingerprint {
        let user = self.username.as_deref().unwrap_or_default();
        let likes = self.like_count.map(like_band).unwrap_or_default();
        let comments = self.comment_count.map(comment_band).unwrap_or_default();

        let id = match self.rule() {
            FingerprintRule::UserLikesComments => format!("reel_{user}_{likes}_{comments}"),
            FingerprintRule::UserLikes => format!("reel_{user}_{likes}_0C"),
            FingerprintRule::UserComments => format!("reel_{user}_0L_{comments}"),
            FingerprintRule::UserDuration => format!(
                "reel_{user}_dur_{}_{}",
                self.duration.as_deref().unwrap_or_default(),
                caption_hash(&self.caption_words)
            ),
            FingerprintRule::UserCaption => {
                format!("reel_{user}_cap_{}", caption_hash(&self.caption_words))
            }
            FingerprintRule::AnonymousEngagement => format!("reel_anon_{likes}_{comments}"),
            FingerprintRule::CaptionOnly => {
                format!("reel_stable__{}", caption_hash(&self.caption_words))
            }
        };

        Fingerprint(id)
    }
}

pub fn extract_fingerprint(flattened: &str) -> Fingerprint {
    ReelSignals::extract(flattened).fingerprint()
}

/// Process-stable string hash. Only ever compared inside a fingerprint string.
pub fn caption_hash(value: &str) -> String {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    format!("{:x}", hasher.finish())
}

fn band(value: u64, width: u64, suffix: char) -> String {
    let lo = value / width * width;
    format!("{}-{}{}", lo, lo + width - 1, suffix)
}

pub fn like_band(likes: u64) -> String {
    match likes {
        0..=9 => "0-9L".to_string(),
        10..=99 => band(likes, 10, 'L'),
        100..=999 => band(likes, 100, 'L'),
        1_000..=9_999 => band(likes, 1_000, 'L'),
        _ => format!("{}kL", likes / 1_000),
    }
}

pub fn comment_band(comments: u64) -> String {
    match comments {
        0..=9 => "0-9C".to_string(),
        10..=99 => band(comments, 10, 'C'),
        _ => format!("{}+C", comments / 100 * 100),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_band_boundaries() {
        assert_eq!(like_band(0), "0-9L");
        assert_eq!(like_band(9), "0-9L");
        assert_eq!(like_band(10), "10-19L");
        assert_eq!(like_band(99), "90-99L");
        assert_eq!(like_band(100), "100-199L");
        assert_eq!(like_band(999), "900-999L");
        assert_eq!(like_band(1_000), "1000-1999L");
        assert_eq!(like_band(9_999), "9000-9999L");
        assert_eq!(like_band(10_000), "10kL");
        assert_eq!(like_band(254_310), "254kL");
    }

    #[test]
    fn comment_band_boundaries() {
        assert_eq!(comment_band(9), "0-9C");
        assert_eq!(comment_band(10), "10-19C");
        assert_eq!(comment_band(99), "90-99C");
        assert_eq!(comment_band(100), "100+C");
        assert_eq!(comment_band(250), "200+C");
    }

    #[test]
    fn counts_accept_verbose_and_terse_phrasing() {
        let verbose = ReelSignals::extract("Like number is 42 Share Comment number is 7");
        assert_eq!(verbose.like_count, Some(42));
        assert_eq!(verbose.comment_count, Some(7));

        let terse = ReelSignals::extract("1203 likes 1 comment");
        assert_eq!(terse.like_count, Some(1203));
        assert_eq!(terse.comment_count, Some(1));
    }

    #[test]
    fn number_directly_before_a_label_binds_to_it() {
        let signals = ReelSignals::extract("Like number is 42 Comment number is 7");
        assert_eq!(signals.like_count, Some(42));
        assert_eq!(signals.comment_count, Some(42));
    }

    #[test]
    fn username_and_duration_are_extracted() {
        let signals = ReelSignals::extract("Reels @chef.anna_99 0:37 pasta night");
        assert_eq!(signals.username.as_deref(), Some("chef.anna_99"));
        assert_eq!(signals.duration.as_deref(), Some("0m37"));
    }

    #[test]
    fn caption_words_filter_and_truncate() {
        assert_eq!(
            caption_words("a @user 1234 to sunset beach vibes forever"),
            "sunset_beach_vibes"
        );
        assert_eq!(
            caption_words("extraordinarily beautiful mountains"),
            "extraordinarily_beau"
        );
        assert_eq!(caption_words("@only 12 ab"), "nocap");
        assert_eq!(caption_words(""), "nocap");
    }

    #[test]
    fn full_signals_use_the_top_rule_even_with_duration() {
        let fp = extract_fingerprint(
            "Reels @maya Like number is 152 Share Comment number is 23 0:15 morning run by the lake",
        );
        assert_eq!(fp.as_str(), "reel_maya_100-199L_20-29C");
    }

    #[test]
    fn partial_engagement_rules() {
        assert_eq!(
            extract_fingerprint("Reels @maya 57 likes").as_str(),
            "reel_maya_50-59L_0C"
        );
        assert_eq!(
            extract_fingerprint("Reels @maya 3 comments").as_str(),
            "reel_maya_0L_0-9C"
        );
        assert_eq!(
            extract_fingerprint("Reels 57 likes 3 comments").as_str(),
            "reel_anon_50-59L_0-9C"
        );
    }

    #[test]
    fn username_fallbacks_embed_caption_hash() {
        let text = "Reels @maya 1:05 kitchen tour today";
        let signals = ReelSignals::extract(text);
        assert_eq!(signals.rule(), FingerprintRule::UserDuration);
        assert_eq!(
            signals.fingerprint().as_str(),
            format!("reel_maya_dur_1m05_{}", caption_hash(&signals.caption_words))
        );

        let caption_only = ReelSignals::extract("Reels @maya kitchen tour today");
        assert_eq!(caption_only.rule(), FingerprintRule::UserCaption);
        assert!(caption_only.fingerprint().as_str().starts_with("reel_maya_cap_"));
    }

    #[test]
    fn no_user_no_engagement_falls_back_to_caption() {
        let fp = extract_fingerprint("Reels kitchen tour today");
        assert!(fp.as_str().starts_with("reel_stable__"));
        assert!(!fp.is_empty());
    }

    #[test]
    fn live_count_drift_keeps_identity() {
        let first = extract_fingerprint("Reels @maya Like number is 141 Share Comment number is 12");
        let later = extract_fingerprint("Reels @maya Like number is 148 Share Comment number is 14");
        assert_eq!(first, later);

        let other = extract_fingerprint("Reels @maya Like number is 241 Share Comment number is 12");
        assert_ne!(first, other);
    }
}
