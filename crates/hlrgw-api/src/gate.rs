//! Fast on-topic guard.
//!
//! A keyword heuristic that runs before any upstream call is paid for. The
//! allow list is checked first and wins; the reject list catches clearly
//! off-domain chatter; anything unmatched is rejected too (closed world:
//! unclassified input is off-topic, not ambiguous).

use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Reject,
    /// Only ever produced for empty input; callers treat it like `Reject`
    Ambiguous,
}

static ALLOW_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\bhlr\b",
        r"(?i)\bhome\s*location\s*register\b",
        r"(?i)\blookup\b",
        r"(?i)\bmsisdn\b",
        r"(?i)\bimsi\b",
        r"(?i)\bmccmnc\b",
        r"(?i)\bapi\b",
        r"(?i)\bendpoint\b",
        r"(?i)\bwebhook\b",
        r"(?i)\bpricing\b",
        r"(?i)\bauth(entication| token| header)?\b",
        r"(?i)\bcurl\b",
        r"(?i)\bintegration\b",
        r"(?i)\bcarrier\b",
        r"(?i)\bnumber\s*(validation|lookup)\b",
        r"(?i)\bstatus\s*codes?\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("allow pattern"))
    .collect()
});

static REJECT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\b(recipe|cooking|travel|weather|movie|joke|poem|story|song)\b",
        r"(?i)\b(homework|math|biology|history)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("reject pattern"))
    .collect()
});

/// Classify one user message. Pure and case-insensitive; first allow match
/// wins.
pub fn classify(text: &str) -> Verdict {
    if text.is_empty() {
        return Verdict::Ambiguous;
    }
    if ALLOW_PATTERNS.iter().any(|p| p.is_match(text)) {
        return Verdict::Allow;
    }
    if REJECT_PATTERNS.iter().any(|p| p.is_match(text)) {
        return Verdict::Reject;
    }
    Verdict::Reject
}
