//! cURL snippet detection in assistant replies.
//!
//! Callers surface a "run this" affordance when the assistant answers with a
//! runnable curl command. Fenced code blocks are searched first, then bare
//! lines.

use once_cell::sync::Lazy;
use regex::Regex;

static FENCED_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```.*?```").expect("fenced block pattern"));

static CURL_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^[ \t]*(curl\s[^\n]+)").expect("curl line pattern"));

/// Extract the first runnable `curl` line from assistant text, if any
pub fn detect_curl(text: &str) -> Option<String> {
    if let Some(fenced) = FENCED_BLOCK.find(text) {
        let code = fenced.as_str().replace("```", "");
        if let Some(caps) = CURL_LINE.captures(code.trim()) {
            return Some(caps[1].trim_end().to_string());
        }
    }
    CURL_LINE
        .captures(text)
        .map(|caps| caps[1].trim_end().to_string())
}
