//! Planned-sprint tag handling.

use std::sync::OnceLock;

use regex::Regex;

fn sprint_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^S[0-9]+$").expect("sprint token pattern is valid"))
}

/// Furthest planned sprint named by a `;`-delimited tag value.
///
/// Tokens must match `S<ordinal>` exactly. The reduction is a plain
/// string maximum, so `"S9"` outranks `"S10"`. Returns `None` when no
/// token qualifies.
pub fn max_planned_sprint(tag: &str) -> Option<String> {
    tag.split(';')
        .map(str::trim)
        .filter(|token| sprint_token_re().is_match(token))
        .max()
        .map(str::to_string)
}
