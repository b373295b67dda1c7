use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Runs of anything outside `[a-z0-9]` collapse to a single hyphen
    static ref NON_ALPHANUMERIC: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
}

/// Derive a URL-safe slug from a display name.
///
/// Lowercases the input, collapses every run of non-alphanumeric characters
/// to one hyphen, and strips leading/trailing hyphens.
/// - `"Fire Doors & Frames"` -> `"fire-doors-frames"`
/// - `"  already-a-slug "` -> `"already-a-slug"`
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    NON_ALPHANUMERIC
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}
