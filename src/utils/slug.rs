use once_cell::sync::Lazy;
use regex::Regex;

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// URL-safe slug: lowercase, runs of anything but `a-z0-9` become one `-`.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    NON_ALNUM
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}
