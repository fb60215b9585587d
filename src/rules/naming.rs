//! rules::naming
//!
//! Project name conversion to kebab-case.
//!
//! # Features
//!
//! - Split camel-case names at word boundaries
//! - Preserve acronym segments (`HTTP`, `V2`) verbatim
//! - Pass already-hyphenated names through unchanged

/// Convert a camel-case project name to kebab-case.
///
/// Names that already contain a hyphen are returned unchanged, which makes
/// the conversion idempotent. Otherwise the name is split before an
/// uppercase letter that starts a new word (either followed by a lowercase
/// letter, or preceded by one), each segment is lowercased, and the
/// segments are joined with hyphens. Segments consisting entirely of
/// uppercase letters (acronyms, including digit-bearing ones like `V2`)
/// keep their casing.
///
/// # Example
///
/// ```
/// use rebrand::rules::naming::kebab_case;
///
/// assert_eq!(kebab_case("FooBarBaz"), "foo-bar-baz");
/// assert_eq!(kebab_case("HTTPServer"), "HTTP-server");
/// assert_eq!(kebab_case("already-kebab"), "already-kebab");
/// ```
pub fn kebab_case(name: &str) -> String {
    if name.contains('-') {
        return name.to_string();
    }

    let chars: Vec<char> = name.chars().collect();
    let mut segments: Vec<String> = Vec::new();
    let mut start = 0;

    for i in 1..chars.len() {
        // A segment starts at an uppercase letter that either begins a
        // lowercase run or ends one.
        let boundary = chars[i].is_ascii_uppercase()
            && (chars.get(i + 1).is_some_and(|c| c.is_ascii_lowercase())
                || chars[i - 1].is_ascii_lowercase());
        if boundary {
            segments.push(chars[start..i].iter().collect());
            start = i;
        }
    }
    segments.push(chars[start..].iter().collect());

    segments
        .into_iter()
        .map(|segment| {
            if is_acronym(&segment) {
                segment
            } else {
                segment.to_lowercase()
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// A segment is an acronym when it is longer than one character, contains
/// at least one uppercase letter, and no lowercase letters. Uncased
/// characters (digits) do not disqualify it, so `V2` counts.
fn is_acronym(segment: &str) -> bool {
    let mut has_upper = false;
    for c in segment.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_upper = true;
        }
    }
    has_upper && segment.chars().count() > 1
}
