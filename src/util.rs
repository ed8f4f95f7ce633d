//! Shared naming helpers
//!
//! Case conversion and inflection used by metadata extraction, the code
//! generation rules and the style checkers.

/// Split an identifier into lowercase words.
///
/// Hyphens, underscores, dots, spaces and braces separate words, as do
/// lower-to-upper case transitions.
///
/// # Examples
/// ```
/// use ramlsync::util::split_words;
/// assert_eq!(split_words("user-groups"), vec!["user", "groups"]);
/// assert_eq!(split_words("{userId}"), vec!["user", "id"]);
/// ```
pub fn split_words(s: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in s.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Convert any identifier to PascalCase
///
/// # Examples
/// ```
/// use ramlsync::util::to_pascal_case;
/// assert_eq!(to_pascal_case("user_groups"), "UserGroups");
/// assert_eq!(to_pascal_case("order-items"), "OrderItems");
/// ```
pub fn to_pascal_case(s: &str) -> String {
    split_words(s).iter().map(|w| capitalize(w)).collect()
}

/// Convert any identifier to camelCase
///
/// # Examples
/// ```
/// use ramlsync::util::to_camel_case;
/// assert_eq!(to_camel_case("user_groups"), "userGroups");
/// assert_eq!(to_camel_case("Id"), "id");
/// ```
pub fn to_camel_case(s: &str) -> String {
    let words = split_words(s);
    let mut out = String::new();
    for (i, w) in words.iter().enumerate() {
        if i == 0 {
            out.push_str(w);
        } else {
            out.push_str(&capitalize(w));
        }
    }
    out
}

/// Naive English singular form of a resource noun.
pub fn singularize(word: &str) -> String {
    let lower = word.to_lowercase();
    if lower.ends_with("ies") && word.len() > 3 {
        format!("{}y", &word[..word.len() - 3])
    } else if lower.ends_with("sses") || lower.ends_with("xes") || lower.ends_with("ches") {
        word[..word.len() - 2].to_string()
    } else if lower.ends_with('s') && !lower.ends_with("ss") && word.len() > 1 {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    }
}

/// Whether a resource noun reads as a plural collection name.
pub fn is_plural(word: &str) -> bool {
    let lower = word.to_lowercase();
    (lower.ends_with('s') && !lower.ends_with("ss")) || lower.ends_with("data")
}

/// Whether a path segment is a URI parameter placeholder such as `{id}`.
pub fn is_uri_parameter_segment(segment: &str) -> bool {
    segment.starts_with('{') && segment.ends_with('}')
}

/// Non-empty `/`-separated segments of a path.
pub fn path_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}
