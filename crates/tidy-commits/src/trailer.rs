//! Conversion between schema labels and trailer keys
//!
//! A label such as `co_authored_by` is written to the message as the trailer
//! key `Co-Authored-By`. The two functions here are exact inverses for any
//! label made of ASCII letters, digits and single underscores.

/// Encode a schema label as a trailer key
pub fn label_to_trailer_key(label: &str) -> String {
    label
        .split('_')
        .map(title_case)
        .collect::<Vec<_>>()
        .join("-")
}

/// Decode a trailer key into a schema label
pub fn trailer_key_to_label(key: &str) -> String {
    key.to_ascii_lowercase().replace('-', "_")
}

/// Render a single trailer line. Continuation lines of a multi-line value are
/// indented so the value folds back together when parsed.
pub fn encode_trailer(label: &str, value: &str) -> String {
    let value = value
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n  ");
    format!("{}: {}", label_to_trailer_key(label), value)
}

fn title_case(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => {
            let mut out = first.to_ascii_uppercase().to_string();
            out.push_str(&chars.as_str().to_ascii_lowercase());
            out
        }
        None => String::new(),
    }
}
