//! Formatting of raw upstream tokens for display.
//!
//! The cache keeps tokens exactly as upstream sends them; everything here is
//! applied at render time only.

/// `north_carolina-usa` becomes `North Carolina, USA`.
pub fn normalize_location(token: &str) -> String {
    let mut parts = token.rsplitn(2, '-');
    let country = parts.next().unwrap_or_default();
    match parts.next() {
        Some(city) => format!("{}, {}", title_case(city), country_name(country)),
        None => title_case(country),
    }
}

fn country_name(token: &str) -> String {
    // Short country tokens are acronyms upstream (usa, uk, uae).
    if token.len() <= 3 && !token.contains('_') {
        token.to_uppercase()
    } else {
        title_case(token)
    }
}

fn title_case(token: &str) -> String {
    token
        .split(['_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Strips the leading `*` upstream puts on some concert dates.
pub fn strip_date_marker(date: &str) -> &str {
    date.trim_start_matches('*')
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
