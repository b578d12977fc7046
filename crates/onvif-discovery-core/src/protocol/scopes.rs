//! Scopes string parsing.
//!
//! Devices advertise metadata as a space-delimited list of scope URIs, e.g.
//! `onvif://www.onvif.org/hardware/X-1000 onvif://www.onvif.org/name/Acme%20Corp`.
//! Nothing about the layout is mandatory, so every field is optional.

use std::borrow::Cow;

/// Marker preceding the hardware model
pub const HARDWARE_MARKER: &str = "hardware/";

/// Manufacturer extraction rule: the first token containing `marker`
/// is percent-decoded, reduced to the value following the marker, and
/// passed through `extract`.
#[derive(Debug, Clone, Copy)]
pub struct ScopeRule {
    pub marker: &'static str,
    pub extract: fn(&str) -> String,
}

/// Manufacturer rules in priority order. The first rule whose marker
/// appears in any token decides the result.
pub const MANUFACTURER_RULES: &[ScopeRule] = &[
    ScopeRule {
        marker: "mfr/",
        extract: whole_value,
    },
    ScopeRule {
        marker: "name/",
        extract: first_word,
    },
];

/// Metadata recovered from a scopes string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeInfo {
    pub model: Option<String>,
    pub manufacturer: String,
}

impl ScopeInfo {
    pub fn parse(scopes: &str) -> Self {
        Self {
            model: parse_model(scopes),
            manufacturer: parse_manufacturer(scopes),
        }
    }
}

/// Whitespace-delimited scope tokens.
pub fn tokens(scopes: &str) -> impl Iterator<Item = &str> {
    scopes.split_whitespace()
}

/// Split a space-delimited field (XAddrs, Types) into owned tokens.
pub fn split_list(field: &str) -> Vec<String> {
    field.split_whitespace().map(str::to_owned).collect()
}

/// Text following `hardware/` up to the next whitespace.
pub fn parse_model(scopes: &str) -> Option<String> {
    let start = scopes.find(HARDWARE_MARKER)? + HARDWARE_MARKER.len();
    let model = scopes[start..].split(char::is_whitespace).next().unwrap_or("");
    Some(model.to_string())
}

/// Manufacturer according to [`MANUFACTURER_RULES`], or an empty string.
pub fn parse_manufacturer(scopes: &str) -> String {
    for rule in MANUFACTURER_RULES {
        if let Some(token) = tokens(scopes).find(|t| t.contains(rule.marker)) {
            let decoded = percent_decode(token);
            return (rule.extract)(trailing_segment(&decoded, rule.marker));
        }
    }
    String::new()
}

fn percent_decode(token: &str) -> Cow<'_, str> {
    urlencoding::decode(token).unwrap_or(Cow::Borrowed(token))
}

/// Last path segment after `marker`, ignoring a trailing slash.
fn trailing_segment<'a>(uri: &'a str, marker: &str) -> &'a str {
    let after = uri
        .find(marker)
        .map(|pos| &uri[pos + marker.len()..])
        .unwrap_or("");
    after
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or("")
}

fn whole_value(value: &str) -> String {
    value.trim().to_string()
}

fn first_word(value: &str) -> String {
    value.split(' ').next().unwrap_or("").trim().to_string()
}
