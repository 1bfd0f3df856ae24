//! Placeholder resolution.
//!
//! A `Replacer` holds request-scoped variables and substitutes `{key}`
//! placeholders in templates. `\{` and `\}` are literal braces, an unclosed
//! `{` leaves the rest of the input untouched, and `{}` is kept as-is.
//!
//! Besides variables set explicitly, a few keys are resolved at lookup time:
//! `env.<NAME>`, `time.now.unix` and `time.now.unix_ms`. Short forms such as
//! `{method}` or `{header.User-Agent}` expand to their `http.request.*` keys.

mod request;

use std::borrow::Cow;
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

const HEADER_PREFIX: &str = "http.request.header.";

/// Short names and the full key they stand for.
const SHORTHANDS: &[(&str, &str)] = &[
    ("method", "http.request.method"),
    ("path", "http.request.uri.path"),
    ("query", "http.request.uri.query"),
    ("uri", "http.request.uri"),
    ("host", "http.request.host"),
    ("hostport", "http.request.hostport"),
    ("port", "http.request.port"),
    ("scheme", "http.request.scheme"),
    ("remote", "http.request.remote"),
    ("remote_host", "http.request.remote.host"),
    ("remote_port", "http.request.remote.port"),
];

/// Prefix short forms, e.g. `{query.id}` -> `{http.request.uri.query.id}`.
const SHORTHAND_PREFIXES: &[(&str, &str)] = &[
    ("header.", HEADER_PREFIX),
    ("query.", "http.request.uri.query."),
    ("cookie.", "http.request.cookie."),
];

#[derive(Debug, Clone, Default)]
pub struct Replacer {
    vars: HashMap<String, String>,
}

impl Replacer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        let key = normalize(key.as_ref()).into_owned();
        self.vars.insert(key, value.into());
    }

    /// Look up a placeholder value by key (without braces).
    pub fn get(&self, key: &str) -> Option<String> {
        let key = normalize(key);
        if let Some(value) = self.vars.get(key.as_ref()) {
            return Some(value.clone());
        }
        global(&key)
    }

    /// Replace every placeholder; unknown ones become `empty`.
    pub fn replace_all(&self, input: &str, empty: &str) -> String {
        self.replace(input, Some(empty))
    }

    /// Replace known placeholders and leave unknown ones untouched.
    pub fn replace_known(&self, input: &str) -> String {
        self.replace(input, None)
    }

    fn replace(&self, input: &str, unknown: Option<&str>) -> String {
        let bytes = input.as_bytes();
        let mut out = String::with_capacity(input.len());
        // Start of the literal run not yet copied to `out`.
        let mut last = 0;
        let mut i = 0;

        while i < bytes.len() {
            match bytes[i] {
                b'\\' if matches!(bytes.get(i + 1), Some(b'{') | Some(b'}')) => {
                    out.push_str(&input[last..i]);
                    out.push(bytes[i + 1] as char);
                    i += 2;
                    last = i;
                }
                b'{' => {
                    let Some(len) = input[i + 1..].find('}') else {
                        break;
                    };
                    let end = i + 1 + len;
                    let key = &input[i + 1..end];
                    if key.is_empty() {
                        i = end + 1;
                        continue;
                    }
                    out.push_str(&input[last..i]);
                    match (self.get(key), unknown) {
                        (Some(value), _) => out.push_str(&value),
                        (None, Some(empty)) => out.push_str(empty),
                        (None, None) => out.push_str(&input[i..=end]),
                    }
                    i = end + 1;
                    last = i;
                }
                _ => i += 1,
            }
        }

        out.push_str(&input[last..]);
        out
    }
}

/// Expand short forms and lowercase header names.
fn normalize(key: &str) -> Cow<'_, str> {
    let key: Cow<'_, str> = if let Some((_, full)) =
        SHORTHANDS.iter().find(|(short, _)| *short == key)
    {
        Cow::Borrowed(*full)
    } else if let Some((prefix, full)) = SHORTHAND_PREFIXES
        .iter()
        .find(|(prefix, _)| key.starts_with(prefix))
    {
        Cow::Owned(format!("{}{}", full, &key[prefix.len()..]))
    } else {
        Cow::Borrowed(key)
    };

    let lowered = key
        .strip_prefix(HEADER_PREFIX)
        .filter(|name| name.bytes().any(|b| b.is_ascii_uppercase()))
        .map(|name| format!("{}{}", HEADER_PREFIX, name.to_ascii_lowercase()));
    match lowered {
        Some(lowered) => Cow::Owned(lowered),
        None => key,
    }
}

/// Keys that do not depend on the request.
fn global(key: &str) -> Option<String> {
    if let Some(name) = key.strip_prefix("env.") {
        return std::env::var(name).ok();
    }
    let since_epoch = || SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    match key {
        "time.now.unix" => Some(since_epoch().as_secs().to_string()),
        "time.now.unix_ms" => Some(since_epoch().as_millis().to_string()),
        _ => None,
    }
}
