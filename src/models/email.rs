//! Contact email type and the placeholder filter applied to every address we report.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Loose shape of an address as it appears in free text.
pub const EMAIL_PATTERN: &str = r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}";

/// Domain GitHub hands out to users who hide their address.
const NOREPLY_SUFFIX: &str = "@users.noreply.github.com";

/// Commit author GitHub uses for web edits.
const GIT_PLACEHOLDER: &str = "git@github.com";

const NOREPLY_PREFIX: &str = "noreply";

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex"))
}

fn exact_email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!("^{}$", EMAIL_PATTERN)).expect("email pattern is a valid regex")
    })
}

/// Check whether an address is one of the automatic placeholders.
///
/// Comparison ignores ASCII case and surrounding whitespace.
pub fn is_placeholder(email: &str) -> bool {
    let lower = email.trim().to_ascii_lowercase();
    lower.ends_with(NOREPLY_SUFFIX) || lower == GIT_PLACEHOLDER || lower.starts_with(NOREPLY_PREFIX)
}

/// Returns `false` for an absent or blank address, or for any placeholder form.
///
/// ```
/// use devscout::models::is_valid;
///
/// assert!(is_valid(Some("alice@example.com")));
/// assert!(!is_valid(Some("git@github.com")));
/// assert!(!is_valid(None));
/// ```
pub fn is_valid(email: Option<&str>) -> bool {
    match email.map(str::trim) {
        Some(email) if !email.is_empty() => !is_placeholder(email),
        _ => false,
    }
}

/// Every email-shaped substring of `text`, in order of appearance.
pub fn find_emails(text: &str) -> impl Iterator<Item = &str> {
    email_regex().find_iter(text).map(|m| m.as_str())
}

/// First email-shaped substring of `text` that passes [`is_valid`].
pub fn first_valid_email(text: &str) -> Option<Email> {
    find_emails(text).find_map(Email::parse)
}

/// A contact address that is well-formed and not a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Trim and validate a raw address.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if !is_valid(Some(trimmed)) || !exact_email_regex().is_match(trimmed) {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Email {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("not a usable contact email: {}", value))
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}
