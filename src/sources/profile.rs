//! Profile page email source.

use async_trait::async_trait;
use scraper::{Html, Selector};

use crate::github::GitHubClient;
use crate::models::{first_valid_email, Email};
use crate::sources::{EmailSource, SourceError};

/// Elements whose text is never rendered
const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Scrapes the public GitHub profile page.
///
/// The structured `itemprop="email"` field wins; otherwise the first valid
/// address in the visible page text is used.
#[derive(Debug, Clone)]
pub struct ProfilePageSource {
    client: GitHubClient,
}

impl ProfilePageSource {
    pub fn new(client: GitHubClient) -> Self {
        Self { client }
    }

    /// Email from the profile page, absent on any failure
    pub async fn extract_from_profile(&self, username: &str) -> Option<Email> {
        self.find(username).await
    }

    /// Find an email in a profile page document
    pub fn parse_profile(html: &str) -> Result<Email, SourceError> {
        let document = Html::parse_document(html);

        if let Some(email) = structured_email(&document) {
            tracing::debug!("Found email in profile field: {}", email);
            return Ok(email);
        }

        if let Some(email) = first_valid_email(&visible_text(&document)) {
            tracing::debug!("Backup email from profile text: {}", email);
            return Ok(email);
        }

        Err(SourceError::NotFound("no email on profile page".to_string()))
    }
}

/// Address from the `mailto:` link inside the `itemprop="email"` element
fn structured_email(document: &Html) -> Option<Email> {
    let selector = Selector::parse(r#"[itemprop="email"] a[href]"#).ok()?;
    document
        .select(&selector)
        .filter_map(|link| link.value().attr("href"))
        .filter_map(mailto_address)
        .find_map(|address| Email::parse(&address))
}

/// Strip the `mailto:` scheme and any `?subject=` suffix, then percent-decode
fn mailto_address(href: &str) -> Option<String> {
    let href = href.trim();
    let scheme = href.get(..7)?;
    if !scheme.eq_ignore_ascii_case("mailto:") {
        return None;
    }

    let rest = &href[7..];
    let address = rest.split_once('?').map_or(rest, |(address, _)| address);
    urlencoding::decode(address)
        .ok()
        .map(|decoded| decoded.trim().to_string())
}

/// Text nodes outside script-like elements, space separated
fn visible_text(document: &Html) -> String {
    document
        .root_element()
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node
                .parent()
                .and_then(|parent| parent.value().as_element())
                .is_some_and(|element| HIDDEN_ELEMENTS.contains(&element.name()));
            (!hidden).then(|| &**text)
        })
        .collect::<Vec<&str>>()
        .join(" ")
}

#[async_trait]
impl EmailSource for ProfilePageSource {
    fn id(&self) -> &str {
        "profile"
    }

    fn name(&self) -> &str {
        "Profile page"
    }

    async fn lookup(&self, username: &str) -> Result<Email, SourceError> {
        let html = self.client.profile_page(username).await?;
        Self::parse_profile(&html)
    }
}
