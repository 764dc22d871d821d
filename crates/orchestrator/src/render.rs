//! Entity renderer: a charity becomes a display card.
//!
//! Pure and stateless. Used by both the survey results and the daily picks.

use std::fmt;

use survey_model::Charity;

/// Shown when a charity has no usable location
pub const LOCATION_FALLBACK: &str = "Location not listed";

/// Link to an organization's own site.
///
/// Opens in a new browsing context without a reference back to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalLink {
    pub href: String,
    pub label: String,
    pub target: &'static str,
    pub rel: &'static str,
}

impl ExternalLink {
    fn new(href: &str) -> Self {
        Self {
            href: href.to_string(),
            label: "Visit website".to_string(),
            target: "_blank",
            rel: "noopener noreferrer",
        }
    }
}

/// Display fragment for one charity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharityCard {
    pub title: String,
    pub summary: Option<String>,
    pub location: String,
    pub ein: Option<String>,
    pub link: Option<ExternalLink>,
}

/// Render a charity into a card
pub fn render_charity(charity: &Charity) -> CharityCard {
    let location = charity
        .location
        .as_ref()
        .map(|location| location.places())
        .filter(|places| !places.is_empty())
        .map(|places| places.join(", "))
        .unwrap_or_else(|| LOCATION_FALLBACK.to_string());

    CharityCard {
        title: charity.name.clone(),
        summary: present(charity.summary.as_deref()),
        location,
        ein: present(charity.ein.as_deref()),
        link: present(charity.url.as_deref()).map(|url| ExternalLink::new(&url)),
    }
}

fn present(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

impl fmt::Display for CharityCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        if let Some(summary) = &self.summary {
            writeln!(f, "  {}", summary)?;
        }
        writeln!(f, "  Location: {}", self.location)?;
        if let Some(ein) = &self.ein {
            writeln!(f, "  EIN: {}", ein)?;
        }
        if let Some(link) = &self.link {
            writeln!(f, "  {}: {}", link.label, link.href)?;
        }
        Ok(())
    }
}
