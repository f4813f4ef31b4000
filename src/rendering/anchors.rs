//! Named anchor regions of the host template.
//!
//! Every region a render operation touches is looked up once, when the
//! template is loaded, and kept as a name -> node map. A selector that
//! matches nothing fails the load instead of being skipped later.

use scraper::Selector;
use serde::Deserialize;
use std::collections::BTreeMap;

use super::dom::{Document, NodeId};
use crate::error::LoadFailure;

/// Anchor names used by the render operations
pub mod names {
    pub const PAGE_TITLE: &str = "page-title";
    pub const HERO_NAME: &str = "hero-name";
    pub const HERO_TITLE: &str = "hero-title";
    pub const HERO_DESCRIPTION: &str = "hero-description";
    pub const ABOUT_SUBTITLE: &str = "about-subtitle";
    pub const ABOUT_SUMMARY: &str = "about-summary";
    pub const ABOUT_EXPERTISE: &str = "about-expertise";
    pub const ABOUT_INTERESTS: &str = "about-interests";
    pub const TIMELINE: &str = "timeline";
    pub const EDUCATION_CONTAINER: &str = "education-container";
    pub const CERTIFICATIONS_HEADER: &str = "certifications-header";
    pub const PROJECTS_GRID: &str = "projects-grid";
    pub const CONTACT_EMAIL: &str = "contact-email";
    pub const CONTACT_PHONE: &str = "contact-phone";
    pub const CONTACT_LOCATION: &str = "contact-location";
    pub const CONTACT_LANGUAGES: &str = "contact-languages";
    pub const SOCIAL_GITHUB: &str = "social-github";
    pub const SOCIAL_LINKEDIN: &str = "social-linkedin";
}

/// Where an anchor lives in the template
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnchorSpec {
    /// CSS selector evaluated against the whole template
    pub selector: String,

    /// Which match to use; negative values count from the last match
    #[serde(default)]
    pub index: isize,
}

impl AnchorSpec {
    pub fn new(selector: &str, index: isize) -> Self {
        Self {
            selector: selector.to_string(),
            index,
        }
    }
}

/// Anchors matching the stock portfolio template
pub fn default_anchors() -> BTreeMap<String, AnchorSpec> {
    [
        (names::PAGE_TITLE, "title", 0),
        (names::HERO_NAME, ".hero-title", 0),
        (names::HERO_TITLE, ".hero-subtitle", 0),
        (names::HERO_DESCRIPTION, ".hero-description", 0),
        (names::ABOUT_SUBTITLE, "#about .section-subtitle", 0),
        (names::ABOUT_SUMMARY, "#about .glass-card .card-content", 0),
        (names::ABOUT_EXPERTISE, "#about .grid .glass-card .card-content", 0),
        (names::ABOUT_INTERESTS, "#about .grid .glass-card .card-content", 1),
        (names::TIMELINE, ".timeline", 0),
        (names::EDUCATION_CONTAINER, "#education .container", 0),
        (
            names::CERTIFICATIONS_HEADER,
            "#education .container > .section-header",
            -1,
        ),
        (names::PROJECTS_GRID, "#projects .grid", 0),
        (
            names::CONTACT_EMAIL,
            ".contact-item:nth-child(1) .contact-value",
            0,
        ),
        (
            names::CONTACT_PHONE,
            ".contact-item:nth-child(2) .contact-value",
            0,
        ),
        (
            names::CONTACT_LOCATION,
            ".contact-item:nth-child(3) .contact-value",
            0,
        ),
        (names::CONTACT_LANGUAGES, ".glass-card.mt-5 .card-content", 0),
        (names::SOCIAL_GITHUB, ".social-links a:nth-child(1)", 0),
        (names::SOCIAL_LINKEDIN, ".social-links a:nth-child(2)", 0),
    ]
    .into_iter()
    .map(|(name, selector, index)| (name.to_string(), AnchorSpec::new(selector, index)))
    .collect()
}

/// Resolved anchor name -> document node map
#[derive(Debug, Clone, Default)]
pub struct AnchorMap {
    nodes: BTreeMap<String, NodeId>,
}

impl AnchorMap {
    /// Resolve every spec against the parsed template
    pub fn resolve(
        document: &Document,
        specs: &BTreeMap<String, AnchorSpec>,
    ) -> Result<Self, LoadFailure> {
        let mut nodes = BTreeMap::new();

        for (name, spec) in specs {
            let selector =
                Selector::parse(&spec.selector).map_err(|e| LoadFailure::InvalidSelector {
                    name: name.clone(),
                    selector: spec.selector.clone(),
                    reason: format!("{e:?}"),
                })?;

            let not_found = || LoadFailure::AnchorNotFound {
                name: name.clone(),
                selector: spec.selector.clone(),
                index: spec.index,
            };

            let matches = document.select(&selector);
            let node = pick(&matches, spec.index).ok_or_else(not_found)?;

            tracing::trace!(anchor = %name, selector = %spec.selector, "Anchor resolved");
            nodes.insert(name.clone(), node);
        }

        tracing::debug!(anchors = nodes.len(), "Template anchors resolved");
        Ok(Self { nodes })
    }

    /// Look up a resolved anchor
    pub fn get(&self, name: &str) -> Result<NodeId, LoadFailure> {
        self.nodes
            .get(name)
            .copied()
            .ok_or_else(|| LoadFailure::UnknownAnchor(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn pick<T: Copy>(items: &[T], index: isize) -> Option<T> {
    let position = if index >= 0 {
        index as usize
    } else {
        items.len().checked_sub(index.unsigned_abs())?
    };
    items.get(position).copied()
}
