//! Populates the anchor regions of a [`Page`] from a [`Profile`].
//!
//! Every operation replaces the content it owns, so running it again with
//! the same input leaves the page unchanged.

use regex::Regex;
use serde_json::json;
use std::sync::OnceLock;

use crate::error::LoadFailure;
use crate::models::profile::present;
use crate::models::{About, Certification, Education, Experience, Hero, Personal, Profile, Project};
use crate::rendering::anchors::names;
use crate::rendering::{Document, NodeId, Page};
use crate::services::card_templates::{Card, CardTemplates};

/// Default text after the owner's name in the page title
pub const DEFAULT_TITLE_SUFFIX: &str = "Data Scientist Portfolio";

/// Inline style properties that keep content hidden until it is loaded
const HIDING_PROPERTIES: &[&str] = &["opacity", "transform"];

/// Number of cards rendered per list section
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSummary {
    pub experience: usize,
    pub education: usize,
    pub certifications: usize,
    pub projects: usize,
}

/// Applies a profile to a page, one section at a time
pub struct DataRenderer<'a> {
    cards: &'a CardTemplates,
    title_suffix: &'a str,
}

impl<'a> DataRenderer<'a> {
    pub fn new(cards: &'a CardTemplates, title_suffix: &'a str) -> Self {
        Self {
            cards,
            title_suffix,
        }
    }

    /// Run every section in order, then finalize.
    ///
    /// The first failing section aborts the remaining ones.
    pub fn render_all(
        &self,
        page: &mut Page,
        profile: &Profile,
    ) -> Result<RenderSummary, LoadFailure> {
        self.render_identity(page, &profile.personal)?;
        self.render_hero(page, &profile.personal, &profile.hero)?;
        self.render_about(page, &profile.about)?;
        let summary = RenderSummary {
            experience: self.render_experience(page, &profile.experience)?,
            education: self.render_education(page, &profile.education)?,
            certifications: self.render_certifications(page, &profile.certifications)?,
            projects: self.render_projects(page, &profile.projects)?,
        };
        self.render_contact(page, &profile.personal)?;
        self.finalize(page)?;
        Ok(summary)
    }

    pub fn render_identity(&self, page: &mut Page, personal: &Personal) -> Result<(), LoadFailure> {
        let title = page.anchor(names::PAGE_TITLE)?;
        page.document
            .set_text(title, &format!("{} - {}", personal.name, self.title_suffix))?;
        Ok(())
    }

    pub fn render_hero(
        &self,
        page: &mut Page,
        personal: &Personal,
        hero: &Hero,
    ) -> Result<(), LoadFailure> {
        set_anchor_text(page, names::HERO_NAME, &personal.name)?;
        set_anchor_text(page, names::HERO_TITLE, &personal.title)?;
        set_anchor_text(page, names::HERO_DESCRIPTION, &hero.description)
    }

    pub fn render_about(&self, page: &mut Page, about: &About) -> Result<(), LoadFailure> {
        set_anchor_text(page, names::ABOUT_SUBTITLE, &about.subtitle)?;
        set_anchor_text(page, names::ABOUT_SUMMARY, &about.professional_summary)?;

        let markup = self.cards.render(
            Card::AboutExpertise,
            &json!({ "expertise": about.technical_expertise }),
        )?;
        let expertise = page.anchor(names::ABOUT_EXPERTISE)?;
        page.document.set_html(expertise, &markup)?;

        set_anchor_text(page, names::ABOUT_INTERESTS, &about.interests)
    }

    /// Rebuild the timeline, one item per entry
    pub fn render_experience(
        &self,
        page: &mut Page,
        experiences: &[Experience],
    ) -> Result<usize, LoadFailure> {
        let timeline = page.anchor(names::TIMELINE)?;
        page.document.clear_children(timeline)?;

        for experience in experiences {
            let markup = self
                .cards
                .render(Card::Experience, &json!({ "experience": experience }))?;
            page.document.append_html(timeline, &markup)?;
        }
        Ok(experiences.len())
    }

    /// Replace the education cards, keeping them ahead of the certifications header
    pub fn render_education(
        &self,
        page: &mut Page,
        education: &[Education],
    ) -> Result<usize, LoadFailure> {
        let container = page.anchor(names::EDUCATION_CONTAINER)?;
        let header = page.anchor(names::CERTIFICATIONS_HEADER)?;
        remove_cards(&mut page.document, container, "education-card");

        for entry in education {
            let markup = self.cards.render(
                Card::Education,
                &json!({ "education": entry, "content": entry.content() }),
            )?;
            page.document.insert_html_before(header, &markup)?;
        }
        Ok(education.len())
    }

    /// Replace the certification cards at the end of the education container
    pub fn render_certifications(
        &self,
        page: &mut Page,
        certifications: &[Certification],
    ) -> Result<usize, LoadFailure> {
        let container = page.anchor(names::EDUCATION_CONTAINER)?;
        remove_cards(&mut page.document, container, "cert-card");

        for (index, certification) in certifications.iter().enumerate() {
            let markup = self.cards.render(
                Card::Certification,
                &json!({
                    "certification": certification,
                    "body": certification.body(),
                    "last": index + 1 == certifications.len(),
                }),
            )?;
            page.document.append_html(container, &markup)?;
        }
        Ok(certifications.len())
    }

    pub fn render_projects(
        &self,
        page: &mut Page,
        projects: &[Project],
    ) -> Result<usize, LoadFailure> {
        let grid = page.anchor(names::PROJECTS_GRID)?;
        page.document.clear_children(grid)?;

        for project in projects {
            let markup = self.cards.render(
                Card::Project,
                &json!({
                    "project": project,
                    "coauthor": present(&project.coauthor),
                    "link": present(&project.link),
                }),
            )?;
            page.document.append_html(grid, &markup)?;
        }
        Ok(projects.len())
    }

    pub fn render_contact(&self, page: &mut Page, personal: &Personal) -> Result<(), LoadFailure> {
        let email = page.anchor(names::CONTACT_EMAIL)?;
        page.document.set_text(email, &personal.email)?;
        page.document
            .set_attr(email, "href", &format!("mailto:{}", personal.email))?;

        let phone = page.anchor(names::CONTACT_PHONE)?;
        page.document.set_text(phone, &format_phone(&personal.phone))?;
        page.document
            .set_attr(phone, "href", &format!("tel:{}", personal.phone))?;

        set_anchor_text(page, names::CONTACT_LOCATION, &personal.location)?;
        set_anchor_text(
            page,
            names::CONTACT_LANGUAGES,
            &personal.languages.join(" • "),
        )?;

        let github = page.anchor(names::SOCIAL_GITHUB)?;
        page.document.set_attr(
            github,
            "href",
            &format!("https://github.com/{}", personal.github),
        )?;

        let linkedin = page.anchor(names::SOCIAL_LINKEDIN)?;
        page.document.set_attr(
            linkedin,
            "href",
            &format!("https://linkedin.com/in/{}", personal.linkedin),
        )?;
        Ok(())
    }

    /// Drop the inline styles that hide sections and animated elements.
    ///
    /// Returns how many elements had their style changed.
    pub fn finalize(&self, page: &mut Page) -> Result<usize, LoadFailure> {
        let document = &mut page.document;
        let mut revealed = 0;

        for id in document.descendant_elements(document.root()) {
            let animated = document.attr(id, "data-animate").is_some();
            let section = document.tag_name(id) == Some("section");
            if !(animated || section) {
                continue;
            }
            let Some(style) = document.attr(id, "style") else {
                continue;
            };

            let cleaned = strip_style_properties(style, HIDING_PROPERTIES);
            if cleaned == style {
                continue;
            }
            if cleaned.is_empty() {
                document.remove_attr(id, "style");
            } else {
                document.set_attr(id, "style", &cleaned)?;
            }
            revealed += 1;
        }

        tracing::debug!(revealed, "Removed hiding styles");
        Ok(revealed)
    }
}

fn set_anchor_text(page: &mut Page, name: &str, text: &str) -> Result<(), LoadFailure> {
    let id = page.anchor(name)?;
    page.document.set_text(id, text)?;
    Ok(())
}

/// Detach every descendant of `container` carrying `class`
fn remove_cards(document: &mut Document, container: NodeId, class: &str) -> usize {
    let cards: Vec<NodeId> = document
        .descendant_elements(container)
        .into_iter()
        .filter(|id| document.has_class(*id, class))
        .collect();
    for card in &cards {
        document.detach(*card);
    }
    cards.len()
}

/// Display form of an international phone number: `+38512345678` becomes
/// `+385 12 345 678`. Numbers in any other shape are returned unchanged.
pub fn format_phone(phone: &str) -> String {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"(\+[0-9]{3})([0-9]{2})([0-9]{3})([0-9]{3})").expect("phone pattern is valid")
    });
    pattern.replace(phone, "$1 $2 $3 $4").into_owned()
}

/// Remove the named properties from an inline style declaration list
pub fn strip_style_properties(style: &str, properties: &[&str]) -> String {
    style
        .split(';')
        .map(str::trim)
        .filter(|declaration| !declaration.is_empty())
        .filter(|declaration| {
            let property = declaration
                .split(':')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase();
            !properties.contains(&property.as_str())
        })
        .collect::<Vec<_>>()
        .join("; ")
}
