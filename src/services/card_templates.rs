use serde::Serialize;
use std::path::Path;
use tera::{Context, Tera};

use crate::assets::AssetLoader;

/// Error type for card rendering
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Template error: {0}")]
    Tera(#[from] tera::Error),

    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Failed to read template: {0}")]
    Io(#[from] std::io::Error),
}

/// Markup blocks produced from profile entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Card {
    Experience,
    Education,
    Certification,
    Project,
    AboutExpertise,
}

impl Card {
    pub const ALL: [Card; 5] = [
        Card::Experience,
        Card::Education,
        Card::Certification,
        Card::Project,
        Card::AboutExpertise,
    ];

    /// File name of the template, both embedded and in an override directory
    pub fn template_name(self) -> &'static str {
        match self {
            Card::Experience => "experience.html",
            Card::Education => "education.html",
            Card::Certification => "certification.html",
            Card::Project => "project.html",
            Card::AboutExpertise => "about_expertise.html",
        }
    }
}

/// Tera templates for the cards inserted into the page.
///
/// Autoescaping is off: profile values are inserted as markup.
pub struct CardTemplates {
    tera: Tera,
}

impl CardTemplates {
    /// Build the card set, preferring files from `overrides_dir`
    pub fn new(overrides_dir: Option<&Path>) -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);

        let mut overridden = 0;
        for card in Card::ALL {
            let name = card.template_name();
            let source = match overrides_dir.map(|dir| dir.join(name)) {
                Some(path) if path.exists() => {
                    tracing::debug!(path = %path.display(), "Using card template override");
                    overridden += 1;
                    std::fs::read_to_string(&path)?
                }
                _ => AssetLoader::embedded_card(name)
                    .ok_or_else(|| TemplateError::NotFound(name.to_string()))?,
            };
            tera.add_raw_template(name, &source)?;
        }

        tracing::debug!(
            templates = Card::ALL.len(),
            overridden,
            "Card templates initialized"
        );

        Ok(Self { tera })
    }

    /// Render a card with the given context, trimmed of surrounding whitespace
    pub fn render<T: Serialize>(&self, card: Card, data: &T) -> Result<String, TemplateError> {
        let context = Context::from_serialize(data)?;
        let markup = self.tera.render(card.template_name(), &context)?;
        Ok(markup.trim().to_string())
    }
}
