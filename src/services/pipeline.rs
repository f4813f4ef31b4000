use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;

use crate::assets::AssetLoader;
use crate::error::LoadFailure;
use crate::models::{AppConfig, Profile};
use crate::rendering::Page;
use crate::services::card_templates::CardTemplates;
use crate::services::profile_source::{source_for, ProfileSource};
use crate::services::renderer::{DataRenderer, RenderSummary};
use crate::services::signal::{dispatch_script, CompletionSignal, DISPATCH_SCRIPT_ID};

/// Result of a successful run
pub struct RenderedPage {
    pub page: Page,
    pub summary: RenderSummary,
    pub rendered_at: DateTime<Utc>,
}

impl RenderedPage {
    pub fn html(&self) -> String {
        self.page.to_html()
    }
}

/// Pipeline that orchestrates fetch → parse → template → render → signal
pub struct PortfolioPipeline {
    config: Arc<AppConfig>,
    assets: Arc<AssetLoader>,
    source: Box<dyn ProfileSource>,
    signal: CompletionSignal,
}

impl PortfolioPipeline {
    pub fn new(config: Arc<AppConfig>, assets: Arc<AssetLoader>) -> Self {
        let source = source_for(&config, assets.clone());
        Self {
            config,
            assets,
            source,
            signal: CompletionSignal::new(),
        }
    }

    /// Replace the configured profile source
    pub fn with_source(mut self, source: Box<dyn ProfileSource>) -> Self {
        self.source = source;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn signal(&self) -> &CompletionSignal {
        &self.signal
    }

    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    /// Raw template text, as served when a run fails
    pub fn placeholder_page(&self) -> Result<String, LoadFailure> {
        self.assets
            .read_site_string(&self.config.template)
            .map_err(|source| LoadFailure::Asset {
                path: self.config.template.display().to_string(),
                source,
            })
    }

    /// Parse the template and resolve its anchors
    pub fn load_page(&self) -> Result<Page, LoadFailure> {
        let source = self.placeholder_page()?;
        Page::parse(&source, &self.config.anchor_specs())
    }

    /// Fetch and parse the profile document
    pub async fn fetch_profile(&self) -> Result<Profile, LoadFailure> {
        let text = self.source.fetch().await?;
        Ok(Profile::from_json(&text)?)
    }

    /// Card templates, with overrides re-read from disk on every call
    pub fn card_templates(&self) -> Result<CardTemplates, LoadFailure> {
        Ok(CardTemplates::new(self.cards_dir().as_deref())?)
    }

    /// Populate a page from a profile, then fire the completion signal.
    ///
    /// The page itself carries the browser side of the signal: a script that
    /// raises the completion event once it is parsed.
    pub fn render_into(
        &self,
        page: &mut Page,
        profile: &Profile,
    ) -> Result<RenderSummary, LoadFailure> {
        let cards = self.card_templates()?;
        let renderer = DataRenderer::new(&cards, &self.config.title_suffix);
        let summary = renderer.render_all(page, profile)?;
        page.replace_body_script(DISPATCH_SCRIPT_ID, &dispatch_script())?;
        self.signal.fire();
        Ok(summary)
    }

    /// Full run: fetch the profile, load the template and render into it
    pub async fn run(&self) -> Result<RenderedPage, LoadFailure> {
        let source = self.source.describe();
        let result = self.run_steps().await;

        match &result {
            Ok(rendered) => tracing::info!(
                %source,
                experience = rendered.summary.experience,
                education = rendered.summary.education,
                certifications = rendered.summary.certifications,
                projects = rendered.summary.projects,
                "Portfolio rendered"
            ),
            Err(e) => tracing::error!(%source, error = %e, "Error loading portfolio data"),
        }

        result
    }

    async fn run_steps(&self) -> Result<RenderedPage, LoadFailure> {
        let profile = self.fetch_profile().await?;
        let mut page = self.load_page()?;
        let summary = self.render_into(&mut page, &profile)?;

        Ok(RenderedPage {
            page,
            summary,
            rendered_at: Utc::now(),
        })
    }

    /// Override directory, relative paths resolved against the site directory
    fn cards_dir(&self) -> Option<PathBuf> {
        let dir = self.config.cards_dir.as_ref()?;
        if dir.is_absolute() {
            return Some(dir.clone());
        }
        Some(match self.assets.site_dir() {
            Some(site) => site.join(dir),
            None => dir.clone(),
        })
    }
}
