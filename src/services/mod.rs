pub mod card_templates;
pub mod file_watcher;
pub mod pipeline;
pub mod profile_source;
pub mod renderer;
pub mod signal;

pub use card_templates::{Card, CardTemplates, TemplateError};
pub use file_watcher::{FileChangeEvent, FileWatcher};
pub use pipeline::{PortfolioPipeline, RenderedPage};
pub use profile_source::{source_for, FileSource, HttpSource, InlineSource, ProfileSource};
pub use renderer::{DataRenderer, RenderSummary, DEFAULT_TITLE_SUFFIX};
pub use signal::{dispatch_script, CompletionSignal, PortfolioLoaded, DISPATCH_SCRIPT_ID, EVENT_NAME};
