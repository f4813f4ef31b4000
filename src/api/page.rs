use axum::response::Html;
use std::collections::BTreeMap;

use crate::error::ApiError;
use crate::rendering::Page;
use crate::services::PortfolioPipeline;

use super::dev::RELOAD_SCRIPT;

/// Render the portfolio page for one request.
///
/// A failed run serves the template with its placeholder content. Only a
/// template that cannot be read at all turns into an error response.
pub async fn handle_page(
    pipeline: &PortfolioPipeline,
    live_reload: bool,
) -> Result<Html<String>, ApiError> {
    let mut page = match pipeline.run().await {
        Ok(rendered) => rendered.page,
        Err(_) => {
            let placeholder = pipeline.placeholder_page()?;
            if !live_reload {
                return Ok(Html(placeholder));
            }
            Page::parse(&placeholder, &BTreeMap::new())?
        }
    };

    if live_reload {
        page.append_to_body(RELOAD_SCRIPT)?;
    }

    Ok(Html(page.to_html()))
}
