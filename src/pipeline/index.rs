//! Index page substitution.

use std::sync::Arc;

use crate::kernel::{ConfigResolver, DispatchError};
use crate::pipeline::{RequestEvent, Stage, StageOutcome};

/// Rewrites a root semantic path to the configured index page and flags
/// the request for an internal forward.
pub struct IndexStage {
    config: Arc<dyn ConfigResolver>,
}

impl IndexStage {
    pub const PRIORITY: i32 = 40;

    pub fn new(config: Arc<dyn ConfigResolver>) -> Self {
        Self { config }
    }
}

impl Stage for IndexStage {
    fn name(&self) -> &'static str {
        "index"
    }

    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn handle(&self, event: &mut RequestEvent<'_>) -> Result<StageOutcome, DispatchError> {
        let request = event.request_mut();
        let is_root = matches!(
            request.attributes.semantic_pathinfo.as_deref(),
            Some("") | Some("/")
        );
        if !is_root {
            return Ok(StageOutcome::Continue);
        }

        let Some(index_page) = self.config.index_page(request.siteaccess_name()) else {
            tracing::debug!(siteaccess = ?request.siteaccess_name(), "No index page configured");
            return Ok(StageOutcome::Continue);
        };

        let index_page = if index_page.starts_with('/') {
            index_page
        } else {
            format!("/{index_page}")
        };
        request.attributes.semantic_pathinfo = Some(index_page);
        request.attributes.needs_forward = true;
        Ok(StageOutcome::Mutated)
    }
}
