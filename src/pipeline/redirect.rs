//! Permanent redirect on the semantic path.

use crate::http::response;
use crate::kernel::DispatchError;
use crate::pipeline::{RequestEvent, Stage, StageOutcome};

/// Answers a flagged main request with a `301` to its semantic path,
/// keeping the original query string verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedirectStage;

impl RedirectStage {
    pub const PRIORITY: i32 = 0;
}

impl Stage for RedirectStage {
    fn name(&self) -> &'static str {
        "redirect"
    }

    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn handle(&self, event: &mut RequestEvent<'_>) -> Result<StageOutcome, DispatchError> {
        let request = event.request();
        if !event.is_main_request() || !request.attributes.needs_redirect {
            return Ok(StageOutcome::Continue);
        }

        let attributes = &request.attributes;
        let mut target = attributes
            .semantic_pathinfo
            .clone()
            .unwrap_or_else(|| request.path().to_string());

        if attributes.prepend_siteaccess_on_redirect {
            if let Some(lexer) = attributes.siteaccess.as_ref().and_then(|sa| sa.uri_lexer()) {
                target = lexer.analyse_link(&target);
            }
        }

        let query = request.query_string();
        if !query.is_empty() {
            target.push('?');
            target.push_str(query);
        }

        tracing::debug!(target_url = %target, "Redirecting permanently");
        Ok(StageOutcome::Respond(response::permanent_redirect(&target)?))
    }
}
