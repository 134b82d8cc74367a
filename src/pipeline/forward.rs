//! Internal forward on the semantic path.

use crate::kernel::{DispatchError, RequestType};
use crate::pipeline::{RequestEvent, Stage, StageOutcome};

/// Re-dispatches a flagged main request on its semantic path and answers
/// with the forwarded response.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardStage;

impl ForwardStage {
    pub const PRIORITY: i32 = 10;
}

impl Stage for ForwardStage {
    fn name(&self) -> &'static str {
        "forward"
    }

    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn handle(&self, event: &mut RequestEvent<'_>) -> Result<StageOutcome, DispatchError> {
        if !event.is_main_request() || !event.request().attributes.needs_forward {
            return Ok(StageOutcome::Continue);
        }
        let Some(kernel) = event.kernel() else {
            tracing::info!("No active request context, skipping forward");
            return Ok(StageOutcome::Continue);
        };

        let request = event.request();
        let semantic = request
            .attributes
            .semantic_pathinfo
            .clone()
            .unwrap_or_else(|| request.path().to_string());

        let mut forward = request.duplicate_with_path(&semantic);
        forward.attributes.needs_forward = false;

        tracing::debug!(from = %request.path(), to = %semantic, "Forwarding request");
        let response = kernel.handle(forward, RequestType::Main)?;
        Ok(StageOutcome::Respond(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{response, Request};
    use crate::kernel::Kernel;
    use axum::http::StatusCode;
    use axum::response::Response;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording {
        seen: Mutex<Vec<(Request, RequestType)>>,
    }

    impl Kernel for Recording {
        fn handle(&self, request: Request, request_type: RequestType) -> Result<Response, DispatchError> {
            self.seen.lock().unwrap().push((request, request_type));
            Ok(response::text(StatusCode::OK, "Success!"))
        }
    }

    struct Failing;

    impl Kernel for Failing {
        fn handle(&self, _: Request, _: RequestType) -> Result<Response, DispatchError> {
            Err(DispatchError::Render("backend down".to_string()))
        }
    }

    fn flagged_request() -> Request {
        let mut request = Request::create("http://example.com/test_sa/foo/bar?some=thing")
            .unwrap()
            .with_cookie("cookie", "value");
        request.attributes.semantic_pathinfo = Some("/foo/something".to_string());
        request.attributes.needs_forward = true;
        request.attributes.set("someAttribute", "someValue");
        request
    }

    #[test]
    fn test_forward() {
        let kernel = Recording::default();
        let mut event = RequestEvent::new(flagged_request(), RequestType::Main).with_kernel(&kernel);

        let outcome = ForwardStage.handle(&mut event).unwrap();
        assert!(matches!(outcome, StageOutcome::Respond(ref r) if r.status() == StatusCode::OK));

        let seen = kernel.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (forwarded, request_type) = &seen[0];
        assert_eq!(*request_type, RequestType::Main);

        let mut expected = Request::create("http://example.com/foo/something?some=thing")
            .unwrap()
            .with_cookie("cookie", "value");
        expected.attributes.semantic_pathinfo = Some("/foo/something".to_string());
        expected.attributes.set("someAttribute", "someValue");
        assert_eq!(forwarded, &expected);
        assert!(!forwarded.attributes.needs_forward);
    }

    #[test]
    fn test_sub_request_is_not_forwarded() {
        let kernel = Recording::default();
        let mut event = RequestEvent::new(flagged_request(), RequestType::Sub).with_kernel(&kernel);

        assert!(matches!(ForwardStage.handle(&mut event).unwrap(), StageOutcome::Continue));
        assert!(kernel.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_not_flagged() {
        let kernel = Recording::default();
        let mut request = flagged_request();
        request.attributes.needs_forward = false;
        let mut event = RequestEvent::new(request, RequestType::Main).with_kernel(&kernel);

        assert!(matches!(ForwardStage.handle(&mut event).unwrap(), StageOutcome::Continue));
        assert!(kernel.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_without_context() {
        let mut event = RequestEvent::new(flagged_request(), RequestType::Main);
        assert!(matches!(ForwardStage.handle(&mut event).unwrap(), StageOutcome::Continue));
        assert!(event.request().attributes.needs_forward);
    }

    #[test]
    fn test_dispatch_error_propagates() {
        let kernel = Failing;
        let mut event = RequestEvent::new(flagged_request(), RequestType::Main).with_kernel(&kernel);
        let err = ForwardStage.handle(&mut event).unwrap_err();
        assert!(matches!(err, DispatchError::Render(ref m) if m == "backend down"));
    }
}
