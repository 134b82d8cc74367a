//! Setup wizard interception.

use std::sync::Arc;

use axum::http::StatusCode;

use crate::http::response;
use crate::kernel::collaborators::SETUP_ROUTE;
use crate::kernel::{DispatchError, RoutingContext, UrlGenerator};
use crate::pipeline::{RequestEvent, Stage, StageOutcome};

/// Redirects every main request to the setup route while the request is
/// bound to the setup siteaccess.
pub struct SetupStage {
    setup_siteaccess: String,
    urls: Arc<dyn UrlGenerator>,
}

impl SetupStage {
    pub const PRIORITY: i32 = 190;

    pub fn new(setup_siteaccess: impl Into<String>, urls: Arc<dyn UrlGenerator>) -> Self {
        Self {
            setup_siteaccess: setup_siteaccess.into(),
            urls,
        }
    }
}

impl Stage for SetupStage {
    fn name(&self) -> &'static str {
        "setup"
    }

    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn handle(&self, event: &mut RequestEvent<'_>) -> Result<StageOutcome, DispatchError> {
        if !event.is_main_request() {
            return Ok(StageOutcome::Continue);
        }
        if event.kernel().is_none() {
            tracing::info!("No active request context, skipping setup check");
            return Ok(StageOutcome::Continue);
        }

        let request = event.request();
        if request.siteaccess_name() != Some(self.setup_siteaccess.as_str()) {
            return Ok(StageOutcome::Continue);
        }

        let context = RoutingContext::from_request(request);
        let setup_uri = match self.urls.generate(SETUP_ROUTE, &context) {
            Ok(uri) => uri,
            Err(e) => {
                tracing::warn!(error = %e, "Cannot generate setup URL, skipping setup check");
                return Ok(StageOutcome::Continue);
            }
        };

        if format!("{}{}", context.base_url, request.path()) == setup_uri {
            return Ok(StageOutcome::Continue);
        }

        tracing::debug!(target_url = %setup_uri, "Redirecting to setup");
        Ok(StageOutcome::Respond(response::redirect(
            &setup_uri,
            StatusCode::FOUND,
        )?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Request;
    use crate::kernel::{Kernel, RequestType, RouteTable};
    use crate::routing::SiteAccess;
    use axum::response::Response;

    struct NeverCalled;

    impl Kernel for NeverCalled {
        fn handle(&self, _: Request, _: RequestType) -> Result<Response, DispatchError> {
            panic!("setup must not dispatch");
        }
    }

    fn stage() -> SetupStage {
        SetupStage::new("setup", Arc::new(RouteTable::new().with_route(SETUP_ROUTE, "/setup")))
    }

    fn request(url: &str, siteaccess: &str) -> Request {
        let mut request = Request::create(url).unwrap();
        request.attributes.siteaccess = Some(SiteAccess::default_for(siteaccess));
        request
    }

    #[test]
    fn test_redirects_to_setup() {
        let kernel = NeverCalled;
        let mut event = RequestEvent::new(request("http://example.com/foo/bar", "setup"), RequestType::Main)
            .with_kernel(&kernel);

        match stage().handle(&mut event).unwrap() {
            StageOutcome::Respond(response) => {
                assert_eq!(response.status(), StatusCode::FOUND);
                assert_eq!(response::location(&response), Some("/setup"));
            }
            other => panic!("expected a redirect, got {other:?}"),
        }
    }

    #[test]
    fn test_already_on_setup_uri() {
        let kernel = NeverCalled;
        let mut event = RequestEvent::new(request("http://example.com/setup", "setup"), RequestType::Main)
            .with_kernel(&kernel);
        assert!(matches!(stage().handle(&mut event).unwrap(), StageOutcome::Continue));
    }

    #[test]
    fn test_other_siteaccess() {
        let kernel = NeverCalled;
        let mut event = RequestEvent::new(request("http://example.com/foo", "foobar"), RequestType::Main)
            .with_kernel(&kernel);
        assert!(matches!(stage().handle(&mut event).unwrap(), StageOutcome::Continue));
    }

    #[test]
    fn test_sub_request_and_missing_context() {
        let kernel = NeverCalled;
        let mut sub = RequestEvent::new(request("http://example.com/foo", "setup"), RequestType::Sub)
            .with_kernel(&kernel);
        assert!(matches!(stage().handle(&mut sub).unwrap(), StageOutcome::Continue));

        let mut offline = RequestEvent::new(request("http://example.com/foo", "setup"), RequestType::Main);
        assert!(matches!(stage().handle(&mut offline).unwrap(), StageOutcome::Continue));
    }

    #[test]
    fn test_undefined_route_is_not_fatal() {
        let kernel = NeverCalled;
        let stage = SetupStage::new("setup", Arc::new(RouteTable::new()));
        let mut event = RequestEvent::new(request("http://example.com/foo", "setup"), RequestType::Main)
            .with_kernel(&kernel);
        assert!(matches!(stage.handle(&mut event).unwrap(), StageOutcome::Continue));
    }
}
