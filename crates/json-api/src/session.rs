//! Cart session resolution.

use std::net::IpAddr;

use salvo::prelude::*;

use scoops_app::domain::carts::SessionId;

use crate::extensions::*;

pub(crate) const SESSION_HEADER: &str = "x-session-id";
pub(crate) const SESSION_COOKIE: &str = "sessionId";

/// Resolve the caller's cart session and store it in the depot.
#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_session(resolve(req));

    ctrl.call_next(req, depot, res).await;
}

fn resolve(req: &Request) -> SessionId {
    let header = req
        .headers()
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok());

    let cookie = req.cookie(SESSION_COOKIE).map(|cookie| cookie.value());

    SessionId::resolve(header, cookie, remote_ip(req))
}

fn remote_ip(req: &Request) -> Option<IpAddr> {
    let addr = req.remote_addr();

    addr.as_ipv4()
        .map(|v4| IpAddr::V4(*v4.ip()))
        .or_else(|| addr.as_ipv6().map(|v6| IpAddr::V6(*v6.ip())))
}

#[cfg(test)]
mod tests {
    use salvo::{
        http::header::COOKIE,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use super::*;

    #[salvo::handler]
    async fn echo_session(depot: &mut Depot, res: &mut Response) {
        let session = depot
            .session_or_500()
            .map_or_else(|_| "missing".to_string(), ToString::to_string);

        res.render(session);
    }

    fn make_service() -> Service {
        Service::new(Router::new().hoop(handler).get(echo_session))
    }

    #[tokio::test]
    async fn test_header_takes_precedence_over_cookie() -> TestResult {
        let body = TestClient::get("http://example.com")
            .add_header(SESSION_HEADER, "from-header", true)
            .add_header(COOKIE, "sessionId=from-cookie", true)
            .send(&make_service())
            .await
            .take_string()
            .await?;

        assert_eq!(body, "from-header");

        Ok(())
    }

    #[tokio::test]
    async fn test_cookie_used_without_header() -> TestResult {
        let body = TestClient::get("http://example.com")
            .add_header(COOKIE, "sessionId=from-cookie", true)
            .send(&make_service())
            .await
            .take_string()
            .await?;

        assert_eq!(body, "from-cookie");

        Ok(())
    }

    #[tokio::test]
    async fn test_blank_header_falls_through() -> TestResult {
        let body = TestClient::get("http://example.com")
            .add_header(SESSION_HEADER, "   ", true)
            .add_header(COOKIE, "sessionId=from-cookie", true)
            .send(&make_service())
            .await
            .take_string()
            .await?;

        assert_eq!(body, "from-cookie");

        Ok(())
    }

    #[tokio::test]
    async fn test_some_session_is_always_resolved() -> TestResult {
        let body = TestClient::get("http://example.com")
            .send(&make_service())
            .await
            .take_string()
            .await?;

        assert_ne!(body, "missing");
        assert!(!body.is_empty(), "expected a fallback session key");

        Ok(())
    }
}
