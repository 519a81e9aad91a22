//! Auth middleware.
//!
//! Bearer tokens are verified once per request and the resulting
//! [`Caller`] is stored in the depot for handlers to read.

use std::sync::Arc;

use salvo::{http::header::AUTHORIZATION, prelude::*};
use tracing::{error, warn};

use scoops_app::auth::{AuthServiceError, Caller};

use crate::{extensions::*, state::State};

/// Reject requests without a valid bearer token.
#[salvo::handler]
pub(crate) async fn required(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let caller = match presented_token(req) {
        Ok(token) => authenticate(token, depot).await,
        Err(status) => Err(status),
    };

    match caller {
        Ok(Some(caller)) => depot.insert_caller(caller),
        Ok(None) => {
            res.render(
                StatusError::unauthorized().brief("Missing or invalid Authorization header"),
            );

            return;
        }
        Err(status) => {
            res.render(status);

            return;
        }
    }

    ctrl.call_next(req, depot, res).await;
}

/// Continue as a guest when no token is sent; reject tokens that fail to verify.
#[salvo::handler]
pub(crate) async fn optional(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let caller = match presented_token(req) {
        Ok(token) => authenticate(token, depot).await,
        Err(status) => Err(status),
    };

    match caller {
        Ok(Some(caller)) => depot.insert_caller(caller),
        Ok(None) => {}
        Err(status) => {
            res.render(status);

            return;
        }
    }

    ctrl.call_next(req, depot, res).await;
}

/// Only admit administrators. Must run after [`required`].
#[salvo::handler]
pub(crate) async fn require_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let caller = match depot.caller_or_401() {
        Ok(caller) => caller,
        Err(status) => {
            res.render(status);

            return;
        }
    };

    if !caller.is_admin() {
        warn!(user_id = %caller.user_id, "non-admin caller rejected");

        res.render(StatusError::forbidden().brief("Administrator role required"));

        return;
    }

    ctrl.call_next(req, depot, res).await;
}

fn presented_token(req: &Request) -> Result<Option<&str>, StatusError> {
    if req.headers().get(AUTHORIZATION).is_none() {
        return Ok(None);
    }

    extract_bearer_token(req)
        .map(Some)
        .ok_or_else(|| StatusError::unauthorized().brief("Missing or invalid Authorization header"))
}

async fn authenticate(token: Option<&str>, depot: &Depot) -> Result<Option<Caller>, StatusError> {
    let Some(token) = token else {
        return Ok(None);
    };

    let state = depot.obtain_or_500::<Arc<State>>()?;

    match state.app.auth.authenticate_bearer(token).await {
        Ok(caller) => Ok(Some(caller)),
        Err(AuthServiceError::Token(source)) => {
            warn!("rejected bearer token: {source}");

            Err(StatusError::unauthorized().brief("Invalid API token"))
        }
        Err(AuthServiceError::User(source)) => {
            error!("failed to resolve token subject: {source}");

            Err(StatusError::internal_server_error())
        }
    }
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.splitn(2, ' ');

    let scheme = parts.next()?;
    let token = parts.next()?.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}
