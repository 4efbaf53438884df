//! Resolution of the provider redirect target.
//!
//! The browser reports its page origin when it starts a login. The server only
//! honours that origin if it is the origin the request was actually sent to,
//! or one explicitly allowed in configuration.

use std::fmt;
use user_portal_core::{Origin, Scheme};

/// No usable redirect origin could be determined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoRedirectOrigin;

impl fmt::Display for NoRedirectOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot determine the page origin for the login redirect")
    }
}

impl std::error::Error for NoRedirectOrigin {}

/// Reconstructs the origin a request was addressed to.
///
/// `forwarded_proto` is the `X-Forwarded-Proto` header set by a TLS-terminating
/// proxy; without it `default_scheme` applies.
#[must_use]
pub fn request_origin(
    host: Option<&str>,
    forwarded_proto: Option<&str>,
    default_scheme: Scheme,
) -> Option<Origin> {
    let scheme = forwarded_proto
        .and_then(|p| p.split(',').next())
        .and_then(|p| p.trim().parse().ok())
        .unwrap_or(default_scheme);
    Origin::from_host(scheme, host?.trim()).ok()
}

/// Picks the redirect origin for a login request.
pub fn resolve_redirect_origin(
    requested: Option<&str>,
    request_origin: Option<&Origin>,
    allowed: &[Origin],
) -> Result<Origin, NoRedirectOrigin> {
    if let Some(raw) = requested {
        match Origin::parse(raw) {
            Ok(origin) if allowed.contains(&origin) || request_origin == Some(&origin) => {
                return Ok(origin);
            }
            Ok(origin) => {
                tracing::warn!(%origin, "Ignoring redirect origin that is not allowed");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed redirect origin");
            }
        }
    }

    request_origin.cloned().ok_or(NoRedirectOrigin)
}
