//! Application bootstrap.
//!
//! Bootstrapping builds the authentication plugin configuration from the page
//! origin, installs it, and mounts [`App`](crate::app::App) (which owns the
//! router) into the `#app` element. It happens once per page load.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use user_portal_core::Origin;
use user_portal_identity::Auth0Config;
use user_portal_identity::config::{DEFAULT_CLIENT_ID, DEFAULT_DOMAIN};

/// Id of the element the application renders into.
pub const MOUNT_POINT_ID: &str = "app";

/// Result of a mount attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountOutcome {
    /// This call mounted the application.
    Mounted,
    /// An earlier call already did; nothing was done.
    AlreadyMounted,
}

/// Bootstrap failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapError {
    /// Not running inside a browser window with a document.
    NoWindow,
    /// The page has no element with the mount point id.
    MissingMountPoint { id: String },
    /// The browser reported an origin that cannot be a redirect target.
    InvalidOrigin { origin: String, reason: String },
}

impl fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWindow => write!(f, "no browser window or document"),
            Self::MissingMountPoint { id } => write!(f, "mount point '#{id}' not found"),
            Self::InvalidOrigin { origin, reason } => {
                write!(f, "invalid page origin '{origin}': {reason}")
            }
        }
    }
}

impl std::error::Error for BootstrapError {}

/// Ensures the application is mounted at most once.
#[derive(Debug, Default)]
pub struct MountGuard {
    mounted: AtomicBool,
}

impl MountGuard {
    /// Creates a guard that has not mounted anything.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mounted: AtomicBool::new(false),
        }
    }

    /// Returns true once a mount has succeeded.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    /// Locates the element with `id` and mounts into it, unless already mounted.
    ///
    /// A missing element leaves the guard unset so a later attempt can succeed.
    pub fn mount_with<T>(
        &self,
        id: &str,
        locate: impl FnOnce(&str) -> Option<T>,
        mount: impl FnOnce(T),
    ) -> Result<MountOutcome, BootstrapError> {
        if self.is_mounted() {
            return Ok(MountOutcome::AlreadyMounted);
        }

        let target = locate(id).ok_or_else(|| BootstrapError::MissingMountPoint {
            id: id.to_string(),
        })?;

        if self
            .mounted
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(MountOutcome::AlreadyMounted);
        }

        mount(target);
        Ok(MountOutcome::Mounted)
    }
}

/// Plugin configuration for a page served from `origin`.
///
/// Tenant and client id default to the built-in values and can be replaced at
/// build time through `AUTH0_DOMAIN` and `AUTH0_CLIENT_ID`.
#[must_use]
pub fn plugin_config(origin: &Origin) -> Auth0Config {
    Auth0Config::new(
        option_env!("AUTH0_DOMAIN")
            .unwrap_or(DEFAULT_DOMAIN)
            .to_string(),
        option_env!("AUTH0_CLIENT_ID")
            .unwrap_or(DEFAULT_CLIENT_ID)
            .to_string(),
    )
    .for_origin(origin)
}

#[cfg(feature = "csr")]
static MOUNT_GUARD: MountGuard = MountGuard::new();

/// Mounts the application into `#app` with the plugin configured for the
/// current page origin.
#[cfg(feature = "csr")]
pub fn mount_app() -> Result<MountOutcome, BootstrapError> {
    use crate::{app::App, auth::client::provide_auth_client};
    use leptos::prelude::*;
    use wasm_bindgen::JsCast;

    if MOUNT_GUARD.is_mounted() {
        return Ok(MountOutcome::AlreadyMounted);
    }

    let window = web_sys::window().ok_or(BootstrapError::NoWindow)?;
    let document = window.document().ok_or(BootstrapError::NoWindow)?;
    let raw_origin = window
        .location()
        .origin()
        .map_err(|_| BootstrapError::NoWindow)?;
    let origin = Origin::parse(&raw_origin).map_err(|e| BootstrapError::InvalidOrigin {
        origin: raw_origin.clone(),
        reason: e.to_string(),
    })?;
    let config = plugin_config(&origin);

    MOUNT_GUARD.mount_with(
        MOUNT_POINT_ID,
        |id| document.get_element_by_id(id),
        move |element| {
            let parent: web_sys::HtmlElement = element.unchecked_into();
            leptos::mount::mount_to(parent, move || {
                provide_auth_client(config);
                view! { <App/> }
            })
            .forget();
        },
    )
}
