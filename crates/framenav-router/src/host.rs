//! Host navigation seam
//!
//! The controller never talks to the host runtime directly; it invokes
//! this capability and only mutates the history stack once the host has
//! confirmed the effect.

use futures_util::future::BoxFuture;
use thiserror::Error;

use framenav_routes::NavKind;

/// Echo data the host returns on success. The host may rewrite the URL
/// it actually landed on; when present it wins over the requested one in
/// the stored history entry.
#[derive(Debug, Clone, Default)]
pub struct HostEcho {
    pub url: Option<String>,
}

/// Failure reported by the host, e.g. the target page crashed to load.
#[derive(Error, Debug, Clone)]
#[error("{0}")]
pub struct HostFailure(pub String);

/// The host's page-stack dispatch capability.
pub trait HostNavigator: Send + Sync {
    fn invoke(
        &self,
        kind: NavKind,
        url: &str,
    ) -> BoxFuture<'static, std::result::Result<HostEcho, HostFailure>>;
}
