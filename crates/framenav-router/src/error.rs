//! Navigation error types
//!
//! Every failed navigation is reported as one of these and leaves the
//! application in its prior, consistent state; none is fatal.

use thiserror::Error;

use framenav_routes::RouteError;

#[derive(Error, Debug)]
pub enum NavigationError {
    /// Symbolic name absent from the route manifest; fails before any
    /// guard runs
    #[error("Unknown route name: {0}")]
    UnknownRouteName(String),

    /// Resolved path absent from the manifest; fails before any guard
    /// runs, no host effect attempted
    #[error("Unknown path: {0}")]
    UnknownPath(String),

    /// A before-guard blocked the navigation
    #[error("Navigation blocked by guard")]
    GuardBlocked,

    /// The host reported failure; the stack is left unmutated and
    /// after-guards do not run
    #[error("Host navigation failed: {0}")]
    HostEffectFailed(String),

    #[error("Route error: {0}")]
    Route(#[from] RouteError),
}
