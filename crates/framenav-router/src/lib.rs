//! framenav Router
//!
//! Client-side navigation controller for frame-stack hosts. A raw request
//! (path, symbolic name, back delta or structured location) is resolved to
//! a destination, run through the registered before-guards (which may
//! allow, block or redirect), delivered to the host, mirrored into the
//! history stack and finally announced to after-navigation observers.

mod error;
mod guard;
mod host;
mod pipeline;
mod request;
mod resolve;
mod router;

pub use error::NavigationError;
pub use guard::{
    classify, AfterGuard, BeforeGuard, GuardHandle, GuardRegistry, GuardRule, NextHandle, Verdict,
};
pub use host::{HostEcho, HostFailure, HostNavigator};
pub use request::NavigationRequest;
pub use resolve::Resolver;
pub use router::Router;

// Re-export the lower layers
pub use framenav_history::{
    HistoryEntry, HistoryStack, LaunchProbe, SharedEntry, StackOp, StaticLaunch, UnknownLaunch,
};
pub use framenav_routes::{
    merge_query, parse_query, NavKind, PageEntry, PageManifest, QueryInput, QueryMap, QueryValue,
    Route, RouteError, RouteLocation, RouteManifest, SubPackage,
};

pub type Result<T> = std::result::Result<T, NavigationError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
