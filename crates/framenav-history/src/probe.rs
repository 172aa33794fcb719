//! Host page introspection
//!
//! Read-only view of what the host reports as the page currently on top
//! of its stack, used only to seed the history root when the process
//! starts on a page this controller did not navigate to (deep link, host
//! relaunch).

/// Reports the launch URL of the page on top of the host stack.
pub trait LaunchProbe: Send + Sync {
    /// Path plus any embedded query, e.g. `/pages/detail/index?id=3`.
    /// `None` when the host cannot tell (the nominal root is assumed).
    fn top_page_url(&self) -> Option<String>;
}

/// A probe for hosts that capture the launch URL once at bootstrap.
pub struct StaticLaunch(pub String);

impl LaunchProbe for StaticLaunch {
    fn top_page_url(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// A probe that reports nothing, falling back to the nominal root.
pub struct UnknownLaunch;

impl LaunchProbe for UnknownLaunch {
    fn top_page_url(&self) -> Option<String> {
        None
    }
}
