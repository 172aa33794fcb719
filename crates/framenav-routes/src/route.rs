//! Core route types
//!
//! `RouteLocation` is the structured raw request a caller hands to the
//! router; `Route` is the resolved destination the guard pipeline and the
//! history stack operate on.

use serde::{Deserialize, Serialize};

use crate::query::QueryMap;

/// The category of stack effect a navigation performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NavKind {
    /// Append a new page on top of the stack
    Push,
    /// Replace the page that initiated the navigation
    Replace,
    /// Clear the stack and restart it with a single page
    RelaunchAll,
    /// Swap the visible page for a cached persistent tab
    SwitchTab,
    /// Pop one or more pages off the top
    Back,
}

impl NavKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NavKind::Push => "push",
            NavKind::Replace => "replace",
            NavKind::RelaunchAll => "relaunchAll",
            NavKind::SwitchTab => "switchTab",
            NavKind::Back => "back",
        }
    }
}

impl std::fmt::Display for NavKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for NavKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "push" => Ok(NavKind::Push),
            "replace" => Ok(NavKind::Replace),
            "relaunchall" => Ok(NavKind::RelaunchAll),
            "switchtab" => Ok(NavKind::SwitchTab),
            "back" => Ok(NavKind::Back),
            _ => Err(format!("Unknown navigation kind: {}", s)),
        }
    }
}

/// A structured raw navigation request.
///
/// Either `name` or `path` identifies the destination (`name` wins when both
/// are present). The remaining fields tune the attempt: `delta` is the pop
/// distance for back navigations, `delay_ms` postpones the host effect after
/// guard approval, and `ignore_guard` marks an internal re-entry that skips
/// the before-guard chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteLocation {
    pub path: Option<String>,
    pub name: Option<String>,
    pub kind: Option<NavKind>,
    pub query: QueryMap,
    pub params: QueryMap,
    pub delta: Option<usize>,
    pub delay_ms: Option<u64>,
    pub ignore_guard: bool,
}

impl RouteLocation {
    pub fn path(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Default::default()
        }
    }

    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_kind(mut self, kind: NavKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<crate::QueryValue>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<crate::QueryValue>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = Some(delay_ms);
        self
    }

    pub fn ignoring_guards(mut self) -> Self {
        self.ignore_guard = true;
        self
    }
}

/// A resolved navigation destination.
///
/// `path` is always absolute and slash-rooted after resolution. A `Route`
/// is created fresh per navigation attempt and, once approved by the guard
/// pipeline, is only touched to attach `from_path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub path: String,
    pub name: Option<String>,
    pub query: QueryMap,
    pub params: QueryMap,
    pub kind: NavKind,
    pub from_path: Option<String>,
    /// Pop distance, only meaningful for back navigations
    pub delta: Option<usize>,
    pub delay_ms: Option<u64>,
    pub ignore_guard: bool,
}

impl Route {
    pub fn new(path: impl Into<String>, kind: NavKind) -> Self {
        Self {
            path: path.into(),
            name: None,
            query: QueryMap::new(),
            params: QueryMap::new(),
            kind,
            from_path: None,
            delta: None,
            delay_ms: None,
            ignore_guard: false,
        }
    }
}
