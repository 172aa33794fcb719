//! Destination resolver
//!
//! Turns a raw request plus a navigation kind into a canonical `Route`:
//! names are looked up in the manifest, embedded path queries are split
//! out and merged with the supplied ones, back requests reuse the stack
//! entry at the pop distance, and unknown destinations are rejected
//! before any guard runs.

use std::sync::Arc;

use framenav_history::HistoryStack;
use framenav_routes::{parse_query, NavKind, QueryMap, Route, RouteLocation, RouteManifest};

use crate::error::NavigationError;
use crate::request::NavigationRequest;
use crate::Result;

pub struct Resolver {
    manifest: Arc<RouteManifest>,
}

impl Resolver {
    pub fn new(manifest: Arc<RouteManifest>) -> Self {
        Self { manifest }
    }

    pub fn manifest(&self) -> &RouteManifest {
        &self.manifest
    }

    /// Resolve a raw request. Pure apart from a read-only peek at the
    /// stack for back navigations. `from_path` is left for the pipeline
    /// to attach.
    pub fn resolve(
        &self,
        request: NavigationRequest,
        kind: NavKind,
        history: &HistoryStack,
    ) -> Result<Route> {
        // A structured request may override the navigation kind.
        let kind = match &request {
            NavigationRequest::Location(location) => location.kind.unwrap_or(kind),
            _ => kind,
        };

        if kind == NavKind::Back {
            return Ok(self.resolve_back(&request, history));
        }

        let location = match request {
            NavigationRequest::Path(path) => RouteLocation::path(path),
            NavigationRequest::Name(name) => RouteLocation::name(name),
            NavigationRequest::Location(location) => location,
            // A bare delta only makes sense for back navigation.
            NavigationRequest::Delta(_) => RouteLocation::path("/"),
        };

        // Name wins over path when both are present.
        let raw_path = match &location.name {
            Some(name) => self
                .manifest
                .path_for_name(name)
                .map(|p| p.to_string())
                .ok_or_else(|| NavigationError::UnknownRouteName(name.clone()))?,
            None => location.path.clone().unwrap_or_default(),
        };

        let raw_path = if raw_path.starts_with('/') {
            raw_path
        } else {
            format!("/{}", raw_path)
        };

        // Split any query embedded in the path; supplied keys win.
        let (path, embedded) = match raw_path.split_once('?') {
            Some((p, _)) => (p.to_string(), parse_query(&raw_path)),
            None => (raw_path, QueryMap::new()),
        };

        if !self.manifest.contains_path(&path) {
            return Err(NavigationError::UnknownPath(path));
        }
        if kind == NavKind::SwitchTab && !self.manifest.is_tab_path(&path) {
            return Err(NavigationError::UnknownPath(path));
        }

        let mut query = embedded;
        query.extend(location.query);

        Ok(Route {
            path,
            name: location.name,
            query,
            params: location.params,
            kind,
            from_path: None,
            delta: None,
            delay_ms: location.delay_ms,
            ignore_guard: location.ignore_guard,
        })
    }

    /// Back navigations need no path of their own: the target is whatever
    /// sits `delta` slots below the top, clamped to the root.
    fn resolve_back(&self, request: &NavigationRequest, history: &HistoryStack) -> Route {
        let (delta, delay_ms, ignore_guard) = match request {
            NavigationRequest::Delta(delta) => (*delta, None, false),
            NavigationRequest::Location(location) => (
                location.delta.unwrap_or(1),
                location.delay_ms,
                location.ignore_guard,
            ),
            _ => (1, None, false),
        };
        let delta = delta.max(1);

        let target = history.entry_at(delta);
        let snapshot = target.read().route.clone();

        Route {
            path: snapshot.path,
            name: snapshot.name,
            query: snapshot.query,
            params: snapshot.params,
            kind: NavKind::Back,
            from_path: None,
            delta: Some(delta),
            delay_ms,
            ignore_guard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framenav_history::{HistoryEntry, StackOp, StaticLaunch};
    use framenav_routes::QueryValue;

    fn manifest() -> Arc<RouteManifest> {
        Arc::new(
            RouteManifest::from_json(
                r#"{
                    "pages": [
                        { "path": "pages/home/index", "name": "home", "tab": true },
                        { "path": "pages/detail/index", "name": "detail" },
                        { "path": "pages/about/index" }
                    ]
                }"#,
            )
            .unwrap(),
        )
    }

    fn history() -> HistoryStack {
        HistoryStack::new(Arc::new(StaticLaunch("/pages/home/index".to_string())))
    }

    fn resolver() -> Resolver {
        Resolver::new(manifest())
    }

    #[test]
    fn test_resolve_literal_path() {
        let route = resolver()
            .resolve("/pages/about/index".into(), NavKind::Push, &history())
            .unwrap();
        assert_eq!(route.path, "/pages/about/index");
        assert_eq!(route.kind, NavKind::Push);
        assert!(route.query.is_empty());
    }

    #[test]
    fn test_resolve_symbolic_name() {
        let route = resolver()
            .resolve("detail".into(), NavKind::Push, &history())
            .unwrap();
        assert_eq!(route.path, "/pages/detail/index");
        assert_eq!(route.name.as_deref(), Some("detail"));
    }

    #[test]
    fn test_unknown_name_fails_fast() {
        let err = resolver()
            .resolve("missing".into(), NavKind::Push, &history())
            .unwrap_err();
        assert!(matches!(err, NavigationError::UnknownRouteName(_)));
    }

    #[test]
    fn test_unknown_path_fails_fast() {
        let err = resolver()
            .resolve("/pages/nope/index".into(), NavKind::Push, &history())
            .unwrap_err();
        assert!(matches!(err, NavigationError::UnknownPath(_)));
    }

    #[test]
    fn test_switch_tab_requires_declared_tab() {
        let err = resolver()
            .resolve(
                "/pages/detail/index".into(),
                NavKind::SwitchTab,
                &history(),
            )
            .unwrap_err();
        assert!(matches!(err, NavigationError::UnknownPath(_)));

        let route = resolver()
            .resolve("/pages/home/index".into(), NavKind::SwitchTab, &history())
            .unwrap();
        assert_eq!(route.kind, NavKind::SwitchTab);
    }

    #[test]
    fn test_structured_name_wins_over_path() {
        let location = RouteLocation {
            path: Some("/pages/about/index".to_string()),
            name: Some("detail".to_string()),
            ..Default::default()
        };
        let route = resolver()
            .resolve(location.into(), NavKind::Push, &history())
            .unwrap();
        assert_eq!(route.path, "/pages/detail/index");
        assert_eq!(route.name.as_deref(), Some("detail"));
    }

    #[test]
    fn test_embedded_query_merged_supplied_wins() {
        let location = RouteLocation::path("/pages/detail/index?id=1&tag=old")
            .with_query("tag", "new");
        let route = resolver()
            .resolve(location.into(), NavKind::Push, &history())
            .unwrap();

        assert_eq!(route.path, "/pages/detail/index");
        assert_eq!(route.query.get("id"), Some(&QueryValue::Number(1.0)));
        assert_eq!(
            route.query.get("tag"),
            Some(&QueryValue::Text("new".to_string()))
        );
    }

    #[test]
    fn test_location_kind_override() {
        let location = RouteLocation::path("/pages/about/index").with_kind(NavKind::Replace);
        let route = resolver()
            .resolve(location.into(), NavKind::Push, &history())
            .unwrap();
        assert_eq!(route.kind, NavKind::Replace);
    }

    #[test]
    fn test_back_reuses_stack_entry() {
        let history = history();
        let resolver = resolver();
        history.apply(StackOp::Push(HistoryEntry::new(
            Route::new("/pages/detail/index", NavKind::Push),
            "/pages/detail/index",
        )));

        let route = resolver
            .resolve(NavigationRequest::Delta(1), NavKind::Back, &history)
            .unwrap();
        assert_eq!(route.path, "/pages/home/index");
        assert_eq!(route.delta, Some(1));
        assert_eq!(route.kind, NavKind::Back);
    }

    #[test]
    fn test_back_delta_clamped_and_underflow_hits_root() {
        let history = history();
        let route = resolver()
            .resolve(NavigationRequest::Delta(0), NavKind::Back, &history)
            .unwrap();
        assert_eq!(route.delta, Some(1));
        assert_eq!(route.path, "/pages/home/index");

        let route = resolver()
            .resolve(NavigationRequest::Delta(50), NavKind::Back, &history)
            .unwrap();
        assert_eq!(route.path, "/pages/home/index");
    }

    #[test]
    fn test_resolution_is_idempotent_on_canonical_input() {
        let resolver = resolver();
        let history = history();
        let first = resolver
            .resolve(
                RouteLocation::path("/pages/detail/index")
                    .with_query("id", 3)
                    .into(),
                NavKind::Push,
                &history,
            )
            .unwrap();

        let again = RouteLocation {
            path: Some(first.path.clone()),
            query: first.query.clone(),
            params: first.params.clone(),
            ..Default::default()
        };
        let second = resolver
            .resolve(again.into(), NavKind::Push, &history)
            .unwrap();

        assert_eq!(first, second);
    }
}
