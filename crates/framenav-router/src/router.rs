//! Navigation controller
//!
//! The explicit context object wiring the manifest, history stack, guard
//! registry and host capability together. Created once at application
//! bootstrap and dropped at process exit. Navigations are serialized:
//! the stack mutation happens in lockstep with a confirmed host effect,
//! so a request arriving mid-flight waits for the previous one to settle.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use framenav_history::{HistoryEntry, HistoryStack, LaunchProbe, SharedEntry, StackOp};
use framenav_routes::{merge_query, NavKind, QueryInput, Route, RouteManifest};

use crate::error::NavigationError;
use crate::guard::{AfterGuard, BeforeGuard, GuardHandle, GuardRegistry};
use crate::host::HostNavigator;
use crate::pipeline;
use crate::request::NavigationRequest;
use crate::resolve::Resolver;
use crate::Result;

pub struct Router {
    manifest: Arc<RouteManifest>,
    resolver: Resolver,
    history: HistoryStack,
    guards: GuardRegistry,
    host: Arc<dyn HostNavigator>,
    /// One navigation at a time; held from resolution through the
    /// after-guards so observers always see the stack of the navigation
    /// they belong to.
    nav_lock: Arc<Mutex<()>>,
}

impl Router {
    pub fn new(
        manifest: RouteManifest,
        probe: Arc<dyn LaunchProbe>,
        host: Arc<dyn HostNavigator>,
    ) -> Self {
        let manifest = Arc::new(manifest);
        Self {
            resolver: Resolver::new(Arc::clone(&manifest)),
            history: HistoryStack::new(probe),
            guards: GuardRegistry::new(),
            host,
            manifest,
            nav_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Build a router straight from a JSON page configuration.
    pub fn from_page_json(
        json: &str,
        probe: Arc<dyn LaunchProbe>,
        host: Arc<dyn HostNavigator>,
    ) -> Result<Self> {
        let manifest = RouteManifest::from_json(json)?;
        Ok(Self::new(manifest, probe, host))
    }

    // === Navigation surface ===

    pub async fn push(&self, to: impl Into<NavigationRequest>) -> Result<SharedEntry> {
        self.go(NavKind::Push, to).await
    }

    pub async fn replace(&self, to: impl Into<NavigationRequest>) -> Result<SharedEntry> {
        self.go(NavKind::Replace, to).await
    }

    pub async fn relaunch_all(&self, to: impl Into<NavigationRequest>) -> Result<SharedEntry> {
        self.go(NavKind::RelaunchAll, to).await
    }

    pub async fn switch_tab(&self, to: impl Into<NavigationRequest>) -> Result<SharedEntry> {
        self.go(NavKind::SwitchTab, to).await
    }

    pub async fn back(&self, delta: usize) -> Result<SharedEntry> {
        self.go(NavKind::Back, NavigationRequest::Delta(delta)).await
    }

    /// Issue a navigation of the given kind. Resolution, guards, the
    /// host effect, the stack mutation and the after-guards all happen
    /// before the returned future settles.
    pub async fn go(
        &self,
        kind: NavKind,
        request: impl Into<NavigationRequest>,
    ) -> Result<SharedEntry> {
        let _in_flight = self.nav_lock.lock().await;

        let (to, from) = pipeline::resolve_through_guards(
            &self.resolver,
            &self.guards,
            &self.history,
            request.into(),
            kind,
        )
        .await?;

        // Configured pause between guard approval and the host effect.
        if let Some(delay_ms) = to.delay_ms {
            if delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }

        let full_url = merge_query(&to.path, &QueryInput::Map(to.query.clone()));
        let kind = to.kind;

        let echo = self
            .host
            .invoke(kind, &full_url)
            .await
            .map_err(|failure| NavigationError::HostEffectFailed(failure.0))?;

        let current = self.apply_effect(kind, &to, echo.url.unwrap_or(full_url));

        tracing::info!(
            path = %to.path,
            kind = %kind,
            depth = self.history.depth(),
            "Navigation applied"
        );

        for observer in self.guards.after_snapshot() {
            observer(&to, &from);
        }

        Ok(current)
    }

    fn apply_effect(&self, kind: NavKind, to: &Route, url: String) -> SharedEntry {
        let op = match kind {
            NavKind::Back => StackOp::Back {
                delta: to.delta.unwrap_or(1),
            },
            NavKind::Push => StackOp::Push(HistoryEntry::new(to.clone(), url)),
            NavKind::Replace => StackOp::Replace(HistoryEntry::new(to.clone(), url)),
            NavKind::RelaunchAll => StackOp::RelaunchAll(HistoryEntry::new(to.clone(), url)),
            NavKind::SwitchTab => StackOp::SwitchTab(HistoryEntry::new(to.clone(), url)),
        };
        let current = self.history.apply(op);

        // Keep the tab cache fresh when a tab page is reached by some
        // other navigation kind. Replace mutates the slot below the top,
        // so the applied entry is not necessarily the current one.
        let applied = match kind {
            NavKind::Replace => self.history.entry_at(1),
            _ => current.clone(),
        };
        if kind != NavKind::SwitchTab && self.manifest.is_tab_path(&applied.read().route.path) {
            self.history.cache_tab(applied);
        }

        current
    }

    // === Guard registration ===

    pub fn before_each(&self, guard: BeforeGuard) -> GuardHandle {
        self.guards.add_before(guard)
    }

    pub fn after_each<F>(&self, observer: F) -> GuardHandle
    where
        F: Fn(&Route, &Route) + Send + Sync + 'static,
    {
        self.guards.add_after(Arc::new(observer) as AfterGuard)
    }

    pub fn unregister(&self, handle: GuardHandle) {
        self.guards.unregister(handle)
    }

    // === Introspection ===

    pub fn current(&self) -> SharedEntry {
        self.history.current()
    }

    pub fn current_route(&self) -> Route {
        self.history.current().read().route.clone()
    }

    pub fn depth(&self) -> usize {
        self.history.depth()
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn manifest(&self) -> &RouteManifest {
        &self.manifest
    }
}

impl Clone for Router {
    fn clone(&self) -> Self {
        Self {
            manifest: Arc::clone(&self.manifest),
            resolver: Resolver::new(Arc::clone(&self.manifest)),
            history: self.history.clone(),
            guards: self.guards.clone(),
            host: Arc::clone(&self.host),
            nav_lock: Arc::clone(&self.nav_lock),
        }
    }
}
