//! Guards and verdicts
//!
//! A guard answers a pending transition with a `GuardRule`; `classify`
//! turns that answer (or its absence) into the pipeline verdict. Guards
//! come in two mutually exclusive styles, chosen at registration:
//! direct guards answer through their return value, continuation guards
//! answer by settling a `NextHandle` exactly once.

use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use parking_lot::{Mutex, RwLock};
use tokio::sync::oneshot;

use framenav_routes::Route;

use crate::request::NavigationRequest;

/// A guard's raw answer.
#[derive(Debug, Clone, PartialEq)]
pub enum GuardRule {
    /// Let the transition continue to the next guard
    Allow,
    /// Abandon the transition
    Deny,
    /// Restart resolution against a different destination
    Redirect(NavigationRequest),
}

/// Classified outcome of a guard's answer.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Pass,
    Block,
    Redirect(NavigationRequest),
}

/// Classify a guard's answer. Precedence: an explicit deny blocks, a
/// redirect value redirects, everything else (including no answer at
/// all) passes — the permissive default.
pub fn classify(rule: Option<GuardRule>) -> Verdict {
    match rule {
        Some(GuardRule::Deny) => Verdict::Block,
        Some(GuardRule::Redirect(request)) => Verdict::Redirect(request),
        Some(GuardRule::Allow) | None => Verdict::Pass,
    }
}

/// The continuation handed to a continuation-style guard.
///
/// The first call to [`resolve`](Self::resolve) wins; later calls are
/// no-ops. This settled-latch keeps a guard that misbehaves and calls
/// its continuation twice from double-resolving the transition.
#[derive(Clone)]
pub struct NextHandle {
    sender: Arc<Mutex<Option<oneshot::Sender<Option<GuardRule>>>>>,
}

impl NextHandle {
    pub(crate) fn new() -> (Self, oneshot::Receiver<Option<GuardRule>>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                sender: Arc::new(Mutex::new(Some(tx))),
            },
            rx,
        )
    }

    /// Settle this guard's turn. Returns whether this call was the one
    /// that settled it.
    pub fn resolve(&self, rule: Option<GuardRule>) -> bool {
        match self.sender.lock().take() {
            Some(tx) => {
                let _ = tx.send(rule);
                true
            }
            None => false,
        }
    }

    /// Shorthand for `resolve(Some(GuardRule::Allow))`.
    pub fn allow(&self) -> bool {
        self.resolve(Some(GuardRule::Allow))
    }

    /// Shorthand for `resolve(Some(GuardRule::Deny))`.
    pub fn deny(&self) -> bool {
        self.resolve(Some(GuardRule::Deny))
    }
}

type DirectFn = dyn Fn(Route, Route) -> BoxFuture<'static, Option<GuardRule>> + Send + Sync;
type ContinuationFn = dyn Fn(Route, Route, NextHandle) -> BoxFuture<'static, ()> + Send + Sync;

/// A registered before-guard, tagged with its style.
#[derive(Clone)]
pub enum BeforeGuard {
    Direct(Arc<DirectFn>),
    Continuation(Arc<ContinuationFn>),
}

impl BeforeGuard {
    /// A guard whose (possibly awaited) return value is its answer.
    pub fn direct<F, Fut>(guard: F) -> Self
    where
        F: Fn(Route, Route) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Option<GuardRule>> + Send + 'static,
    {
        BeforeGuard::Direct(Arc::new(move |to, from| Box::pin(guard(to, from))))
    }

    /// A guard that defers its answer to the `NextHandle` continuation.
    pub fn continuation<F, Fut>(guard: F) -> Self
    where
        F: Fn(Route, Route, NextHandle) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        BeforeGuard::Continuation(Arc::new(move |to, from, next| {
            Box::pin(guard(to, from, next))
        }))
    }
}

/// An after-navigation observer; runs once the stack has been updated.
pub type AfterGuard = Arc<dyn Fn(&Route, &Route) + Send + Sync>;

/// Handle returned by registration, used to unregister the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardHandle {
    id: u64,
    slot: GuardSlot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GuardSlot {
    Before,
    After,
}

struct RegistryState {
    before: Vec<(u64, BeforeGuard)>,
    after: Vec<(u64, AfterGuard)>,
    next_id: u64,
}

/// Ordered before/after guard lists. Insertion order is execution order.
pub struct GuardRegistry {
    state: Arc<RwLock<RegistryState>>,
}

impl GuardRegistry {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(RegistryState {
                before: Vec::new(),
                after: Vec::new(),
                next_id: 0,
            })),
        }
    }

    pub fn add_before(&self, guard: BeforeGuard) -> GuardHandle {
        let mut state = self.state.write();
        let id = state.next_id;
        state.next_id += 1;
        state.before.push((id, guard));
        GuardHandle {
            id,
            slot: GuardSlot::Before,
        }
    }

    pub fn add_after(&self, guard: AfterGuard) -> GuardHandle {
        let mut state = self.state.write();
        let id = state.next_id;
        state.next_id += 1;
        state.after.push((id, guard));
        GuardHandle {
            id,
            slot: GuardSlot::After,
        }
    }

    pub fn unregister(&self, handle: GuardHandle) {
        let mut state = self.state.write();
        match handle.slot {
            GuardSlot::Before => state.before.retain(|(id, _)| *id != handle.id),
            GuardSlot::After => state.after.retain(|(id, _)| *id != handle.id),
        }
    }

    /// Snapshot taken at pipeline start; guards registered mid-flight
    /// only affect subsequent navigations.
    pub fn before_snapshot(&self) -> Vec<BeforeGuard> {
        self.state
            .read()
            .before
            .iter()
            .map(|(_, g)| g.clone())
            .collect()
    }

    pub fn after_snapshot(&self) -> Vec<AfterGuard> {
        self.state
            .read()
            .after
            .iter()
            .map(|(_, g)| Arc::clone(g))
            .collect()
    }
}

impl Default for GuardRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for GuardRegistry {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_precedence() {
        assert_eq!(classify(Some(GuardRule::Deny)), Verdict::Block);
        assert_eq!(
            classify(Some(GuardRule::Redirect("/b".into()))),
            Verdict::Redirect(NavigationRequest::Path("/b".to_string()))
        );
        assert_eq!(classify(Some(GuardRule::Allow)), Verdict::Pass);
        assert_eq!(classify(None), Verdict::Pass);
    }

    #[tokio::test]
    async fn test_next_handle_first_call_wins() {
        let (handle, rx) = NextHandle::new();

        assert!(handle.deny());
        assert!(!handle.allow());
        assert!(!handle.resolve(None));

        assert_eq!(rx.await.unwrap(), Some(GuardRule::Deny));
    }

    #[test]
    fn test_registry_order_and_unregister() {
        let registry = GuardRegistry::new();
        let _first = registry.add_before(BeforeGuard::direct(|_, _| async { None }));
        let second = registry.add_before(BeforeGuard::direct(|_, _| async { None }));
        assert_eq!(registry.before_snapshot().len(), 2);

        registry.unregister(second);
        assert_eq!(registry.before_snapshot().len(), 1);

        let after = registry.add_after(Arc::new(|_: &Route, _: &Route| {}));
        assert_eq!(registry.after_snapshot().len(), 1);
        registry.unregister(after);
        assert!(registry.after_snapshot().is_empty());
        assert_eq!(registry.before_snapshot().len(), 1);
    }
}
