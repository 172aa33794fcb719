//! Guard pipeline
//!
//! A pending transition moves from pending to exactly one of approved,
//! redirected or blocked. Guards run strictly sequentially in
//! registration order with at most one in flight; a redirect restarts
//! resolution against the new request and the rest of the aborted chain
//! never runs. A guard that unconditionally redirects loops forever —
//! that is a caller bug, not something the pipeline detects.

use framenav_history::HistoryStack;
use framenav_routes::{NavKind, Route};

use crate::error::NavigationError;
use crate::guard::{classify, BeforeGuard, GuardRegistry, GuardRule, NextHandle, Verdict};
use crate::request::NavigationRequest;
use crate::resolve::Resolver;
use crate::Result;

/// Resolve a request and run it through the before-guards, following
/// redirects until the transition is approved or blocked. Returns the
/// approved target and the `from` route guards observed.
pub(crate) async fn resolve_through_guards(
    resolver: &Resolver,
    registry: &GuardRegistry,
    history: &HistoryStack,
    request: NavigationRequest,
    kind: NavKind,
) -> Result<(Route, Route)> {
    let mut request = request;
    let mut kind = kind;

    loop {
        let mut to = resolver.resolve(request, kind, history)?;
        let from = history.current().read().route.clone();
        to.from_path = Some(from.path.clone());

        // Internal re-entry after an already-approved redirect.
        if to.ignore_guard {
            return Ok((to, from));
        }

        match run_chain(registry, &to, &from).await {
            Verdict::Pass => return Ok((to, from)),
            Verdict::Block => {
                tracing::debug!(to = %to.path, "Navigation blocked by guard");
                return Err(NavigationError::GuardBlocked);
            }
            Verdict::Redirect(next) => {
                tracing::debug!(to = %to.path, "Guard redirected");
                kind = match &next {
                    NavigationRequest::Location(location) => {
                        location.kind.unwrap_or(NavKind::Push)
                    }
                    NavigationRequest::Delta(_) => NavKind::Back,
                    _ => NavKind::Push,
                };
                request = next;
            }
        }
    }
}

async fn run_chain(registry: &GuardRegistry, to: &Route, from: &Route) -> Verdict {
    for guard in registry.before_snapshot() {
        let rule = match guard {
            BeforeGuard::Direct(run) => run(to.clone(), from.clone()).await,
            BeforeGuard::Continuation(run) => {
                let (handle, settled) = NextHandle::new();
                run(to.clone(), from.clone(), handle).await;
                match settled.await {
                    Ok(rule) => rule,
                    // Handle dropped without settling: the transition can
                    // never proceed, treat it as a block.
                    Err(_) => Some(GuardRule::Deny),
                }
            }
        };

        match classify(rule) {
            Verdict::Pass => continue,
            verdict => return verdict,
        }
    }

    Verdict::Pass
}
