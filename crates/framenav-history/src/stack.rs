//! History stack manager
//!
//! Index 0 is the oldest/root entry, the last slot is the current page.
//! The stack length always equals the host's page-stack depth; the tab
//! cache keeps the last entry seen per persistent tab so a tab switch can
//! reuse it instead of allocating a fresh one.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use framenav_routes::{parse_query, NavKind, Route};

use crate::entry::{shared, HistoryEntry, SharedEntry};
use crate::probe::LaunchProbe;

/// A stack mutation, applied only after the host confirmed the
/// corresponding navigation effect.
#[derive(Debug)]
pub enum StackOp {
    /// Append on top
    Push(HistoryEntry),
    /// Overwrite the slot immediately below the top; with a single entry
    /// this degenerates to overwriting the root
    Replace(HistoryEntry),
    /// Truncate the whole stack to this one entry
    RelaunchAll(HistoryEntry),
    /// Make a persistent tab the sole entry, reusing its cached slot
    SwitchTab(HistoryEntry),
    /// Remove `delta` entries from the top, always keeping the root
    Back { delta: usize },
}

struct StackState {
    stack: Vec<SharedEntry>,
    tabs: HashMap<String, SharedEntry>,
    seeded: bool,
}

pub struct HistoryStack {
    inner: Arc<RwLock<StackState>>,
    probe: Arc<dyn LaunchProbe>,
}

impl HistoryStack {
    pub fn new(probe: Arc<dyn LaunchProbe>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(StackState {
                stack: Vec::new(),
                tabs: HashMap::new(),
                seeded: false,
            })),
            probe,
        }
    }

    /// The entry for the page currently on top.
    ///
    /// On the very first read of a cold-started process the stack is
    /// empty; a synthetic root is then seeded from the host-reported
    /// launch URL. This happens at most once per process lifetime.
    pub fn current(&self) -> SharedEntry {
        self.ensure_seeded();
        let state = self.inner.read();
        state.stack[state.stack.len() - 1].clone()
    }

    /// The entry `depth_from_top` slots below the current page, clamped
    /// to the root on underflow.
    pub fn entry_at(&self, depth_from_top: usize) -> SharedEntry {
        self.ensure_seeded();
        let state = self.inner.read();
        let top = state.stack.len() - 1;
        let index = top.saturating_sub(depth_from_top);
        state.stack[index].clone()
    }

    pub fn depth(&self) -> usize {
        self.ensure_seeded();
        self.inner.read().stack.len()
    }

    /// The cached entry for a tab path, if that tab has been visited.
    pub fn tab_entry(&self, path: &str) -> Option<SharedEntry> {
        self.inner.read().tabs.get(tab_key(path)).cloned()
    }

    /// Refresh the tab cache slot for this entry's path.
    pub fn cache_tab(&self, entry: SharedEntry) {
        let key = tab_key(&entry.read().route.path).to_string();
        self.inner.write().tabs.insert(key, entry);
    }

    /// Apply a confirmed navigation effect and return the new current
    /// entry.
    pub fn apply(&self, op: StackOp) -> SharedEntry {
        self.ensure_seeded();
        let mut state = self.inner.write();

        match op {
            StackOp::Push(entry) => {
                state.stack.push(shared(entry));
            }
            StackOp::Replace(entry) => {
                let index = state.stack.len().saturating_sub(2);
                state.stack[index] = shared(entry);
            }
            StackOp::RelaunchAll(entry) => {
                state.stack.clear();
                state.stack.push(shared(entry));
            }
            StackOp::SwitchTab(entry) => {
                let key = tab_key(&entry.route.path).to_string();
                let slot = match state.tabs.get(&key).cloned() {
                    Some(cached) => {
                        // Merge into the cached allocation so observers
                        // holding it keep a stable reference.
                        {
                            let mut current = cached.write();
                            current.route = entry.route;
                            current.full_url = entry.full_url;
                            current.visited_at = entry.visited_at;
                        }
                        cached
                    }
                    None => {
                        let fresh = shared(entry);
                        state.tabs.insert(key, fresh.clone());
                        fresh
                    }
                };
                state.stack.clear();
                state.stack.push(slot);
            }
            StackOp::Back { delta } => {
                let delta = delta.max(1).min(state.stack.len() - 1);
                let new_len = state.stack.len() - delta;
                state.stack.truncate(new_len);
            }
        }

        tracing::debug!(depth = state.stack.len(), "History stack updated");

        state.stack[state.stack.len() - 1].clone()
    }

    fn ensure_seeded(&self) {
        let mut state = self.inner.write();
        if state.seeded || !state.stack.is_empty() {
            return;
        }
        state.seeded = true;

        let url = self
            .probe
            .top_page_url()
            .unwrap_or_else(|| "/".to_string());
        let path = url.split('?').next().unwrap_or("/");
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };

        let mut route = Route::new(path, NavKind::Push);
        route.query = parse_query(&url);

        tracing::info!(url = %url, "Seeded history root from launch info");

        state.stack.push(shared(HistoryEntry::new(route, url)));
    }
}

impl Clone for HistoryStack {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            probe: Arc::clone(&self.probe),
        }
    }
}

fn tab_key(path: &str) -> &str {
    path.split('?').next().unwrap_or(path)
}
