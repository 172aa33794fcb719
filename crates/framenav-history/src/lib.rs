//! framenav history layer
//!
//! The stateful ledger of visited destinations. The stack mirrors the
//! host's actual page stack: entries are added and removed only in
//! lockstep with a confirmed host navigation effect, which is why the
//! router alone mutates it.

mod entry;
mod probe;
mod stack;

pub use entry::{HistoryEntry, SharedEntry};
pub use probe::{LaunchProbe, StaticLaunch, UnknownLaunch};
pub use stack::{HistoryStack, StackOp};
