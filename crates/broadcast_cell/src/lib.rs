//! Replicated value cells for the single-writer, multi-reader pattern.
//!
//! One logical owner continuously mutates an authoritative value ("master")
//! while any number of other threads read a lock-protected replica that lags
//! by at most one publish step:
//! -   The writer edits the master in place, with no lock and no copy, and
//!     reports after each edit whether anything changed and needs publishing.
//! -   Readers take a shared lock on the replica only. They contend with the
//!     publish step and with each other, never with the writer's edits.
//!
//! To get the above features, we accept the following limitations:
//! -   Write authorization is a capability, not a runtime check. Whoever
//!     holds the cell's key may write; the cell trusts the [`WriteKey`]
//!     contract instead of verifying callers.
//! -   Replica reads lag: a snapshot taken between a master edit and its
//!     publish step observes the previous value. Every snapshot is still a
//!     complete, fully-published value, never a mixture.
//! -   The payload must be [`Clone`] so the replica can be rebuilt from the
//!     master.
//!
//! # Example
//!
//! ```
//! use broadcast_cell::{BroadcastCell, WriteKey};
//!
//! // One marker type per writer domain. The `unsafe impl` is the caller's
//! // promise that at most one live `SimKey` value ever mutates a cell.
//! struct SimKey;
//! unsafe impl WriteKey for SimKey {}
//!
//! let cell: BroadcastCell<SimKey, u64> = BroadcastCell::new(0);
//! let mut key = SimKey;
//!
//! // Writer: edit the master in place; `true` publishes to the replica.
//! assert!(cell.update(&mut key, |v| {
//!     *v += 1;
//!     true
//! }));
//!
//! // Any thread: read the replica without a key.
//! assert_eq!(cell.snapshot(), 1);
//! ```
//!
//! When no compile-time writer domain exists, [`GrantCell`] issues a
//! [`WriteGrant`] key at runtime to the first (and only the first) caller of
//! [`GrantCell::attach`].

#![deny(missing_docs)]

mod cell;
mod grant;
mod key;


pub use cell::{BroadcastCell, SyncStrategy};
pub use grant::{GrantCell, WriteGrant};
pub use key::WriteKey;
