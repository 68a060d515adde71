//! Write-authorization keys.

/// Capability marker for types whose values authorize mutation of a cell.
///
/// A [`BroadcastCell`](crate::BroadcastCell) hands out `&mut` access to its
/// unsynchronized master slot to whoever presents a key of the cell's domain
/// type. The cell performs no identity check beyond possession; that is the
/// point: the write path costs nothing at runtime. All of the discipline
/// lives in this contract instead.
///
/// There are two ways to obtain a key:
/// -   Declare a marker type per logical writer domain and implement this
///     trait for it. Whoever holds the one value of that type is the writer.
/// -   Let a [`GrantCell`](crate::GrantCell) mint a
///     [`WriteGrant`](crate::WriteGrant) at runtime; the cell guarantees it
///     mints at most one.
///
/// # Safety
///
/// By writing `unsafe impl WriteKey for K`, the implementor guarantees, for
/// every cell keyed by `K`:
///
/// -   at most one live value of `K` is ever used with that cell, and
/// -   `K` is not `Clone` or `Copy`, so that value cannot be duplicated.
///
/// Under that guarantee the borrow checker does the rest. Mutating entry
/// points take `&mut K`, and the master-reference read ties its result to a
/// `&K` borrow, so accesses through the one key value can never overlap,
/// even when the writer's work migrates between threads. Duplicating the key
/// (a second value of the same type, a `Clone` impl, a grant minted for one
/// cell presented to another) reintroduces unsynchronized aliasing of the
/// master slot, which is undefined behavior, not a detected error.
pub unsafe trait WriteKey {}
