//! Runtime-issued write authorization.
//!
//! [`BroadcastCell`] wants a compile-time marker type per writer domain.
//! When no such domain exists (the writer is chosen at runtime, say by
//! whichever worker wins initialization), a [`GrantCell`] mints the key
//! instead: the first caller of [`attach`](GrantCell::attach) receives the
//! only [`WriteGrant`] the cell will ever issue.

use std::fmt::{self, Debug, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::cell::{BroadcastCell, SyncStrategy};
use crate::key::WriteKey;

/// Move-only proof of write authorization, minted at most once per
/// [`GrantCell`].
///
/// There is deliberately no `Clone` and no re-issuance path: dropping the
/// grant makes its cell permanently read-only.
pub struct WriteGrant {
    _priv: (),
}

/// A `GrantCell` mints at most one `WriteGrant`, so at most one live value
/// exists per issuing cell.
///
/// # Safety
///
/// The single-key obligation of [`WriteKey`] holds as long as a grant is
/// only presented to the cell that issued it. The cell does not verify
/// provenance: presenting a grant to a foreign `GrantCell` breaks the
/// contract just like duplicating a marker key would.
unsafe impl WriteKey for WriteGrant {}

impl Debug for WriteGrant {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "WriteGrant")
    }
}

/// A [`BroadcastCell`] whose write authorization is issued at runtime,
/// exactly once.
///
/// Both slots start at `T::default()`. Until someone attaches, the cell is
/// read-only and every reader observes the default. The attach transition is
/// a one-shot atomic state machine: unattached → attached, no way back, no
/// second winner.
pub struct GrantCell<T> {
    cell: BroadcastCell<WriteGrant, T>,

    /// One-shot flag: `false` until the first successful attach, `true`
    /// forever after.
    attached: AtomicBool,
}

impl<T: Default + Clone> GrantCell<T> {
    /// Create an unattached cell; master and replica hold `T::default()`.
    pub fn new() -> Self {
        GrantCell {
            cell: BroadcastCell::default(),
            attached: AtomicBool::new(false),
        }
    }
}

impl<T> GrantCell<T> {
    /// Claim write authorization without an initializer.
    ///
    /// The master keeps its current (default) value; the call still performs
    /// the first publish, so "attach implies a publish" holds for both
    /// attach forms. Returns `None`, and does nothing, on every call after
    /// the first successful one.
    pub fn attach(&self) -> Option<WriteGrant>
    where
        T: Clone,
    {
        let mut grant = self.claim()?;
        self.cell.resync(&mut grant);
        Some(grant)
    }

    /// Claim write authorization and populate the master from `init`.
    ///
    /// At most one call ever succeeds; only the winner runs `init` and pays
    /// for the first publish. Losing calls return `None` with no side
    /// effects, including calls racing the winner from other threads.
    pub fn attach_with<F>(&self, init: F) -> Option<WriteGrant>
    where
        T: Clone,
        F: FnOnce() -> T,
    {
        let mut grant = self.claim()?;
        self.cell.replace(&mut grant, init());
        Some(grant)
    }

    /// The unattached → attached transition. Mints the grant for the one
    /// caller that wins the flag.
    fn claim(&self) -> Option<WriteGrant> {
        self.attached
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
            .then(|| WriteGrant { _priv: () })
    }

    /// Get a direct reference to the master. See [`BroadcastCell::get`].
    pub fn get<'a>(&'a self, grant: &'a WriteGrant) -> &'a T {
        self.cell.get(grant)
    }

    /// Copy the current replica out under its shared lock. See
    /// [`BroadcastCell::snapshot`].
    pub fn snapshot(&self) -> T
    where
        T: Clone,
    {
        self.cell.snapshot()
    }

    /// Run `f` against the replica without copying. See
    /// [`BroadcastCell::read_with`]; the same no-reentrancy rule applies.
    pub fn read_with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.cell.read_with(f)
    }

    /// Assign into the master, then publish. See [`BroadcastCell::replace`].
    pub fn replace(&self, grant: &mut WriteGrant, value: T)
    where
        T: Clone,
    {
        self.cell.replace(grant, value);
    }

    /// Edit the master and publish with [`SyncStrategy::Copy`]. See
    /// [`BroadcastCell::update`].
    pub fn update<F>(&self, grant: &mut WriteGrant, edit: F) -> bool
    where
        T: Clone,
        F: FnMut(&mut T) -> bool,
    {
        self.cell.update(grant, edit)
    }

    /// Edit the master and publish per `strategy`. See
    /// [`BroadcastCell::update_with`].
    pub fn update_with<F>(&self, grant: &mut WriteGrant, strategy: SyncStrategy, edit: F) -> bool
    where
        T: Clone,
        F: FnMut(&mut T) -> bool,
    {
        self.cell.update_with(grant, strategy, edit)
    }

    /// Consume the cell and return the master value. See
    /// [`BroadcastCell::into_inner`].
    pub fn into_inner(self) -> T {
        self.cell.into_inner()
    }
}

impl<T: Default + Clone> Default for GrantCell<T> {
    fn default() -> Self {
        GrantCell::new()
    }
}

/// Renders the replica, like [`BroadcastCell`]'s `Debug`.
impl<T: Debug> Debug for GrantCell<T> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        <BroadcastCell<WriteGrant, T> as Debug>::fmt(&self.cell, f)
    }
}
