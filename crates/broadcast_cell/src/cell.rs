//! Replicated cells: an unsynchronized master slot for the writer, a
//! lock-protected replica slot for everyone else.

use std::cell::UnsafeCell;
use std::fmt::{self, Debug, Formatter};
use std::marker::PhantomData;
use std::mem;

use parking_lot::RwLock;

use crate::key::WriteKey;

/// How a successful master edit is propagated to the replica.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SyncStrategy {
    /// Clone the updated master outside the replica lock, then hold the
    /// exclusive lock only long enough to swap the clone in. The displaced
    /// value is dropped after the lock is released, so the exclusive-hold
    /// time does not depend on the payload size.
    #[default]
    Copy,

    /// Re-run the writer's edit against the replica under the exclusive
    /// lock. This skips the deep copy, but holds the lock for the edit's
    /// full duration, and the edit must tolerate running against a snapshot
    /// that differs from the master it just saw. If the replay reports
    /// `false`, the replica has diverged and is reconciled with a master
    /// copy instead, without releasing the lock in between.
    Replay,
}

/// A value replicated into two slots: a master the writer edits freely and a
/// replica any thread can read.
///
/// `K` is the cell's write-authorization domain; see [`WriteKey`] for the
/// contract that makes the unlocked master slot sound. The cell never stores
/// a key; it only demands one in mutating signatures.
///
/// Writers pay no synchronization on the master. Readers pay a shared
/// [`RwLock`] acquisition on the replica. The two meet only in the publish
/// step, which takes the replica's exclusive lock.
///
/// The closures passed to [`read_with`](BroadcastCell::read_with),
/// [`update`](BroadcastCell::update) and
/// [`update_with`](BroadcastCell::update_with) run while the cell may be
/// holding the replica lock and must not call back into the same cell.
pub struct BroadcastCell<K, T> {
    /// The writer's value. No lock: the `WriteKey` contract plus the `&mut K`
    /// signatures guarantee at most one live access at a time.
    master: UnsafeCell<T>,

    /// The readers' value. Exclusively locked only while a publish step
    /// swaps or replays; shared-locked by any number of readers.
    replica: RwLock<T>,

    /// fn-pointer marker keeps `K` out of the cell's auto traits; the cell
    /// never owns a key.
    _domain: PhantomData<fn(&K)>,
}

/// A `BroadcastCell` is shared across threads even though the master slot is
/// an `UnsafeCell`.
///
/// # Safety
///
/// The master slot is only ever dereferenced inside methods that take a key
/// of the cell's domain type: mutably under `&mut K`, shared under `&K` with
/// the result tied to the key borrow. The `WriteKey` contract limits the
/// cell to one live key value, so those borrows serialize every master
/// access no matter which thread makes it. `T: Send` because publish moves
/// values between threads; `T: Sync` because readers on other threads hold
/// `&T` into the replica.
unsafe impl<K, T: Send + Sync> Sync for BroadcastCell<K, T> {}

impl<K: WriteKey, T> BroadcastCell<K, T> {
    /// Create a cell holding `value`; the replica starts as a copy of it.
    pub fn new(value: T) -> Self
    where
        T: Clone,
    {
        let replica = value.clone();
        BroadcastCell {
            master: UnsafeCell::new(value),
            replica: RwLock::new(replica),
            _domain: PhantomData,
        }
    }

    /// Get a direct reference to the master. Zero copy, zero lock.
    ///
    /// This is the writer's own read path. The returned borrow is tied to
    /// `key`, so the borrow checker keeps this key value out of every
    /// `&mut K` entry point for as long as the reference lives; the
    /// [`WriteKey`] contract rules out other key values.
    pub fn get<'a>(&'a self, _key: &'a K) -> &'a T {
        // Safety: the key borrow excludes every mutating method on this
        // cell, and publish steps never touch the master slot.
        unsafe { &*self.master.get() }
    }

    /// Copy the current replica out under its shared lock.
    ///
    /// Available to any caller, no key required.
    pub fn snapshot(&self) -> T
    where
        T: Clone,
    {
        self.replica.read().clone()
    }

    /// Run `f` against the replica under its shared lock, without copying.
    ///
    /// For large payloads where [`snapshot`](BroadcastCell::snapshot) would
    /// be wasteful. `f` must not call back into this cell.
    pub fn read_with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let replica = self.replica.read();
        f(&replica)
    }

    /// Assign `value` into the master, then unconditionally publish.
    pub fn replace(&self, _key: &mut K, value: T)
    where
        T: Clone,
    {
        // Safety: the exclusive key borrow and the `WriteKey` contract
        // guarantee no other master access is live.
        let master = unsafe { &mut *self.master.get() };
        *master = value;
        self.publish(master);
    }

    /// Edit the master in place and publish with [`SyncStrategy::Copy`].
    ///
    /// See [`update_with`](BroadcastCell::update_with).
    pub fn update<F>(&self, key: &mut K, edit: F) -> bool
    where
        T: Clone,
        F: FnMut(&mut T) -> bool,
    {
        self.update_with(key, SyncStrategy::Copy, edit)
    }

    /// Edit the master in place and publish per `strategy`.
    ///
    /// `edit` runs directly on the master, unsynchronized. Returning `false`
    /// means "no change was made": nothing is published, the replica is
    /// untouched, and the call returns `false`. Returning `true` triggers a
    /// publish and the call returns `true` regardless of which publish path
    /// ran.
    ///
    /// Under [`SyncStrategy::Replay`] the same `edit` is re-invoked against
    /// the replica, so it must be safe to run twice, the second time against
    /// a value that may not match what it just saw.
    pub fn update_with<F>(&self, _key: &mut K, strategy: SyncStrategy, mut edit: F) -> bool
    where
        T: Clone,
        F: FnMut(&mut T) -> bool,
    {
        // Safety: the exclusive key borrow and the `WriteKey` contract
        // guarantee no other master access is live.
        let master = unsafe { &mut *self.master.get() };
        if !edit(master) {
            return false;
        }
        match strategy {
            SyncStrategy::Copy => self.publish(master),
            SyncStrategy::Replay => {
                let mut replica = self.replica.write();
                if !edit(&mut replica) {
                    // The replica was not in the state the edit expected.
                    // Reconcile with a master copy while still holding the
                    // lock, so no reader can observe the diverged value.
                    let retired = mem::replace(&mut *replica, master.clone());
                    drop(replica);
                    drop(retired);
                }
            }
        }
        true
    }

    /// Consume the cell and return the master value.
    ///
    /// Taking the cell by value is what makes teardown safe: the compiler
    /// only grants ownership once no key-holding borrow is outstanding.
    pub fn into_inner(self) -> T {
        self.master.into_inner()
    }

    /// Publish the master into the replica: swap a fresh copy in under the
    /// exclusive lock, drop the displaced value after the lock is gone. The
    /// exclusive hold is a single value swap no matter how expensive the
    /// payload's clone or drop is.
    fn publish(&self, master: &T)
    where
        T: Clone,
    {
        let fresh = master.clone();
        let retired = {
            let mut replica = self.replica.write();
            mem::replace(&mut *replica, fresh)
        };
        drop(retired);
    }

    /// Publish the master as it currently stands.
    pub(crate) fn resync(&self, _key: &mut K)
    where
        T: Clone,
    {
        // Safety: the exclusive key borrow and the `WriteKey` contract
        // guarantee no other master access is live.
        let master = unsafe { &*self.master.get() };
        self.publish(master);
    }
}

impl<K: WriteKey, T: Default + Clone> Default for BroadcastCell<K, T> {
    fn default() -> Self {
        BroadcastCell::new(T::default())
    }
}

/// Renders the replica, the only slot readable without a key.
impl<K, T: Debug> Debug for BroadcastCell<K, T> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        <T as Debug>::fmt(&self.replica.read(), f)
    }
}
