use std::any::{Any, TypeId};
use std::fmt::Debug;

use crate::{Dep, Updater};

/// Dependency lists of a compute: `(state TypeIds, compute TypeIds)`.
///
/// When any listed state is mutated (or any listed compute is reassigned
/// through an [`Updater`]), the compute is marked dirty and re-run on the next
/// `run_computed` pass.
pub type ComputeDeps = (&'static [TypeId], &'static [TypeId]);

/// Outcome of one `compute` pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeStage {
    /// Work was started (typically a fetch) whose result will arrive later
    /// through the [`Updater`]; do not re-run until something changes.
    Pending,
    /// The cached value is up to date.
    Finished,
}

/// A derived or cached value managed by the [`StateCtx`](crate::StateCtx).
///
/// Two shapes are common:
/// - a cache with a no-op `compute()` that is only ever replaced via
///   `Updater::set(...)` from a command callback;
/// - a reactive compute whose `compute()` derives a value (or starts a fetch)
///   from its dependencies whenever one of them changes.
///
/// `compute()` takes `&self`: results are published through the updater, never
/// written in place.
pub trait Compute: Any + Debug {
    fn deps(&self) -> ComputeDeps;

    fn compute(&self, deps: Dep<'_>, updater: Updater) -> ComputeStage;

    fn as_any(&self) -> &dyn Any;

    fn assign_box(&mut self, new_self: Box<dyn Any>);
}

/// Replace `this` with the value in `new_self`, which must be the same
/// concrete type. Used by `Compute::assign_box` implementations.
pub fn assign_impl<T: Any>(this: &mut T, new_self: Box<dyn Any>) {
    match new_self.downcast::<T>() {
        Ok(value) => *this = *value,
        Err(_) => log::error!(
            "assign_impl: type mismatch assigning {}",
            std::any::type_name::<T>()
        ),
    }
}
