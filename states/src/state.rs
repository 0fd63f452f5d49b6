use std::any::Any;
use std::fmt::Debug;

/// A plain piece of application state owned by the [`StateCtx`](crate::StateCtx).
///
/// States are registered once with `add_state` and then read or mutated on the
/// UI thread through `state`/`state_mut`/`update`. Mutating a state marks every
/// compute that lists it in its `deps()` as dirty.
pub trait State: Any + Debug {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
