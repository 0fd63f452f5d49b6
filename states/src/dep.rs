use std::any::TypeId;
use std::collections::HashMap;

use crate::ctx::ComputeSlot;
use crate::error::Error;
use crate::{Compute, State};

/// Read access to registered states and computes, handed to commands and to
/// `Compute::compute`.
pub struct Dep<'a> {
    states: &'a HashMap<TypeId, Box<dyn State>>,
    computes: &'a HashMap<TypeId, ComputeSlot>,
}

impl<'a> Dep<'a> {
    pub(crate) fn new(
        states: &'a HashMap<TypeId, Box<dyn State>>,
        computes: &'a HashMap<TypeId, ComputeSlot>,
    ) -> Self {
        Self { states, computes }
    }

    /// Get a reference to a registered state.
    ///
    /// # Panics
    /// Panics if the state type was never registered; that is a wiring bug,
    /// not a runtime condition.
    pub fn get_state_ref<T: State>(&self) -> &'a T {
        self.states
            .get(&TypeId::of::<T>())
            .and_then(|state| state.as_any().downcast_ref::<T>())
            .unwrap_or_else(|| {
                panic!(
                    "{}",
                    Error::state_not_found(TypeId::of::<T>(), std::any::type_name::<T>())
                )
            })
    }

    /// Get a reference to a registered compute's cached value.
    ///
    /// # Panics
    /// Panics if the compute type was never registered.
    pub fn get_compute_ref<T: Compute>(&self) -> &'a T {
        self.computes
            .get(&TypeId::of::<T>())
            .and_then(|slot| slot.value.as_any().downcast_ref::<T>())
            .unwrap_or_else(|| {
                panic!(
                    "{}",
                    Error::compute_not_found(TypeId::of::<T>(), std::any::type_name::<T>())
                )
            })
    }
}
