use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use flume::{Receiver, Sender};

use crate::updater::UpdateMessage;
use crate::{Command, Compute, ComputeStage, Dep, Error, State, StateSyncStatus, Updater};

pub(crate) struct ComputeSlot {
    pub(crate) value: Box<dyn Compute>,
    pub(crate) status: StateSyncStatus,
}

/// Registry of app states, compute caches, and commands.
///
/// One instance lives in the app state and drives the per-frame cycle:
/// `sync_computes` applies queued updates at frame start, widgets read and
/// mutate states while rendering, `flush_commands` runs queued commands, and
/// `run_computed` re-runs dirty caches at frame end.
pub struct StateCtx {
    states: HashMap<TypeId, Box<dyn State>>,
    computes: HashMap<TypeId, ComputeSlot>,
    commands: HashMap<TypeId, Box<dyn Command>>,
    queued: Vec<TypeId>,
    // Reverse dependency edges, built from `Compute::deps` at registration.
    state_dependents: HashMap<TypeId, Vec<TypeId>>,
    compute_dependents: HashMap<TypeId, Vec<TypeId>>,
    tx: Sender<UpdateMessage>,
    rx: Receiver<UpdateMessage>,
    waker: Option<Arc<dyn Fn() + Send + Sync>>,
}

impl StateCtx {
    pub fn new() -> Self {
        let (tx, rx) = flume::unbounded();
        Self {
            states: HashMap::new(),
            computes: HashMap::new(),
            commands: HashMap::new(),
            queued: Vec::new(),
            state_dependents: HashMap::new(),
            compute_dependents: HashMap::new(),
            tx,
            rx,
            waker: None,
        }
    }

    /// Install a callback invoked whenever an update is queued, so background
    /// fetches can request a repaint.
    pub fn set_waker(&mut self, waker: impl Fn() + Send + Sync + 'static) {
        self.waker = Some(Arc::new(waker));
    }

    /// Handle for queueing compute updates from callbacks and tests.
    pub fn updater(&self) -> Updater {
        Updater::new(self.tx.clone(), self.waker.clone())
    }

    pub fn add_state<T: State>(&mut self, state: T) {
        self.states.insert(TypeId::of::<T>(), Box::new(state));
    }

    pub fn record_compute<C: Compute>(&mut self, compute: C) {
        let id = TypeId::of::<C>();
        let (state_deps, compute_deps) = compute.deps();
        for dep in state_deps {
            self.state_dependents.entry(*dep).or_default().push(id);
        }
        for dep in compute_deps {
            self.compute_dependents.entry(*dep).or_default().push(id);
        }
        self.computes.insert(
            id,
            ComputeSlot {
                value: Box::new(compute),
                status: StateSyncStatus::Init,
            },
        );
    }

    pub fn record_command<C: Command>(&mut self, command: C) {
        self.commands.insert(TypeId::of::<C>(), Box::new(command));
    }

    /// Immutable access to a registered state.
    ///
    /// Panics when the state was never added; registration happens once at
    /// startup, so a miss is a wiring bug.
    pub fn state<T: State>(&self) -> &T {
        let Some(state) = self
            .states
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.as_any().downcast_ref::<T>())
        else {
            panic!(
                "{}",
                Error::state_not_found(TypeId::of::<T>(), std::any::type_name::<T>())
            );
        };
        state
    }

    /// Mutable access to a registered state. Computes depending on `T` are
    /// marked dirty and re-run at frame end.
    pub fn state_mut<T: State>(&mut self) -> &mut T {
        self.mark_state_dependents_dirty(&TypeId::of::<T>());
        let Some(state) = self
            .states
            .get_mut(&TypeId::of::<T>())
            .and_then(|boxed| boxed.as_any_mut().downcast_mut::<T>())
        else {
            panic!(
                "{}",
                Error::state_not_found(TypeId::of::<T>(), std::any::type_name::<T>())
            );
        };
        state
    }

    /// Mutate a state through a closure.
    pub fn update<T: State>(&mut self, f: impl FnOnce(&mut T)) {
        f(self.state_mut::<T>());
    }

    /// Cached value of a registered compute, or `None` when unregistered.
    pub fn cached<C: Compute>(&self) -> Option<&C> {
        self.computes
            .get(&TypeId::of::<C>())
            .and_then(|slot| slot.value.as_any().downcast_ref::<C>())
    }

    /// Cached value of a compute that must be registered.
    pub fn compute<C: Compute>(&self) -> &C {
        let Some(compute) = self.cached::<C>() else {
            panic!(
                "{}",
                Error::compute_not_found(TypeId::of::<C>(), std::any::type_name::<C>())
            );
        };
        compute
    }

    /// Run a registered command right away.
    pub fn dispatch<C: Command>(&self) {
        let id = TypeId::of::<C>();
        let Some(command) = self.commands.get(&id) else {
            panic!(
                "{}",
                Error::command_not_found(id, std::any::type_name::<C>())
            );
        };
        let deps = Dep::new(&self.states, &self.computes);
        command.run(deps, self.updater());
    }

    /// Queue a command to run at the next `flush_commands`. Used from deep
    /// inside widget closures where states are already borrowed.
    pub fn enqueue_command<C: Command>(&mut self) {
        let id = TypeId::of::<C>();
        if !self.commands.contains_key(&id) {
            panic!(
                "{}",
                Error::command_not_found(id, std::any::type_name::<C>())
            );
        }
        self.queued.push(id);
    }

    /// Run all queued commands in enqueue order.
    pub fn flush_commands(&mut self) {
        let queued = std::mem::take(&mut self.queued);
        for id in queued {
            let Some(command) = self.commands.get(&id) else {
                log::error!("flush_commands: command {id:?} vanished after enqueue");
                continue;
            };
            let deps = Dep::new(&self.states, &self.computes);
            command.run(deps, self.updater());
        }
    }

    /// Apply queued compute updates. Assigned caches become clean and their
    /// dependent caches dirty; invalidated caches become dirty.
    pub fn sync_computes(&mut self) {
        while let Ok(message) = self.rx.try_recv() {
            match message {
                UpdateMessage::Assign { target, value } => {
                    let Some(slot) = self.computes.get_mut(&target) else {
                        log::error!("sync_computes: assign for unregistered compute {target:?}");
                        continue;
                    };
                    slot.value.assign_box(value);
                    slot.status = StateSyncStatus::Clean;
                    self.mark_compute_dependents_dirty(&target);
                }
                UpdateMessage::Invalidate { target } => {
                    let Some(slot) = self.computes.get_mut(&target) else {
                        log::error!(
                            "sync_computes: invalidate for unregistered compute {target:?}"
                        );
                        continue;
                    };
                    slot.status = StateSyncStatus::Dirty;
                }
            }
        }
    }

    /// Run every compute whose cache is new or dirty.
    ///
    /// A compute returning `Pending` stays pending until its assignment
    /// arrives on the channel; `Finished` means the cache is already current.
    pub fn run_computed(&mut self) {
        let pending: Vec<TypeId> = self
            .computes
            .iter()
            .filter(|(_, slot)| {
                matches!(
                    slot.status,
                    StateSyncStatus::Init | StateSyncStatus::Dirty
                )
            })
            .map(|(id, _)| *id)
            .collect();
        for id in pending {
            // Take the slot out so the compute can read sibling caches
            // through Dep without aliasing its own entry.
            let Some(mut slot) = self.computes.remove(&id) else {
                continue;
            };
            let deps = Dep::new(&self.states, &self.computes);
            let stage = slot.value.compute(deps, self.updater());
            slot.status = match stage {
                ComputeStage::Pending => StateSyncStatus::Pending,
                ComputeStage::Finished => StateSyncStatus::Clean,
            };
            self.computes.insert(id, slot);
        }
    }

    /// Drive computes and queued updates until nothing is left dirty.
    /// Test helper for settling a cascade in one call.
    pub fn run_all_dirty(&mut self) {
        for _ in 0..16 {
            self.run_computed();
            self.sync_computes();
            let settled = self
                .computes
                .values()
                .all(|slot| {
                    !matches!(
                        slot.status,
                        StateSyncStatus::Init | StateSyncStatus::Dirty
                    )
                });
            if settled {
                return;
            }
        }
        log::warn!("run_all_dirty: computes did not settle, likely a dependency cycle");
    }

    /// Force a compute cache clean without running it.
    pub fn mark_clean(&mut self, id: &TypeId) {
        if let Some(slot) = self.computes.get_mut(id) {
            slot.status = StateSyncStatus::Clean;
        }
    }

    /// Force a compute cache dirty so it re-runs at frame end.
    pub fn mark_dirty(&mut self, id: &TypeId) {
        if let Some(slot) = self.computes.get_mut(id) {
            slot.status = StateSyncStatus::Dirty;
        }
    }

    fn mark_state_dependents_dirty(&mut self, state_id: &TypeId) {
        let Some(dependents) = self.state_dependents.get(state_id) else {
            return;
        };
        for dependent in dependents {
            if let Some(slot) = self.computes.get_mut(dependent) {
                slot.status = StateSyncStatus::Dirty;
            }
        }
    }

    fn mark_compute_dependents_dirty(&mut self, compute_id: &TypeId) {
        let Some(dependents) = self.compute_dependents.get(compute_id) else {
            return;
        };
        for dependent in dependents {
            if let Some(slot) = self.computes.get_mut(dependent) {
                slot.status = StateSyncStatus::Dirty;
            }
        }
    }
}

impl Default for StateCtx {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StateCtx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateCtx")
            .field("states", &self.states.len())
            .field("computes", &self.computes.len())
            .field("commands", &self.commands.len())
            .field("queued", &self.queued.len())
            .finish()
    }
}
