mod command;
mod compute;
mod ctx;
mod dep;
mod error;
mod state;
mod state_sync_status;
mod updater;

pub use command::Command;
pub use compute::{Compute, ComputeDeps, ComputeStage, assign_impl};
pub use ctx::StateCtx;
pub use dep::Dep;
pub use error::Error;
pub use state::State;
pub use state_sync_status::StateSyncStatus;
pub use updater::Updater;

#[cfg(test)]
mod state_ctx_test {
    use std::any::{Any, TypeId};

    use super::*;

    #[derive(Debug, Default)]
    struct Counter {
        value: i32,
    }

    impl State for Counter {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[derive(Debug, Default, PartialEq)]
    struct Doubled {
        value: i32,
        runs: u32,
    }

    impl Compute for Doubled {
        fn deps(&self) -> ComputeDeps {
            const STATE_IDS: [TypeId; 1] = [TypeId::of::<Counter>()];
            (&STATE_IDS, &[])
        }

        fn compute(&self, deps: Dep, updater: Updater) -> ComputeStage {
            let counter = deps.get_state_ref::<Counter>();
            updater.set(Doubled {
                value: counter.value * 2,
                runs: self.runs + 1,
            });
            ComputeStage::Pending
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn assign_box(&mut self, new_self: Box<dyn Any>) {
            assign_impl(self, new_self);
        }
    }

    #[derive(Debug)]
    struct AddTen;

    impl Command for AddTen {
        fn run(&self, deps: Dep, updater: Updater) {
            let counter = deps.get_state_ref::<Counter>();
            let doubled = deps.get_compute_ref::<Doubled>();
            updater.set(Doubled {
                value: counter.value + 10,
                runs: doubled.runs + 1,
            });
        }
    }

    #[test]
    fn test_state_read_and_write() {
        let mut ctx = StateCtx::new();
        ctx.add_state(Counter { value: 3 });
        assert_eq!(ctx.state::<Counter>().value, 3);
        ctx.state_mut::<Counter>().value = 8;
        assert_eq!(ctx.state::<Counter>().value, 8);
        ctx.update::<Counter>(|counter| counter.value += 1);
        assert_eq!(ctx.state::<Counter>().value, 9);
    }

    #[test]
    fn test_compute_assigns_through_channel() {
        let mut ctx = StateCtx::new();
        ctx.add_state(Counter { value: 3 });
        ctx.record_compute(Doubled::default());
        ctx.run_computed();
        // The new value is queued, not applied yet.
        assert_eq!(ctx.compute::<Doubled>().value, 0);
        ctx.sync_computes();
        assert_eq!(ctx.compute::<Doubled>().value, 6);
        assert_eq!(ctx.compute::<Doubled>().runs, 1);
    }

    #[test]
    fn test_state_mut_marks_dependents_dirty() {
        let mut ctx = StateCtx::new();
        ctx.add_state(Counter { value: 1 });
        ctx.record_compute(Doubled::default());
        ctx.run_all_dirty();
        assert_eq!(ctx.compute::<Doubled>().value, 2);
        ctx.state_mut::<Counter>().value = 5;
        ctx.run_all_dirty();
        assert_eq!(ctx.compute::<Doubled>().value, 10);
        assert_eq!(ctx.compute::<Doubled>().runs, 2);
    }

    #[test]
    fn test_invalidate_forces_rerun() {
        let mut ctx = StateCtx::new();
        ctx.add_state(Counter { value: 2 });
        ctx.record_compute(Doubled::default());
        ctx.run_all_dirty();
        assert_eq!(ctx.compute::<Doubled>().runs, 1);
        ctx.updater().invalidate::<Doubled>();
        ctx.run_all_dirty();
        assert_eq!(ctx.compute::<Doubled>().runs, 2);
        assert_eq!(ctx.compute::<Doubled>().value, 4);
    }

    #[test]
    fn test_dispatch_runs_registered_command() {
        let mut ctx = StateCtx::new();
        ctx.add_state(Counter { value: 4 });
        ctx.record_compute(Doubled::default());
        ctx.record_command(AddTen);
        ctx.dispatch::<AddTen>();
        ctx.sync_computes();
        assert_eq!(ctx.compute::<Doubled>().value, 14);
    }

    #[test]
    fn test_enqueued_commands_run_on_flush() {
        let mut ctx = StateCtx::new();
        ctx.add_state(Counter { value: 4 });
        ctx.record_compute(Doubled::default());
        ctx.record_command(AddTen);
        ctx.enqueue_command::<AddTen>();
        ctx.sync_computes();
        assert_eq!(ctx.compute::<Doubled>().runs, 0);
        ctx.flush_commands();
        ctx.sync_computes();
        assert_eq!(ctx.compute::<Doubled>().value, 14);
        assert_eq!(ctx.compute::<Doubled>().runs, 1);
    }

    #[test]
    fn test_cached_is_none_for_unregistered_compute() {
        let ctx = StateCtx::new();
        assert!(ctx.cached::<Doubled>().is_none());
    }

    #[test]
    #[should_panic(expected = "is not registered")]
    fn test_missing_state_panics() {
        let ctx = StateCtx::new();
        let _ = ctx.state::<Counter>();
    }
}
