use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use flume::Sender;

use crate::Compute;

/// Message applied to a compute slot during `sync_computes`.
pub(crate) enum UpdateMessage {
    /// Replace the cached value in place and mark it clean.
    Assign {
        target: TypeId,
        value: Box<dyn Any + Send>,
    },
    /// Mark the cached value dirty so its `compute()` runs again.
    Invalidate { target: TypeId },
}

/// Write handle for publishing compute updates from anywhere, including
/// background fetch callbacks.
///
/// Cheap to clone; updates are queued on a channel and applied on the UI
/// thread by `StateCtx::sync_computes`. If a waker is installed (the app
/// points it at `egui::Context::request_repaint`), every send wakes the UI.
#[derive(Clone)]
pub struct Updater {
    tx: Sender<UpdateMessage>,
    waker: Option<Arc<dyn Fn() + Send + Sync>>,
}

impl Updater {
    pub(crate) fn new(tx: Sender<UpdateMessage>, waker: Option<Arc<dyn Fn() + Send + Sync>>) -> Self {
        Self { tx, waker }
    }

    /// Queue a replacement value for the compute cache `C`.
    pub fn set<C: Compute + Send>(&self, value: C) {
        self.send(UpdateMessage::Assign {
            target: TypeId::of::<C>(),
            value: Box::new(value),
        });
    }

    /// Queue a dirty mark for the compute cache `C`, forcing it to re-run on
    /// the next `run_computed` pass.
    pub fn invalidate<C: Compute>(&self) {
        self.send(UpdateMessage::Invalidate {
            target: TypeId::of::<C>(),
        });
    }

    fn send(&self, message: UpdateMessage) {
        if self.tx.send(message).is_err() {
            // The StateCtx is gone; late callbacks after shutdown are dropped.
            log::error!("Updater: state context dropped, update discarded");
            return;
        }
        if let Some(waker) = &self.waker {
            waker();
        }
    }
}

impl fmt::Debug for Updater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Updater")
            .field("queued", &self.tx.len())
            .finish()
    }
}
