use std::sync::Arc;

use bevy::prelude::*;
use crossbeam_channel::{Receiver, TryRecvError};

use crate::error::RemoteError;
use crate::sync::{RemoteBlockStore, RemoteChange, RemoteWrite};

/// Connection to the shared block store: writes waiting to go out and the
/// subscription feed coming back in.
#[derive(Resource)]
pub struct RemoteSync {
    store: Arc<dyn RemoteBlockStore>,
    feed: Option<Receiver<RemoteChange>>,
    outbox: Vec<RemoteWrite>,
}

impl RemoteSync {
    pub fn new(store: Arc<dyn RemoteBlockStore>) -> Self {
        Self {
            store,
            feed: None,
            outbox: Vec::new(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.feed.is_some()
    }

    /// Start the subscription. The store replays its contents first.
    pub fn connect(&mut self) -> Result<(), RemoteError> {
        self.feed = Some(self.store.subscribe()?);
        Ok(())
    }

    pub fn queue(&mut self, write: RemoteWrite) {
        self.outbox.push(write);
    }

    pub fn pending(&self) -> &[RemoteWrite] {
        &self.outbox
    }

    /// Send every queued write. A failed write is dropped; the local edit stays.
    pub fn flush(&mut self) -> Vec<RemoteError> {
        let mut errors = Vec::new();
        for write in self.outbox.drain(..) {
            let result = match &write {
                RemoteWrite::Upsert(record) => record
                    .to_document()
                    .and_then(|document| self.store.upsert(&record.key(), document)),
                RemoteWrite::Delete(key) => self.store.delete(key),
            };
            if let Err(err) = result {
                errors.push(err);
            }
        }
        errors
    }

    /// Everything the feed has delivered since the last poll
    pub fn poll(&mut self) -> Result<Vec<RemoteChange>, RemoteError> {
        let Some(feed) = &self.feed else {
            return Err(RemoteError::Disconnected);
        };

        let mut changes = Vec::new();
        let mut disconnected = false;
        loop {
            match feed.try_recv() {
                Ok(change) => changes.push(change),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }

        if disconnected {
            self.feed = None;
            if changes.is_empty() {
                return Err(RemoteError::Disconnected);
            }
        }
        Ok(changes)
    }
}
