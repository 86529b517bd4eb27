use std::collections::BTreeMap;
use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use serde_json::Value;

use crate::error::RemoteError;

/// A notification from a remote store subscription
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteChange {
    Added { key: String, document: Value },
    Modified { key: String, document: Value },
    Removed { key: String },
}

impl RemoteChange {
    pub fn key(&self) -> &str {
        match self {
            RemoteChange::Added { key, .. }
            | RemoteChange::Modified { key, .. }
            | RemoteChange::Removed { key } => key,
        }
    }
}

/// Keyed document store shared between observers.
///
/// Subscribing yields the current contents as `Added` changes, then every
/// later change in the order it was made.
pub trait RemoteBlockStore: Send + Sync {
    fn upsert(&self, key: &str, document: Value) -> Result<(), RemoteError>;

    fn delete(&self, key: &str) -> Result<(), RemoteError>;

    /// Remove many records at once. Missing keys are skipped.
    fn delete_batch(&self, keys: &[String]) -> Result<(), RemoteError> {
        for key in keys {
            self.delete(key)?;
        }
        Ok(())
    }

    fn subscribe(&self) -> Result<Receiver<RemoteChange>, RemoteError>;
}

#[derive(Default)]
struct Collection {
    documents: BTreeMap<String, Value>,
    subscribers: Vec<Sender<RemoteChange>>,
}

impl Collection {
    /// Push to every live subscriber, dropping the ones that hung up
    fn broadcast(&mut self, change: RemoteChange) {
        self.subscribers
            .retain(|subscriber| subscriber.send(change.clone()).is_ok());
    }
}

/// Process-local store. Clones share the same collection, so several
/// observers in one process see each other's edits.
#[derive(Clone, Default)]
pub struct InMemoryBlockStore {
    inner: Arc<Mutex<Collection>>,
}

impl InMemoryBlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.lock().documents.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().documents.is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        self.inner.lock().documents.keys().cloned().collect()
    }
}

impl RemoteBlockStore for InMemoryBlockStore {
    fn upsert(&self, key: &str, document: Value) -> Result<(), RemoteError> {
        let mut collection = self.inner.lock();
        let change = match collection.documents.insert(key.to_string(), document.clone()) {
            None => RemoteChange::Added { key: key.to_string(), document },
            Some(previous) if previous != document => RemoteChange::Modified { key: key.to_string(), document },
            // Rewriting identical content isn't a change
            Some(_) => return Ok(()),
        };
        collection.broadcast(change);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), RemoteError> {
        let mut collection = self.inner.lock();
        if collection.documents.remove(key).is_some() {
            collection.broadcast(RemoteChange::Removed { key: key.to_string() });
        }
        Ok(())
    }

    fn delete_batch(&self, keys: &[String]) -> Result<(), RemoteError> {
        let mut collection = self.inner.lock();
        for key in keys {
            if collection.documents.remove(key).is_some() {
                collection.broadcast(RemoteChange::Removed { key: key.clone() });
            }
        }
        Ok(())
    }

    fn subscribe(&self) -> Result<Receiver<RemoteChange>, RemoteError> {
        let (sender, receiver) = unbounded();
        let mut collection = self.inner.lock();

        for (key, document) in &collection.documents {
            sender
                .send(RemoteChange::Added { key: key.clone(), document: document.clone() })
                .map_err(|_| RemoteError::Disconnected)?;
        }
        collection.subscribers.push(sender);
        Ok(receiver)
    }
}
