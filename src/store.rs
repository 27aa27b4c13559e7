//! Optimistic Checklist Store
//!
//! Local copy of one checklist's item tree. Every edit lands in the local tree
//! synchronously; the returned [`Pending`] future carries out the durable
//! request. A failed request leaves the local edit in place and records it in
//! [`ChecklistStore::failures`] until the next [`ChecklistStore::refresh`].

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};

use crate::commands::Backend;
use crate::error::{ClientError, ClientResult};
use crate::models::{ItemKey, NewItem, Node};
use crate::tree;

/// Durable half of a mutation. The local half has already been applied.
pub type Pending<T> = Pin<Box<dyn Future<Output = ClientResult<T>> + Send + 'static>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Toggle,
    Rename,
    Insert,
    Delete,
}

/// A mutation the server rejected while its local edit stayed visible
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub seq: u64,
    pub kind: MutationKind,
    pub target: ItemKey,
    pub error: ClientError,
}

/// Outcome of comparing the local tree with the server's
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    Unchanged,
    /// The local copy was stale and has been replaced
    Diverged,
}

#[derive(Debug, Clone)]
enum Status {
    InFlight,
    Failed(ClientError),
}

#[derive(Debug, Clone)]
struct JournalEntry {
    kind: MutationKind,
    target: ItemKey,
    status: Status,
}

#[derive(Debug, Default)]
struct LocalState {
    roots: Vec<Node>,
    /// Unconfirmed mutations by sequence number
    journal: BTreeMap<u64, JournalEntry>,
    next_seq: u64,
}

impl LocalState {
    fn begin(&mut self, kind: MutationKind, target: ItemKey) -> u64 {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.journal.insert(
            seq,
            JournalEntry {
                kind,
                target,
                status: Status::InFlight,
            },
        );
        seq
    }

    fn settle<T>(&mut self, seq: u64, result: &ClientResult<T>) {
        match result {
            Ok(_) => {
                self.journal.remove(&seq);
            }
            Err(e) => {
                if let Some(entry) = self.journal.get_mut(&seq) {
                    warn!("{:?} on {} failed, keeping local edit: {}", entry.kind, entry.target, e);
                    entry.status = Status::Failed(e.clone());
                }
            }
        }
    }

    fn in_flight(&self) -> usize {
        self.journal
            .values()
            .filter(|e| matches!(e.status, Status::InFlight))
            .count()
    }

    /// Server id of an existing, confirmed node
    fn saved_target(&self, key: ItemKey) -> ClientResult<u32> {
        if tree::find(&self.roots, key).is_none() {
            return Err(ClientError::NotFound(key));
        }
        key.saved_id().ok_or(ClientError::NotSynced(key))
    }
}

fn lock(state: &Mutex<LocalState>) -> MutexGuard<'_, LocalState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn with_state<R>(state: &Mutex<LocalState>, f: impl FnOnce(&mut LocalState) -> R) -> R {
    f(&mut lock(state))
}

#[derive(Debug, Clone, Copy)]
enum Placement {
    After,
    FirstChild,
}

/// Optimistic mirror of one checklist
pub struct ChecklistStore<B> {
    checklist_id: u32,
    backend: Arc<B>,
    state: Arc<Mutex<LocalState>>,
}

impl<B> Clone for ChecklistStore<B> {
    fn clone(&self) -> Self {
        Self {
            checklist_id: self.checklist_id,
            backend: Arc::clone(&self.backend),
            state: Arc::clone(&self.state),
        }
    }
}

impl<B: Backend> ChecklistStore<B> {
    /// Empty store; call [`refresh`](Self::refresh) to populate it
    pub fn new(backend: B, checklist_id: u32) -> Self {
        Self::with_backend(Arc::new(backend), checklist_id)
    }

    pub fn with_backend(backend: Arc<B>, checklist_id: u32) -> Self {
        Self {
            checklist_id,
            backend,
            state: Arc::new(Mutex::new(LocalState::default())),
        }
    }

    /// Store populated with the current canonical tree
    pub async fn load(backend: B, checklist_id: u32) -> ClientResult<Self> {
        let store = Self::new(backend, checklist_id);
        store.refresh().await?;
        Ok(store)
    }

    pub fn checklist_id(&self) -> u32 {
        self.checklist_id
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Current local tree, including unconfirmed edits
    pub fn snapshot(&self) -> Vec<Node> {
        lock(&self.state).roots.clone()
    }

    pub fn get(&self, key: ItemKey) -> Option<Node> {
        tree::find(&lock(&self.state).roots, key).cloned()
    }

    /// Sequence number of the oldest unconfirmed mutation
    pub fn dirty_since(&self) -> Option<u64> {
        lock(&self.state).journal.keys().next().copied()
    }

    pub fn in_flight(&self) -> usize {
        lock(&self.state).in_flight()
    }

    pub fn failures(&self) -> Vec<Failure> {
        lock(&self.state)
            .journal
            .iter()
            .filter_map(|(seq, entry)| match &entry.status {
                Status::Failed(error) => Some(Failure {
                    seq: *seq,
                    kind: entry.kind,
                    target: entry.target,
                    error: error.clone(),
                }),
                Status::InFlight => None,
            })
            .collect()
    }

    pub fn toggle(&self, key: ItemKey) -> ClientResult<Pending<bool>> {
        let (seq, item_id) = with_state(&self.state, |state| {
            let item_id = state.saved_target(key)?;
            tree::toggle(&mut state.roots, key).ok_or(ClientError::NotFound(key))?;
            Ok::<_, ClientError>((state.begin(MutationKind::Toggle, key), item_id))
        })?;
        debug!("toggle {} (#{})", key, seq);

        let backend = Arc::clone(&self.backend);
        let shared = Arc::clone(&self.state);
        let checklist_id = self.checklist_id;
        Ok(Box::pin(async move {
            let result = backend.toggle_item(checklist_id, item_id).await;
            with_state(&shared, |state| state.settle(seq, &result));
            result
        }))
    }

    pub fn rename(&self, key: ItemKey, name: impl Into<String>) -> ClientResult<Pending<()>> {
        let name = name.into();
        let (seq, item_id) = with_state(&self.state, |state| {
            let item_id = state.saved_target(key)?;
            if !tree::rename(&mut state.roots, key, &name) {
                return Err(ClientError::NotFound(key));
            }
            Ok::<_, ClientError>((state.begin(MutationKind::Rename, key), item_id))
        })?;
        debug!("rename {} (#{})", key, seq);

        let backend = Arc::clone(&self.backend);
        let shared = Arc::clone(&self.state);
        let checklist_id = self.checklist_id;
        Ok(Box::pin(async move {
            let result = backend.rename_item(checklist_id, item_id, &name).await;
            with_state(&shared, |state| state.settle(seq, &result));
            result
        }))
    }

    /// New sibling directly after `anchor`.
    ///
    /// Returns the provisional key at once; the future resolves to the saved key.
    pub fn insert_after(
        &self,
        anchor: ItemKey,
        name: impl Into<String>,
    ) -> ClientResult<(ItemKey, Pending<ItemKey>)> {
        self.insert(anchor, name.into(), Placement::After)
    }

    /// New first child of `anchor`
    pub fn insert_child(
        &self,
        anchor: ItemKey,
        name: impl Into<String>,
    ) -> ClientResult<(ItemKey, Pending<ItemKey>)> {
        self.insert(anchor, name.into(), Placement::FirstChild)
    }

    fn insert(
        &self,
        anchor: ItemKey,
        name: String,
        placement: Placement,
    ) -> ClientResult<(ItemKey, Pending<ItemKey>)> {
        let checklist_id = self.checklist_id;
        let (seq, key, new_item) = with_state(&self.state, |state| {
            state.saved_target(anchor)?;

            let node = Node::provisional(checklist_id, name.clone());
            let key = node.key;
            let position = match placement {
                Placement::After => tree::insert_after(&mut state.roots, anchor, node),
                Placement::FirstChild => tree::insert_child(&mut state.roots, anchor, node),
            }
            .ok_or(ClientError::NotFound(anchor))?;
            let parent_item_id = tree::find(&state.roots, key).and_then(|n| n.parent_item_id);

            let new_item = NewItem {
                name,
                checklist_id,
                parent_item_id,
                is_checked: false,
                position: Some(position),
            };
            Ok::<_, ClientError>((state.begin(MutationKind::Insert, key), key, new_item))
        })?;
        debug!("insert {:?} {} as {} (#{})", placement, anchor, key, seq);

        let backend = Arc::clone(&self.backend);
        let shared = Arc::clone(&self.state);
        let pending: Pending<ItemKey> = Box::pin(async move {
            let result = backend.create_item(&new_item).await;
            let quiet_at = with_state(&shared, |state| {
                if let Ok(item) = &result {
                    tree::confirm(&mut state.roots, key, item.id, item.position);
                }
                state.settle(seq, &result);
                state.journal.is_empty().then_some(state.next_seq)
            });
            let item = result?;

            // Pick up the server's ordering unless that would clobber other local edits.
            // A mutation begun during the fetch bumps `next_seq`, even once confirmed.
            if let Some(quiet_at) = quiet_at {
                match backend.list_items(checklist_id).await {
                    Ok(items) => with_state(&shared, |state| {
                        if state.journal.is_empty() && state.next_seq == quiet_at {
                            state.roots = items.into_iter().map(Node::from).collect();
                        } else {
                            debug!("local edits since refetch of {}, keeping local tree", key);
                        }
                    }),
                    Err(e) => warn!("refetch after insert failed: {}", e),
                }
            }
            Ok(ItemKey::Saved(item.id))
        });
        Ok((key, pending))
    }

    /// Remove `key` and its subtree. The only top-level item cannot be deleted.
    pub fn delete(&self, key: ItemKey) -> ClientResult<Pending<usize>> {
        let (seq, item_id) = with_state(&self.state, |state| {
            let item_id = state.saved_target(key)?;
            if state.roots.len() == 1 && state.roots[0].key == key {
                return Err(ClientError::InvalidState(
                    "cannot delete the only top-level item".to_string(),
                ));
            }
            tree::remove(&mut state.roots, key).ok_or(ClientError::NotFound(key))?;
            Ok::<_, ClientError>((state.begin(MutationKind::Delete, key), item_id))
        })?;
        debug!("delete {} (#{})", key, seq);

        let backend = Arc::clone(&self.backend);
        let shared = Arc::clone(&self.state);
        let checklist_id = self.checklist_id;
        Ok(Box::pin(async move {
            let result = backend.delete_item(checklist_id, item_id).await;
            with_state(&shared, |state| state.settle(seq, &result));
            result
        }))
    }

    /// Replace the local tree with the canonical one and forget the journal.
    ///
    /// Reports `Diverged` when the local copy differed, including edits that
    /// had not been confirmed yet.
    pub async fn refresh(&self) -> ClientResult<Reconciled> {
        let items = self.backend.list_items(self.checklist_id).await?;
        let canonical: Vec<Node> = items.into_iter().map(Node::from).collect();

        let reconciled = with_state(&self.state, |state| {
            let reconciled = if state.roots == canonical {
                Reconciled::Unchanged
            } else {
                Reconciled::Diverged
            };
            let dropped = state.journal.len();
            state.roots = canonical;
            state.journal.clear();
            if dropped > 0 {
                debug!("refresh dropped {} journal entries", dropped);
            }
            reconciled
        });

        if reconciled == Reconciled::Diverged {
            info!("checklist {} local tree was stale, replaced", self.checklist_id);
        }
        Ok(reconciled)
    }
}
