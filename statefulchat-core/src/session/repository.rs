//! Catalog operations over the record store

use tracing::{debug, info, warn};

use super::identity::RecordId;
use super::record::ConversationRecord;
use super::store::{DeleteReport, RecordStore};
use super::title::lookup_title;
use crate::Result;

/// A record together with the identity it is stored under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub id: RecordId,
    pub record: ConversationRecord,
}

/// Listing projection of a stored record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSummary {
    pub id: RecordId,
    pub title: String,
    pub date: String,
    pub time: String,
    pub turn_count: usize,
}

/// A delete that has been looked up but not yet confirmed by the user
#[derive(Debug)]
pub struct PendingDelete {
    id: RecordId,
    title: String,
}

impl PendingDelete {
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// Title to show in the confirmation prompt
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Call only after the user answered affirmatively
    pub fn confirm(self) -> ConfirmedDelete {
        ConfirmedDelete {
            id: self.id,
            title: self.title,
        }
    }
}

/// Proof that the user confirmed deleting a record
#[derive(Debug)]
pub struct ConfirmedDelete {
    id: RecordId,
    title: String,
}

impl ConfirmedDelete {
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

/// Catalog of stored conversations
#[derive(Debug, Clone)]
pub struct SessionRepository {
    store: RecordStore,
    system_prompt: String,
}

impl SessionRepository {
    /// Create a repository; `system_prompt` seeds every new conversation
    pub fn new(store: RecordStore, system_prompt: impl Into<String>) -> Self {
        Self {
            store,
            system_prompt: system_prompt.into(),
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Summaries of every readable record, most recently modified first.
    ///
    /// Records that fail to read are left out of the listing.
    pub fn summaries(&self) -> Vec<CatalogSummary> {
        let ids = match self.store.list_identities() {
            Ok(ids) => ids,
            Err(e) => {
                warn!("Cannot list {}: {}", self.store.dir().display(), e);
                return Vec::new();
            }
        };

        ids.into_iter()
            .filter_map(|id| match self.store.read(&id) {
                Ok(record) => Some(CatalogSummary {
                    title: lookup_title(&record),
                    date: id.date(),
                    time: id.time(),
                    turn_count: record.len(),
                    id,
                }),
                Err(e) => {
                    warn!("Leaving {} out of the listing: {}", id, e);
                    None
                }
            })
            .collect()
    }

    /// Load a stored conversation
    pub fn load(&self, id: &RecordId) -> Result<Conversation> {
        let record = self.store.read(id)?;
        info!("Loaded conversation {} ({} turns)", id, record.len());
        Ok(Conversation { id: *id, record })
    }

    /// Look up the title of a record the user is about to delete
    pub fn prepare_delete(&self, id: &RecordId) -> Result<PendingDelete> {
        let record = self.store.read(id)?;
        Ok(PendingDelete {
            id: *id,
            title: lookup_title(&record),
        })
    }

    /// Delete a confirmed record and its audit log
    pub fn delete(&self, confirmed: ConfirmedDelete) -> Result<DeleteReport> {
        let report = self.store.delete(&confirmed.id)?;
        info!("Deleted conversation {} '{}'", confirmed.id, confirmed.title);
        Ok(report)
    }

    /// A fresh conversation holding only the system prompt.
    ///
    /// Nothing is written until the session persists it. If a record already
    /// exists for the current second, the next free second is used.
    pub fn create_new(&self) -> Conversation {
        let mut id = RecordId::now();
        while self.store.exists(&id) {
            id = id.next();
        }
        debug!("Created conversation {}", id);
        Conversation {
            id,
            record: ConversationRecord::new(self.system_prompt.clone()),
        }
    }
}
