//! On-demand view of a partition's operation log

use engine_client::{EngineApi, JournalEntry};

use crate::error::{ClientError, ClientResult, ValidationError};
use crate::listing::{Applied, Listing, ListingView};

/// A journal fetch for one partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalTicket {
    pub generation: u64,
    pub partition_id: String,
}

/// A journal ticket together with its response
#[derive(Debug, Clone)]
pub struct JournalOutcome {
    pub ticket: JournalTicket,
    pub result: ClientResult<Vec<JournalEntry>>,
}

impl JournalTicket {
    pub async fn fetch(self, api: &dyn EngineApi) -> JournalOutcome {
        let result = api
            .list_journal(&self.partition_id)
            .await
            .map_err(ClientError::from);
        JournalOutcome {
            ticket: self,
            result,
        }
    }
}

/// Journal query state
///
/// Results are only shown after a fetch succeeds; a failed fetch hides them
/// again until the next success.
#[derive(Debug, Clone, Default)]
pub struct JournalInspector {
    partition_id: Option<String>,
    /// Partition the current entries were fetched for
    shown: Option<String>,
    entries: Listing<JournalEntry>,
    visible: bool,
}

impl JournalInspector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Partition the next query will target
    pub fn partition_id(&self) -> Option<&str> {
        self.partition_id.as_deref()
    }

    /// Partition whose entries or failure are on display
    pub fn shown_partition_id(&self) -> Option<&str> {
        self.shown.as_deref()
    }

    /// Retarget future queries; `None` or a blank id clears the target
    pub fn retarget(&mut self, id: Option<&str>) {
        match id {
            Some(id) => self.set_partition_id(id),
            None => self.partition_id = None,
        }
    }

    pub fn set_partition_id(&mut self, id: impl Into<String>) {
        let id = id.into();
        let id = id.trim();
        self.partition_id = (!id.is_empty()).then(|| id.to_string());
    }

    /// Use `id` as the default target unless one is already set
    pub fn seed(&mut self, id: &str) {
        if self.partition_id.is_none() {
            self.set_partition_id(id);
        }
    }

    /// Start a query, for `id` if given, otherwise for the current target
    pub fn request(&mut self, id: Option<&str>) -> ClientResult<JournalTicket> {
        if let Some(id) = id {
            self.set_partition_id(id);
        }
        let partition_id = self
            .partition_id
            .clone()
            .ok_or(ValidationError::MissingPartitionId)?;

        tracing::debug!(partition = %partition_id, "requesting journal");
        self.visible = false;
        Ok(JournalTicket {
            generation: self.entries.begin(),
            partition_id,
        })
    }

    pub fn apply(&mut self, outcome: JournalOutcome) -> Applied {
        let applied = self.entries.finish(outcome.ticket.generation, outcome.result);
        if applied != Applied::Stale {
            self.shown = Some(outcome.ticket.partition_id.clone());
        }
        match applied {
            Applied::Updated => self.visible = true,
            Applied::Failed => {
                self.visible = false;
                if let Some(err) = self.entries.error() {
                    tracing::warn!(partition = %outcome.ticket.partition_id, error = %err, "journal fetch failed");
                }
            }
            Applied::Stale => {
                tracing::debug!(partition = %outcome.ticket.partition_id, "discarding stale journal response");
            }
        }
        applied
    }

    /// Whether results of a successful fetch are on display
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn entries(&self) -> &Listing<JournalEntry> {
        &self.entries
    }

    pub fn view(&self) -> ListingView<'_, JournalEntry> {
        self.entries.view()
    }

    /// Forget the target and any results
    pub fn reset(&mut self) {
        self.partition_id = None;
        self.shown = None;
        self.entries.reset();
        self.visible = false;
    }
}
