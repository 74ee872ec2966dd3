//! Per-client state and the dispatch of remote calls
//!
//! A [`Workbench`] owns everything a client holds: session, console,
//! navigation and journal. Actions validate locally, then spawn the remote
//! call on the runtime and return immediately. Each finished call comes back
//! through the event channel and is folded in with [`Workbench::apply`], so
//! all state is mutated from a single place.

use std::sync::Arc;

use engine_client::{Disk, EngineApi, Partition};
use tokio::sync::mpsc;

use crate::console::{CommandConsole, ExecuteOutcome, ExecuteTicket};
use crate::error::{ClientError, ClientResult, ValidationError};
use crate::gate::CommandGate;
use crate::journal::{JournalInspector, JournalOutcome, JournalTicket};
use crate::listing::Applied;
use crate::navigation::{FetchOutcome, Fetched, Navigator, Ticket};
use crate::session::{Session, SessionStore};

/// Completion of a spawned remote call
#[derive(Debug, Clone)]
pub enum Event {
    Navigation(FetchOutcome),
    Journal(JournalOutcome),
    Executed(ExecuteOutcome),
    Authenticated(LoginOutcome),
}

/// Credentials captured when authentication was requested
#[derive(Clone, PartialEq, Eq)]
pub struct LoginTicket {
    pub generation: u64,
    pub user: String,
    pass: String,
    pub partition_id: String,
}

/// Engine answer to a [`LoginTicket`]
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub generation: u64,
    pub user: String,
    pub partition_id: String,
    pub result: ClientResult<String>,
}

impl std::fmt::Debug for LoginTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginTicket")
            .field("generation", &self.generation)
            .field("user", &self.user)
            .field("pass", &"***")
            .field("partition_id", &self.partition_id)
            .finish()
    }
}

impl LoginTicket {
    /// Validate the login form; every field is required
    pub fn new(generation: u64, user: &str, pass: &str, partition_id: &str) -> ClientResult<Self> {
        let (user, partition_id) = (user.trim(), partition_id.trim());
        if user.is_empty() || pass.is_empty() || partition_id.is_empty() {
            return Err(ValidationError::MissingCredentials.into());
        }

        Ok(Self {
            generation,
            user: user.to_string(),
            pass: pass.to_string(),
            partition_id: partition_id.to_string(),
        })
    }

    pub async fn fetch(self, api: &dyn EngineApi) -> LoginOutcome {
        let result = api
            .authenticate(&self.user, &self.pass, &self.partition_id)
            .await
            .map_err(ClientError::from);
        LoginOutcome {
            generation: self.generation,
            user: self.user,
            partition_id: self.partition_id,
            result,
        }
    }
}

/// Which listing a navigation or journal event touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Disks,
    Partitions,
    Directory,
    Journal,
}

/// What changed after applying an [`Event`]
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    Listing(Resource, Applied),
    Executed {
        commands: usize,
        result: ClientResult<String>,
    },
    Login {
        user: String,
        result: ClientResult<String>,
    },
    /// A login answer that arrived after a later login or logout
    Superseded,
}

impl Update {
    /// Whether the event was dropped because a newer request superseded it
    pub fn is_stale(&self) -> bool {
        matches!(self, Update::Listing(_, Applied::Stale) | Update::Superseded)
    }
}

/// All state of one client
pub struct Workbench {
    api: Arc<dyn EngineApi>,
    events: mpsc::UnboundedSender<Event>,
    sessions: SessionStore,
    console: CommandConsole,
    navigator: Navigator,
    journal: JournalInspector,
    /// Bumped by every login request and logout
    login_generation: u64,
    /// Partition named at the last successful login
    login_partition: Option<String>,
    in_flight: usize,
}

impl Workbench {
    /// Create a workbench and the receiving end of its event channel
    pub fn new(api: Arc<dyn EngineApi>) -> (Self, mpsc::UnboundedReceiver<Event>) {
        Self::with_gate(api, CommandGate::new())
    }

    pub fn with_gate(
        api: Arc<dyn EngineApi>,
        gate: CommandGate,
    ) -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let workbench = Self {
            api,
            events,
            sessions: SessionStore::new(),
            console: CommandConsole::new(gate),
            navigator: Navigator::new(),
            journal: JournalInspector::new(),
            login_generation: 0,
            login_partition: None,
            in_flight: 0,
        };
        (workbench, receiver)
    }

    pub fn session(&self) -> &Session {
        self.sessions.session()
    }

    pub fn console(&self) -> &CommandConsole {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut CommandConsole {
        &mut self.console
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn journal(&self) -> &JournalInspector {
        &self.journal
    }

    /// Remote calls spawned but not yet applied
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    // ------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------

    /// Ask the engine to authenticate; the session changes when the answer
    /// is applied
    pub fn login(&mut self, user: &str, pass: &str, partition_id: &str) -> ClientResult<()> {
        let ticket = LoginTicket::new(self.login_generation + 1, user, pass, partition_id)?;
        self.login_generation = ticket.generation;
        tracing::debug!(user = %ticket.user, partition = %ticket.partition_id, "authenticating");

        let api = self.api.clone();
        self.spawn(async move { Event::Authenticated(ticket.fetch(api.as_ref()).await) });
        Ok(())
    }

    /// End the session and drop everything that was browsed under it
    pub fn logout(&mut self) {
        self.login_generation += 1;
        self.login_partition = None;
        self.sessions.logout();
        self.navigator.reset();
        self.journal.reset();
    }

    // ------------------------------------------------------------------
    // Console
    // ------------------------------------------------------------------

    /// Gate and submit `text` as one batch
    pub fn execute(&mut self, text: &str) -> ClientResult<usize> {
        let ticket = self.console.submit(text, self.sessions.session())?;
        Ok(self.spawn_execute(ticket))
    }

    /// Gate and submit the console's input buffer
    pub fn execute_input(&mut self) -> ClientResult<usize> {
        let ticket = self.console.submit_input(self.sessions.session())?;
        Ok(self.spawn_execute(ticket))
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn refresh_disks(&mut self) {
        let ticket = self.navigator.refresh_disks();
        self.spawn_fetch(ticket);
    }

    pub fn select_disk(&mut self, disk: Disk) {
        let ticket = self.navigator.select_disk(disk);
        self.retarget_journal();
        self.spawn_fetch(ticket);
    }

    /// Select a disk of the current list by name, path or index
    pub fn select_disk_by_key(&mut self, key: &str) -> ClientResult<Disk> {
        let disk = self.navigator.find_disk(key)?;
        self.select_disk(disk.clone());
        Ok(disk)
    }

    pub fn select_partition(&mut self, partition: Partition) -> ClientResult<()> {
        let id = partition.id.clone();
        let ticket = self.navigator.select_partition(partition)?;
        self.journal.set_partition_id(id);
        self.spawn_fetch(ticket);
        Ok(())
    }

    /// Select a partition of the current list by id, name or index
    pub fn select_partition_by_key(&mut self, key: &str) -> ClientResult<Partition> {
        let partition = self.navigator.find_partition(key)?;
        self.select_partition(partition.clone())?;
        Ok(partition)
    }

    pub fn enter_folder(&mut self, name: &str) -> ClientResult<()> {
        let ticket = self.navigator.enter_folder(name)?;
        self.spawn_fetch(ticket);
        Ok(())
    }

    /// Returns false when already at the root
    pub fn go_back(&mut self) -> bool {
        match self.navigator.go_back() {
            Some(ticket) => {
                self.spawn_fetch(ticket);
                true
            }
            None => false,
        }
    }

    pub fn back_to_disks(&mut self) {
        self.navigator.back_to_disks();
        self.retarget_journal();
    }

    /// Re-fetch whatever is currently displayed
    pub fn refresh(&mut self) {
        let ticket = self.navigator.refresh();
        self.spawn_fetch(ticket);
    }

    // ------------------------------------------------------------------
    // Journal
    // ------------------------------------------------------------------

    pub fn show_journal(&mut self, partition_id: Option<&str>) -> ClientResult<()> {
        let ticket = self.journal.request(partition_id)?;
        self.spawn_journal(ticket);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Fold a finished remote call into state
    pub fn apply(&mut self, event: Event) -> Update {
        self.in_flight = self.in_flight.saturating_sub(1);

        match event {
            Event::Navigation(outcome) => {
                let resource = match outcome.fetched {
                    Fetched::Disks(_) => Resource::Disks,
                    Fetched::Partitions(_) => Resource::Partitions,
                    Fetched::Directory(_) => Resource::Directory,
                };
                let applied = self.navigator.apply(outcome);
                if applied == Applied::Failed {
                    tracing::warn!(?resource, "listing fetch failed");
                }
                Update::Listing(resource, applied)
            }
            Event::Journal(outcome) => Update::Listing(Resource::Journal, self.journal.apply(outcome)),
            Event::Executed(outcome) => {
                self.console.finish(&outcome);
                Update::Executed {
                    commands: outcome.commands,
                    result: outcome.result,
                }
            }
            Event::Authenticated(outcome) => {
                if outcome.generation != self.login_generation {
                    tracing::debug!(user = %outcome.user, "discarding superseded login response");
                    return Update::Superseded;
                }
                match &outcome.result {
                    Ok(_) => {
                        self.sessions.login(outcome.user.clone());
                        self.login_partition = Some(outcome.partition_id.clone());
                        self.journal.seed(&outcome.partition_id);
                    }
                    Err(err) => {
                        tracing::warn!(user = %outcome.user, error = %err, "authentication failed");
                    }
                }
                Update::Login {
                    user: outcome.user,
                    result: outcome.result,
                }
            }
        }
    }

    /// Apply events until no remote call is outstanding
    ///
    /// Used by one-shot commands and tests; the interactive loop applies
    /// events as they arrive instead.
    pub async fn settle(&mut self, events: &mut mpsc::UnboundedReceiver<Event>) -> Vec<Update> {
        let mut updates = Vec::new();
        while self.in_flight > 0 {
            match events.recv().await {
                Some(event) => updates.push(self.apply(event)),
                None => break,
            }
        }
        updates
    }

    /// With no partition selected the journal falls back to the login partition
    fn retarget_journal(&mut self) {
        self.journal.retarget(self.login_partition.as_deref());
    }

    fn spawn_fetch(&mut self, ticket: Ticket) {
        let api = self.api.clone();
        self.spawn(async move { Event::Navigation(ticket.fetch(api.as_ref()).await) });
    }

    fn spawn_journal(&mut self, ticket: JournalTicket) {
        let api = self.api.clone();
        self.spawn(async move { Event::Journal(ticket.fetch(api.as_ref()).await) });
    }

    fn spawn_execute(&mut self, ticket: ExecuteTicket) -> usize {
        let commands = ticket.batch.len();
        let api = self.api.clone();
        self.spawn(async move { Event::Executed(ticket.fetch(api.as_ref()).await) });
        commands
    }

    fn spawn<F>(&mut self, call: F)
    where
        F: std::future::Future<Output = Event> + Send + 'static,
    {
        self.in_flight += 1;
        let events = self.events.clone();
        tokio::spawn(async move {
            let event = call.await;
            // The receiver is gone only when the client is shutting down
            let _ = events.send(event);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::NavState;
    use crate::testing::{disk, Call, FakeEngine};
    use engine_client::EngineError;
    use std::time::Duration;

    fn workbench(engine: FakeEngine) -> (Workbench, mpsc::UnboundedReceiver<Event>, Arc<FakeEngine>) {
        let engine = Arc::new(engine);
        let (workbench, events) = Workbench::new(engine.clone());
        (workbench, events, engine)
    }

    async fn logged_in(engine: FakeEngine) -> (Workbench, mpsc::UnboundedReceiver<Event>, Arc<FakeEngine>) {
        let (mut wb, mut events, engine) = workbench(engine);
        wb.login("root", "123", "671A").unwrap();
        wb.settle(&mut events).await;
        wb.refresh_disks();
        wb.settle(&mut events).await;
        (wb, events, engine)
    }

    #[tokio::test]
    async fn test_allow_listed_batch_is_sent_once_without_session() {
        let (mut wb, mut events, engine) = workbench(FakeEngine::default());
        let text = "mkdisk -size=5 -unit=M -path=/tmp/test\nlogin -user=root -pass=123 -id=671A";

        assert_eq!(wb.execute(text).unwrap(), 2);
        let updates = wb.settle(&mut events).await;

        assert_eq!(engine.calls(), vec![Call::Execute(text.to_string())]);
        assert_eq!(
            updates,
            vec![Update::Executed {
                commands: 2,
                result: Ok("2 line(s) processed".to_string())
            }]
        );
        assert!(!wb.session().is_authenticated);
    }

    #[tokio::test]
    async fn test_rejected_batch_sends_nothing() {
        let (mut wb, _events, engine) = workbench(FakeEngine::default());

        let err = wb.execute("mkdisk -size=5 -path=/tmp/a.mia\nrmdir -path=/docs").unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("mkdisk, rmdisk, fdisk, mount, unmount, mkfs"));
        assert_eq!(wb.in_flight(), 0);
        assert!(engine.calls().is_empty());
    }

    #[tokio::test]
    async fn test_session_allows_any_batch() {
        let (mut wb, mut events, engine) = logged_in(FakeEngine::with_sample_tree()).await;

        wb.execute("mkdir -path=/docs/new").unwrap();
        wb.settle(&mut events).await;
        assert!(engine.calls().contains(&Call::Execute("mkdir -path=/docs/new".into())));
    }

    #[tokio::test]
    async fn test_login_requires_all_fields() {
        let (mut wb, _events, engine) = workbench(FakeEngine::default());

        for (user, pass, id) in [("", "123", "671A"), ("root", "", "671A"), ("root", "123", " ")] {
            let err = wb.login(user, pass, id).unwrap_err();
            assert_eq!(err, ClientError::Validation(ValidationError::MissingCredentials));
        }
        assert!(engine.calls().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_credentials_leave_session_unchanged() {
        let (mut wb, mut events, _engine) = workbench(FakeEngine::default());

        wb.login("root", "wrong", "671A").unwrap();
        let updates = wb.settle(&mut events).await;

        assert_eq!(
            updates,
            vec![Update::Login {
                user: "root".into(),
                result: Err(ClientError::Authentication("Error: contraseña incorrecta".into())),
            }]
        );
        assert!(!wb.session().is_authenticated);
        assert_eq!(wb.journal().partition_id(), None);
    }

    #[tokio::test]
    async fn test_login_seeds_journal() {
        let (mut wb, mut events, engine) = workbench(FakeEngine::with_sample_tree());
        wb.login(" root ", "123", "671A").unwrap();
        let updates = wb.settle(&mut events).await;

        assert_eq!(
            updates,
            vec![Update::Login {
                user: "root".into(),
                result: Ok("Sesión iniciada: root".into()),
            }]
        );
        assert_eq!(wb.session().username, "root");
        assert_eq!(wb.journal().partition_id(), Some("671A"));
        assert_eq!(
            engine.calls(),
            vec![Call::Authenticate {
                user: "root".into(),
                partition_id: "671A".into()
            }]
        );
    }

    #[tokio::test]
    async fn test_logout_clears_navigation() {
        let (mut wb, mut events, _engine) = logged_in(FakeEngine::with_sample_tree()).await;
        wb.select_disk_by_key("a.mia").unwrap();
        wb.settle(&mut events).await;
        wb.select_partition_by_key("671A").unwrap();
        wb.settle(&mut events).await;
        assert_eq!(wb.navigator().state(), NavState::PartitionSelected);

        wb.logout();

        assert!(!wb.session().is_authenticated);
        assert!(wb.navigator().selected_disk().is_none());
        assert!(wb.navigator().selected_partition().is_none());
        assert_eq!(wb.navigator().current_path(), "/");
        assert_eq!(wb.journal().partition_id(), None);
    }

    #[tokio::test]
    async fn test_slow_response_for_previous_disk_is_discarded() {
        let mut engine = FakeEngine::with_sample_tree();
        engine.delays.insert("/tmp/a.mia".into(), Duration::from_millis(50));
        let (mut wb, mut events, _engine) = logged_in(engine).await;

        wb.select_disk_by_key("a.mia").unwrap();
        wb.select_disk_by_key("b.mia").unwrap();
        let updates = wb.settle(&mut events).await;

        assert_eq!(
            updates,
            vec![
                Update::Listing(Resource::Partitions, Applied::Updated),
                Update::Listing(Resource::Partitions, Applied::Stale),
            ]
        );
        assert_eq!(wb.navigator().selected_disk().unwrap().name, "b.mia");
        assert!(wb.navigator().partitions().items().is_empty());
    }

    #[tokio::test]
    async fn test_browse_folder_and_back() {
        let (mut wb, mut events, engine) = logged_in(FakeEngine::with_sample_tree()).await;
        wb.select_disk(disk("a.mia", &["671A"]));
        wb.settle(&mut events).await;
        wb.select_partition_by_key("1").unwrap();
        wb.settle(&mut events).await;

        wb.enter_folder("docs").unwrap();
        wb.settle(&mut events).await;
        assert_eq!(wb.navigator().current_path(), "/docs");
        assert_eq!(wb.navigator().entries().items()[0].name, "notes.txt");

        assert!(wb.go_back());
        wb.settle(&mut events).await;
        assert!(!wb.go_back());
        assert_eq!(wb.navigator().current_path(), "/");
        assert_eq!(wb.navigator().entries().items().len(), 2);

        let directory_calls = engine
            .calls()
            .into_iter()
            .filter(|call| matches!(call, Call::Directory { .. }))
            .count();
        assert_eq!(directory_calls, 3);
    }

    #[tokio::test]
    async fn test_unknown_folder_is_not_fetched() {
        let (mut wb, mut events, engine) = logged_in(FakeEngine::with_sample_tree()).await;
        wb.select_disk_by_key("a.mia").unwrap();
        wb.settle(&mut events).await;
        wb.select_partition_by_key("671A").unwrap();
        wb.settle(&mut events).await;
        let before = engine.calls().len();

        let err = wb.enter_folder("users.txt").unwrap_err();
        assert_eq!(
            err,
            ClientError::Validation(ValidationError::UnknownFolder("users.txt".into()))
        );
        assert_eq!(engine.calls().len(), before);
    }

    #[tokio::test]
    async fn test_protocol_error_keeps_disk_list_empty() {
        let mut engine = FakeEngine::with_sample_tree();
        engine.disks_error = Some(EngineError::InvalidResponse("'disks' is not an array".into()));
        let (wb, _events, _engine) = logged_in(engine).await;

        let err = wb.navigator().disks().error().unwrap();
        assert!(err.is_protocol());
        assert!(err.to_string().starts_with("invalid server response"));
        assert!(wb.navigator().disks().items().is_empty());
    }

    #[tokio::test]
    async fn test_journal_follows_selected_partition() {
        let (mut wb, mut events, engine) = logged_in(FakeEngine::with_sample_tree()).await;

        wb.show_journal(None).unwrap();
        wb.settle(&mut events).await;
        assert!(wb.journal().is_visible());
        assert_eq!(engine.calls().last(), Some(&Call::Journal("671A".into())));

        wb.show_journal(Some("999Z")).unwrap();
        let updates = wb.settle(&mut events).await;
        assert_eq!(updates, vec![Update::Listing(Resource::Journal, Applied::Failed)]);
        assert!(!wb.journal().is_visible());
    }

    #[tokio::test]
    async fn test_select_partition_without_disk() {
        let (mut wb, _events, _engine) = workbench(FakeEngine::with_sample_tree());
        let err = wb
            .select_partition(crate::testing::partition("671A", "a.mia"))
            .unwrap_err();
        assert_eq!(err, ClientError::Validation(ValidationError::NoDiskSelected));
        assert_eq!(wb.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_login_answer_after_logout_is_discarded() {
        let (mut wb, mut events, _engine) = workbench(FakeEngine::with_sample_tree());

        wb.login("root", "123", "671A").unwrap();
        wb.logout();
        let updates = wb.settle(&mut events).await;

        assert_eq!(updates, vec![Update::Superseded]);
        assert!(updates[0].is_stale());
        assert!(!wb.session().is_authenticated);
        assert_eq!(wb.journal().partition_id(), None);
    }

    #[tokio::test]
    async fn test_only_latest_login_is_applied() {
        let (mut wb, mut events, _engine) = workbench(FakeEngine::with_sample_tree());

        wb.login("alice", "123", "671A").unwrap();
        wb.login("root", "123", "671A").unwrap();
        wb.settle(&mut events).await;

        assert_eq!(wb.session().username, "root");
    }

    #[tokio::test]
    async fn test_journal_heading_names_fetched_partition() {
        let mut engine = FakeEngine::with_sample_tree();
        engine.partitions.insert(
            "/tmp/a.mia".into(),
            vec![
                crate::testing::partition("671A", "a.mia"),
                crate::testing::partition("672B", "a.mia"),
            ],
        );
        let (mut wb, mut events, _engine) = logged_in(engine).await;
        wb.select_disk_by_key("a.mia").unwrap();
        wb.settle(&mut events).await;

        wb.show_journal(Some("671A")).unwrap();
        wb.select_partition_by_key("672B").unwrap();
        let updates = wb.settle(&mut events).await;

        let journal_update = updates
            .iter()
            .find(|update| matches!(update, Update::Listing(Resource::Journal, _)))
            .unwrap();
        let shown = crate::render::update(journal_update, &wb);
        assert_eq!(
            shown[0],
            crate::output::OutputEvent::Heading("Journal of 671A".into())
        );
        assert_eq!(wb.journal().partition_id(), Some("672B"));
    }

    #[tokio::test]
    async fn test_back_to_disks_falls_back_to_login_partition() {
        let mut engine = FakeEngine::with_sample_tree();
        engine
            .partitions
            .insert("/tmp/b.mia".into(), vec![crate::testing::partition("672B", "b.mia")]);
        let (mut wb, mut events, engine) = logged_in(engine).await;
        wb.select_disk_by_key("b.mia").unwrap();
        wb.settle(&mut events).await;
        wb.select_partition_by_key("672B").unwrap();
        wb.settle(&mut events).await;
        assert_eq!(wb.journal().partition_id(), Some("672B"));

        wb.back_to_disks();
        assert_eq!(wb.journal().partition_id(), Some("671A"));

        wb.show_journal(None).unwrap();
        wb.settle(&mut events).await;
        assert_eq!(engine.calls().last(), Some(&Call::Journal("671A".into())));

        wb.logout();
        wb.back_to_disks();
        assert_eq!(wb.journal().partition_id(), None);
    }
}
