//! Interactive catalog: pick, create or delete a conversation

use statefulchat_core::session::{CatalogSummary, Conversation, SessionRepository};
use tracing::{debug, warn};

use crate::commands::{is_affirmative, DeleteChoice, MenuChoice};
use crate::ui::{ChatDisplay, ListingPurpose, Notice, Prompt, Prompter};

/// A conversation handed from the catalog to a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selected {
    pub conversation: Conversation,
    /// Loaded from storage rather than newly created
    pub resumed: bool,
}

/// States of the catalog flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionState {
    Listing,
    ConfirmingDelete,
    /// Terminal: a session should start with this conversation
    LoadedOrNew(Selected),
    /// Terminal: the user asked to leave
    Exiting,
}

/// Result of running the catalog to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    Open(Selected),
    Exit,
}

/// Drives the catalog states against a repository, a display and an input source
pub struct SelectionMachine<'a> {
    repo: &'a SessionRepository,
    display: &'a dyn ChatDisplay,
}

impl<'a> SelectionMachine<'a> {
    pub fn new(repo: &'a SessionRepository, display: &'a dyn ChatDisplay) -> Self {
        Self { repo, display }
    }

    /// `Listing`, or straight to a new conversation when there is nothing to browse
    pub fn initial_state(&self) -> SelectionState {
        if self.repo.summaries().is_empty() {
            SelectionState::LoadedOrNew(self.start_new())
        } else {
            SelectionState::Listing
        }
    }

    /// Run until a terminal state is reached
    pub fn run(&self, prompter: &mut dyn Prompter) -> SelectionOutcome {
        let mut state = self.initial_state();
        loop {
            state = match state {
                SelectionState::LoadedOrNew(selected) => return SelectionOutcome::Open(selected),
                SelectionState::Exiting => return SelectionOutcome::Exit,
                other => self.step(other, prompter),
            };
        }
    }

    /// Advance one state
    pub fn step(&self, state: SelectionState, prompter: &mut dyn Prompter) -> SelectionState {
        debug!("Catalog state: {:?}", state);
        match state {
            SelectionState::Listing => self.listing(prompter),
            SelectionState::ConfirmingDelete => self.confirming_delete(prompter),
            terminal => terminal,
        }
    }

    fn listing(&self, prompter: &mut dyn Prompter) -> SelectionState {
        let summaries = self.repo.summaries();
        if summaries.is_empty() {
            return SelectionState::LoadedOrNew(self.start_new());
        }
        self.display.render_listing(&summaries, ListingPurpose::Browse);

        loop {
            let prompt = Prompt::MenuChoice {
                count: summaries.len(),
            };
            let Some(input) = self.read(prompter, prompt) else {
                return SelectionState::Exiting;
            };

            match MenuChoice::parse(&input, summaries.len()) {
                Ok(MenuChoice::Exit) => return SelectionState::Exiting,
                Ok(MenuChoice::New) => return SelectionState::LoadedOrNew(self.start_new()),
                Ok(MenuChoice::Delete) => return SelectionState::ConfirmingDelete,
                Ok(MenuChoice::Open(index)) => return self.open(&summaries[index]),
                Err(e) => self.display.render_error(&e.to_string()),
            }
        }
    }

    fn open(&self, summary: &CatalogSummary) -> SelectionState {
        match self.repo.load(&summary.id) {
            Ok(conversation) => {
                self.display
                    .render_notice(Notice::ConversationLoaded(conversation.id));
                SelectionState::LoadedOrNew(Selected {
                    conversation,
                    resumed: true,
                })
            }
            Err(e) => {
                warn!("Cannot open {}: {}", summary.id, e);
                self.display.render_error(&e.to_string());
                SelectionState::Listing
            }
        }
    }

    fn confirming_delete(&self, prompter: &mut dyn Prompter) -> SelectionState {
        let summaries = self.repo.summaries();
        if summaries.is_empty() {
            self.display.render_error("There are no conversations to delete.");
            return SelectionState::Listing;
        }
        self.display.render_listing(&summaries, ListingPurpose::Delete);

        let prompt = Prompt::DeleteChoice {
            count: summaries.len(),
        };
        let Some(input) = self.read(prompter, prompt) else {
            return SelectionState::Listing;
        };

        let index = match DeleteChoice::parse(&input, summaries.len()) {
            Ok(DeleteChoice::Cancel) => return SelectionState::Listing,
            Ok(DeleteChoice::Target(index)) => index,
            Err(e) => {
                self.display.render_error(&e.to_string());
                return SelectionState::Listing;
            }
        };

        let pending = match self.repo.prepare_delete(&summaries[index].id) {
            Ok(pending) => pending,
            Err(e) => {
                self.display.render_error(&e.to_string());
                return SelectionState::Listing;
            }
        };

        let prompt = Prompt::ConfirmDelete {
            title: pending.title().to_string(),
        };
        let confirmed = self
            .read(prompter, prompt)
            .is_some_and(|answer| is_affirmative(&answer));
        if !confirmed {
            self.display.render_notice(Notice::DeleteCancelled);
            return SelectionState::Listing;
        }

        let title = pending.title().to_string();
        match self.repo.delete(pending.confirm()) {
            Ok(_) => self.display.render_notice(Notice::Deleted { title }),
            Err(e) => self.display.render_error(&e.to_string()),
        }
        SelectionState::Listing
    }

    fn start_new(&self) -> Selected {
        let conversation = self.repo.create_new();
        self.display
            .render_notice(Notice::NewConversation(conversation.id));
        Selected {
            conversation,
            resumed: false,
        }
    }

    /// Read one line; a broken input source counts as exhausted
    fn read(&self, prompter: &mut dyn Prompter, prompt: Prompt) -> Option<String> {
        match prompter.read_line(prompt) {
            Ok(line) => line,
            Err(e) => {
                warn!("Reading input failed: {}", e);
                self.display.render_error(&format!("Cannot read input: {}", e));
                None
            }
        }
    }
}
