//! Live conversation: the turn loop with its persist and audit discipline

use statefulchat_core::session::{
    derive_title, Conversation, ConversationRecord, RecordId, RecordStore,
};
use statefulchat_core::Error;
use statefulchat_providers::{LLMProvider, Message};
use tracing::{info, warn};

use crate::commands::SessionInput;
use crate::selection::Selected;
use crate::ui::{ChatDisplay, Notice, Prompt, Prompter};

/// Request parameters passed to the provider on every turn
#[derive(Debug, Clone)]
pub struct ModelSettings {
    /// `None` uses the provider's default model
    pub model: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            model: None,
            max_tokens: 1024,
            temperature: 0.7,
        }
    }
}

/// Whether the loop keeps going after an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Continue,
    Exit,
}

/// How a session run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user typed the exit command
    ExitCommand,
    /// Input is exhausted or broken
    InputClosed,
}

/// Holds the live record and exchanges turns with the model
pub struct ConversationSession<'a> {
    conversation: Conversation,
    resumed: bool,
    store: &'a RecordStore,
    provider: &'a dyn LLMProvider,
    display: &'a dyn ChatDisplay,
    settings: ModelSettings,
}

impl<'a> ConversationSession<'a> {
    pub fn new(
        selected: Selected,
        store: &'a RecordStore,
        provider: &'a dyn LLMProvider,
        display: &'a dyn ChatDisplay,
        settings: ModelSettings,
    ) -> Self {
        Self {
            conversation: selected.conversation,
            resumed: selected.resumed,
            store,
            provider,
            display,
            settings,
        }
    }

    pub fn id(&self) -> &RecordId {
        &self.conversation.id
    }

    pub fn record(&self) -> &ConversationRecord {
        &self.conversation.record
    }

    /// Run the loop until the exit command or the end of input
    pub async fn run(&mut self, prompter: &mut dyn Prompter) -> SessionEnd {
        self.begin();
        loop {
            let input = match prompter.read_line(Prompt::UserTurn) {
                Ok(Some(input)) => input,
                Ok(None) => {
                    self.finish("=== conversation ended: input closed ===");
                    return SessionEnd::InputClosed;
                }
                Err(e) => {
                    self.display
                        .render_error(&format!("Cannot read input: {}", e));
                    self.finish("=== conversation ended: input error ===");
                    return SessionEnd::InputClosed;
                }
            };

            if self.handle_input(&input).await == TurnOutcome::Exit {
                return SessionEnd::ExitCommand;
            }
        }
    }

    /// Mark the start of the session in the audit log and show the available commands
    pub fn begin(&self) {
        if self.resumed {
            self.audit("=== conversation resumed ===");
        } else {
            self.audit("=== conversation started ===");
            if let Some(system) = self.record().turns().first() {
                self.audit(&format!("system: {}", system.content()));
            }
        }
        info!(
            "Session {} {}",
            self.id(),
            if self.resumed { "resumed" } else { "started" }
        );
        self.display.render_notice(Notice::SessionHelp);
    }

    /// Handle one line of user input
    pub async fn handle_input(&mut self, input: &str) -> TurnOutcome {
        match SessionInput::parse(input) {
            SessionInput::Exit => {
                self.finish("=== conversation ended by exit command ===");
                TurnOutcome::Exit
            }
            SessionInput::ShowHistory => {
                self.audit("[command] history requested");
                self.display.render_history(self.record().turns());
                TurnOutcome::Continue
            }
            SessionInput::Message(text) if text.trim().is_empty() => TurnOutcome::Continue,
            SessionInput::Message(text) => {
                self.exchange(text).await;
                TurnOutcome::Continue
            }
        }
    }

    /// Append the user turn, persist it, then ask the model
    async fn exchange(&mut self, text: String) {
        let record = &mut self.conversation.record;
        record.push_user(text.clone());
        if record.user_turn_count() == 1 {
            let title = derive_title(record);
            record.set_title(title);
        }
        if let Some(turn) = self.record().turns().last() {
            self.display.render_turn(turn);
        }

        self.persist();
        self.audit(&format!("user: {}", text));

        let messages: Vec<Message> = self.record().turns().iter().map(Message::from).collect();
        self.display.begin_wait();
        let result = self
            .provider
            .chat(
                messages,
                self.settings.model.clone(),
                self.settings.max_tokens,
                self.settings.temperature,
            )
            .await;
        self.display.end_wait();

        let reply = result
            .map_err(|e| Error::ModelCallFailed(e.to_string()))
            .and_then(|response| {
                response
                    .reply_text()
                    .map(str::to_string)
                    .ok_or_else(|| Error::ModelCallFailed("empty reply".to_string()))
            });

        match reply {
            Ok(reply) => {
                self.conversation.record.push_assistant(reply.clone());
                if let Some(turn) = self.record().turns().last() {
                    self.display.render_turn(turn);
                }
                self.persist();
                self.audit(&format!("assistant: {}", reply));
            }
            Err(e) => {
                warn!("Turn in {} got no reply: {}", self.id(), e);
                self.audit(&format!("error: {}", e));
                self.display.render_error(&e.to_string());
            }
        }
    }

    /// Write the record and return to the catalog
    fn finish(&self, audit_line: &str) {
        self.audit(audit_line);
        self.persist();
        info!("Session {} closed", self.id());
    }

    /// Write the record; a failure is shown but does not end the session
    fn persist(&self) {
        if let Err(e) = self.store.write(self.id(), self.record()) {
            self.display.render_error(&e.to_string());
        }
    }

    fn audit(&self, line: &str) {
        self.store.append_log(self.id(), line);
    }
}
