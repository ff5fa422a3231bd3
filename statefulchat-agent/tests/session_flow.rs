//! End-to-end catalog and session flow against a temporary storage directory

use async_trait::async_trait;
use statefulchat_agent::{
    ChatDisplay, ConversationSession, ListingPurpose, ModelSettings, Notice, Prompt, Prompter,
    SelectionMachine, SelectionOutcome,
};
use statefulchat_core::session::{CatalogSummary, RecordStore, SessionRepository, Turn};
use statefulchat_providers::{LLMProvider, LLMResponse, Message, ProviderResult};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::Mutex;
use tempfile::TempDir;

#[derive(Default)]
struct QuietDisplay {
    listings: RefCell<Vec<Vec<String>>>,
    notices: RefCell<Vec<Notice>>,
    errors: RefCell<Vec<String>>,
}

impl ChatDisplay for QuietDisplay {
    fn render_listing(&self, summaries: &[CatalogSummary], purpose: ListingPurpose) {
        if purpose == ListingPurpose::Browse {
            self.listings
                .borrow_mut()
                .push(summaries.iter().map(|s| s.title.clone()).collect());
        }
    }

    fn render_turn(&self, _turn: &Turn) {}

    fn render_history(&self, _turns: &[Turn]) {}

    fn render_notice(&self, notice: Notice) {
        self.notices.borrow_mut().push(notice);
    }

    fn render_error(&self, message: &str) {
        self.errors.borrow_mut().push(message.to_string());
    }
}

struct Lines(VecDeque<&'static str>);

impl Prompter for Lines {
    fn read_line(&mut self, _prompt: Prompt) -> io::Result<Option<String>> {
        Ok(self.0.pop_front().map(str::to_string))
    }
}

/// Answers every request with the number of messages it received
struct CountingProvider {
    calls: Mutex<usize>,
}

#[async_trait]
impl LLMProvider for CountingProvider {
    async fn chat(
        &self,
        messages: Vec<Message>,
        _model: Option<String>,
        _max_tokens: u32,
        _temperature: f32,
    ) -> ProviderResult<LLMResponse> {
        *self.calls.lock().unwrap() += 1;
        Ok(LLMResponse {
            content: Some(format!("seen {} messages", messages.len())),
            finish_reason: "stop".to_string(),
            usage: HashMap::new(),
        })
    }

    fn get_default_model(&self) -> String {
        "counting".to_string()
    }
}

/// One pass of the client loop: catalog, then a session if one was opened
async fn drive(
    repo: &SessionRepository,
    provider: &CountingProvider,
    display: &QuietDisplay,
    input: &mut Lines,
) -> bool {
    let machine = SelectionMachine::new(repo, display);
    match machine.run(input) {
        SelectionOutcome::Open(selected) => {
            let mut session = ConversationSession::new(
                selected,
                repo.store(),
                provider,
                display,
                ModelSettings::default(),
            );
            session.run(input).await;
            true
        }
        SelectionOutcome::Exit => false,
    }
}

#[tokio::test]
async fn test_create_resume_and_delete() {
    let temp_dir = TempDir::new().unwrap();
    let repo = SessionRepository::new(RecordStore::new(temp_dir.path()), "you are terse");
    let provider = CountingProvider {
        calls: Mutex::new(0),
    };
    let display = QuietDisplay::default();
    let mut input = Lines(VecDeque::from(vec![
        // empty catalog: straight into a new conversation
        "hi, how are you?",
        "exit",
        // resume it
        "1",
        "context",
        "one more",
        "salir",
        // delete it
        "borrar",
        "1",
        "sí",
        // nothing left, so a fresh conversation starts; leave it untouched
        "exit",
        "s",
    ]));

    assert!(drive(&repo, &provider, &display, &mut input).await);
    let ids = repo.store().list_identities().unwrap();
    assert_eq!(ids.len(), 1);
    let record = repo.store().read(&ids[0]).unwrap();
    assert_eq!(
        record.turns(),
        &[
            Turn::System {
                content: "you are terse".to_string(),
                title: Some("hi, how are you?".to_string()),
            },
            Turn::user("hi, how are you?"),
            Turn::assistant("seen 2 messages"),
        ]
    );

    assert!(drive(&repo, &provider, &display, &mut input).await);
    let record = repo.store().read(&ids[0]).unwrap();
    assert_eq!(record.len(), 5);
    assert_eq!(record.turns()[4], Turn::assistant("seen 4 messages"));
    assert_eq!(*provider.calls.lock().unwrap(), 2);

    // Delete, then the emptied catalog opens a new conversation.
    assert!(drive(&repo, &provider, &display, &mut input).await);
    assert!(display
        .notices
        .borrow()
        .contains(&Notice::Deleted {
            title: "hi, how are you?".to_string()
        }));

    // Only the fresh conversation is left, flushed on exit without any turns.
    let remaining = repo.store().list_identities().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(
        repo.store().read(&remaining[0]).unwrap().turns(),
        &[Turn::system("you are terse")]
    );
    let log = std::fs::read_to_string(repo.store().log_path(&remaining[0])).unwrap();
    assert!(!log.contains("user:"));

    assert!(!drive(&repo, &provider, &display, &mut input).await);
    assert_eq!(
        display.listings.borrow()[0],
        vec!["hi, how are you?".to_string()]
    );
    assert!(display.errors.borrow().is_empty());
}

#[tokio::test]
async fn test_invalid_menu_input_reprompts() {
    let temp_dir = TempDir::new().unwrap();
    let repo = SessionRepository::new(RecordStore::new(temp_dir.path()), "sys");
    let first = repo.create_new();
    repo.store().write(&first.id, &first.record).unwrap();

    let provider = CountingProvider {
        calls: Mutex::new(0),
    };
    let display = QuietDisplay::default();
    let mut input = Lines(VecDeque::from(vec!["7", "what", "quit"]));

    assert!(!drive(&repo, &provider, &display, &mut input).await);
    assert_eq!(display.errors.borrow().len(), 2);
    assert_eq!(display.listings.borrow().len(), 1);
    assert_eq!(*provider.calls.lock().unwrap(), 0);
}
