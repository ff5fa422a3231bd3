//! Fakes shared by the unit tests of this crate

use async_trait::async_trait;
use statefulchat_core::session::{CatalogSummary, Turn};
use statefulchat_providers::{LLMProvider, LLMResponse, Message, ProviderError, ProviderResult};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::Mutex;

use crate::ui::{ChatDisplay, ListingPurpose, Notice, Prompt, Prompter};

#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Listing(Vec<CatalogSummary>, ListingPurpose),
    Turn(Turn),
    History(Vec<Turn>),
    Notice(Notice),
    Error(String),
}

/// Display that remembers everything it was asked to render
#[derive(Default)]
pub struct RecordingDisplay {
    events: RefCell<Vec<Rendered>>,
}

impl RecordingDisplay {
    pub fn events(&self) -> Vec<Rendered> {
        self.events.borrow().clone()
    }

    pub fn listings(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, Rendered::Listing(..)))
            .count()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Rendered::Error(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Rendered::Notice(notice) => Some(notice),
                _ => None,
            })
            .collect()
    }
}

impl ChatDisplay for RecordingDisplay {
    fn render_listing(&self, summaries: &[CatalogSummary], purpose: ListingPurpose) {
        self.events
            .borrow_mut()
            .push(Rendered::Listing(summaries.to_vec(), purpose));
    }

    fn render_turn(&self, turn: &Turn) {
        self.events.borrow_mut().push(Rendered::Turn(turn.clone()));
    }

    fn render_history(&self, turns: &[Turn]) {
        self.events
            .borrow_mut()
            .push(Rendered::History(turns.to_vec()));
    }

    fn render_notice(&self, notice: Notice) {
        self.events.borrow_mut().push(Rendered::Notice(notice));
    }

    fn render_error(&self, message: &str) {
        self.events
            .borrow_mut()
            .push(Rendered::Error(message.to_string()));
    }
}

/// Prompter that replays fixed lines, then reports end of input
pub struct ScriptedPrompter {
    lines: VecDeque<String>,
    prompts: Vec<Prompt>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    pub fn prompts(&self) -> &[Prompt] {
        &self.prompts
    }
}

impl Prompter for ScriptedPrompter {
    fn read_line(&mut self, prompt: Prompt) -> io::Result<Option<String>> {
        self.prompts.push(prompt);
        Ok(self.lines.pop_front())
    }
}

/// Provider answering from a queue; an `Err` entry simulates a failed call
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, String>>>,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<Result<&str, &str>>) -> Self {
        Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    async fn chat(
        &self,
        messages: Vec<Message>,
        _model: Option<String>,
        _max_tokens: u32,
        _temperature: f32,
    ) -> ProviderResult<LLMResponse> {
        self.requests.lock().unwrap().push(messages);
        let next = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("no scripted reply left".to_string()));
        match next {
            Ok(content) => Ok(LLMResponse {
                content: Some(content),
                finish_reason: "stop".to_string(),
                usage: HashMap::new(),
            }),
            Err(message) => Err(ProviderError::ApiError(message)),
        }
    }

    fn get_default_model(&self) -> String {
        "scripted".to_string()
    }
}
