//! Terminal renderers for the catalog and the chat

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use statefulchat_agent::{ChatDisplay, ListingPurpose, Notice};
use statefulchat_core::session::{CatalogSummary, Role, Turn};
use std::cell::RefCell;
use std::time::Duration;

/// Text shared by both renderers
fn notice_text(notice: &Notice) -> String {
    match notice {
        Notice::ConversationLoaded(id) => format!("Conversation {} loaded.", id),
        Notice::NewConversation(id) => format!("New conversation {} started.", id),
        Notice::SessionHelp => {
            "Type 'history' to review the conversation, 'exit' to return to the catalog."
                .to_string()
        }
        Notice::Deleted { title } => format!("Deleted \"{}\".", title),
        Notice::DeleteCancelled => "Delete cancelled.".to_string(),
        Notice::Goodbye => "Goodbye!".to_string(),
    }
}

fn listing_header(purpose: ListingPurpose) -> &'static str {
    match purpose {
        ListingPurpose::Browse => "Saved conversations",
        ListingPurpose::Delete => "Choose a conversation to delete",
    }
}

fn listing_footer(purpose: ListingPurpose) -> &'static str {
    match purpose {
        ListingPurpose::Browse => "Enter a number to resume, 'new', 'delete' or 'exit'.",
        ListingPurpose::Delete => "Enter a number, or 'cancel'.",
    }
}

pub(crate) fn summary_line(index: usize, summary: &CatalogSummary) -> String {
    format!(
        "{:>3}. {}  ({} {}, {} turns)",
        index + 1,
        summary.title,
        summary.date,
        summary.time.replace('-', ":"),
        summary.turn_count
    )
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::System => "System",
        Role::User => "You",
        Role::Assistant => "Assistant",
    }
}

/// Styled output with a spinner while the model is thinking
#[derive(Default)]
pub struct RichDisplay {
    spinner: RefCell<Option<ProgressBar>>,
}

impl RichDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    fn styled_turn(turn: &Turn) -> String {
        let label = role_label(turn.role());
        let label = match turn.role() {
            Role::System => style(label).dim().bold(),
            Role::User => style(label).green().bold(),
            Role::Assistant => style(label).cyan().bold(),
        };
        format!("{}: {}", label, turn.content())
    }
}

impl ChatDisplay for RichDisplay {
    fn render_listing(&self, summaries: &[CatalogSummary], purpose: ListingPurpose) {
        let header = match purpose {
            ListingPurpose::Browse => style(listing_header(purpose)).bold().cyan(),
            ListingPurpose::Delete => style(listing_header(purpose)).bold().yellow(),
        };
        println!("\n{}", header);
        for (index, summary) in summaries.iter().enumerate() {
            println!("{}", summary_line(index, summary));
        }
        println!("{}", style(listing_footer(purpose)).dim());
    }

    fn render_turn(&self, turn: &Turn) {
        // The user's own line is already on screen.
        if turn.role() != Role::User {
            println!("{}", Self::styled_turn(turn));
        }
    }

    fn render_history(&self, turns: &[Turn]) {
        println!("{}", style("Conversation so far").bold());
        for turn in turns {
            println!("{}", Self::styled_turn(turn));
        }
        println!();
    }

    fn render_notice(&self, notice: Notice) {
        let text = notice_text(&notice);
        let text = match notice {
            Notice::Deleted { .. } | Notice::NewConversation(_) | Notice::ConversationLoaded(_) => {
                style(text).green()
            }
            Notice::SessionHelp => style(text).dim(),
            _ => style(text).yellow(),
        };
        println!("{}", text);
    }

    fn render_error(&self, message: &str) {
        println!("{} {}", style("Error:").red().bold(), message);
    }

    fn begin_wait(&self) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(spinner_style);
        }
        spinner.set_message("Thinking...");
        spinner.enable_steady_tick(Duration::from_millis(100));
        *self.spinner.borrow_mut() = Some(spinner);
    }

    fn end_wait(&self) {
        if let Some(spinner) = self.spinner.borrow_mut().take() {
            spinner.finish_and_clear();
        }
    }
}

/// Unstyled lines, for pipes and dumb terminals
#[derive(Default)]
pub struct PlainDisplay;

impl ChatDisplay for PlainDisplay {
    fn render_listing(&self, summaries: &[CatalogSummary], purpose: ListingPurpose) {
        println!("\n{}:", listing_header(purpose));
        for (index, summary) in summaries.iter().enumerate() {
            println!("{}", summary_line(index, summary));
        }
        println!("{}", listing_footer(purpose));
    }

    fn render_turn(&self, turn: &Turn) {
        if turn.role() != Role::User {
            println!("{}: {}", role_label(turn.role()), turn.content());
        }
    }

    fn render_history(&self, turns: &[Turn]) {
        println!("--- conversation so far ---");
        for turn in turns {
            println!("{}: {}", role_label(turn.role()), turn.content());
        }
        println!("---");
    }

    fn render_notice(&self, notice: Notice) {
        println!("{}", notice_text(&notice));
    }

    fn render_error(&self, message: &str) {
        println!("Error: {}", message);
    }

    fn begin_wait(&self) {
        println!("Thinking...");
    }
}
