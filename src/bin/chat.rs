//! Terminal client for the LearnSync chat demo
//!
//! Talks to a running server over HTTP. Type a reply, or the number of a
//! suggested reply. `/restart` starts over, `/quit` exits.

use crossterm::style::Stylize;
use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use serde::Deserialize;
use serde_json::json;
use std::io::{self, BufRead, IsTerminal, Write};

const DEFAULT_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Deserialize)]
struct SessionEnvelope {
    session: SessionView,
}

#[derive(Debug, Deserialize)]
struct SessionView {
    id: String,
    messages: Vec<MessageView>,
}

#[derive(Debug, Clone, Deserialize)]
struct MessageView {
    sender: String,
    content: String,
    #[serde(default)]
    suggested_replies: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ChatView {
    outcome: String,
    messages: Vec<MessageView>,
}

struct Client {
    agent: ureq::Agent,
    base: String,
}

impl Client {
    fn new(base: impl Into<String>) -> Self {
        Self {
            agent: ureq::Agent::new(),
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    fn create_session(&self) -> Result<SessionView, ureq::Error> {
        let envelope: SessionEnvelope = self
            .agent
            .post(&format!("{}/api/sessions", self.base))
            .call()?
            .into_json()?;
        Ok(envelope.session)
    }

    fn restart(&self, id: &str) -> Result<SessionView, ureq::Error> {
        let envelope: SessionEnvelope = self
            .agent
            .post(&format!("{}/api/sessions/{id}/restart", self.base))
            .call()?
            .into_json()?;
        Ok(envelope.session)
    }

    fn chat(&self, id: &str, text: &str) -> Result<ChatView, ureq::Error> {
        Ok(self
            .agent
            .post(&format!("{}/api/sessions/{id}/chat", self.base))
            .send_json(json!({ "text": text }))?
            .into_json()?)
    }

    fn delete(&self, id: &str) -> Result<(), ureq::Error> {
        self.agent
            .post(&format!("{}/api/sessions/{id}/delete", self.base))
            .call()?;
        Ok(())
    }
}

/// Renders the markdown subset the assistant uses as terminal text
struct Renderer {
    color: bool,
}

impl Renderer {
    fn emphasize(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn code(&self, text: &str) -> String {
        if self.color {
            text.cyan().to_string()
        } else {
            text.to_string()
        }
    }

    fn render(&self, markdown: &str) -> String {
        let mut out = String::new();
        // One entry per open list: next number for ordered lists
        let mut lists: Vec<Option<u64>> = Vec::new();
        let mut bold = false;
        let mut in_code = false;

        for event in Parser::new(markdown) {
            match event {
                Event::Start(Tag::Heading { .. } | Tag::Strong) => bold = true,
                Event::End(TagEnd::Heading(_)) => {
                    bold = false;
                    out.push('\n');
                }
                Event::End(TagEnd::Strong) => bold = false,
                Event::Start(Tag::CodeBlock(_)) => {
                    ensure_newline(&mut out);
                    in_code = true;
                }
                Event::End(TagEnd::CodeBlock) => in_code = false,
                Event::Start(Tag::List(start)) => {
                    ensure_newline(&mut out);
                    lists.push(start);
                }
                Event::End(TagEnd::List(_)) => {
                    lists.pop();
                }
                Event::Start(Tag::Item) => {
                    let depth = lists.len().saturating_sub(1);
                    out.push_str(&"   ".repeat(depth));
                    match lists.last_mut() {
                        Some(Some(n)) => {
                            out.push_str(&format!("{n}. "));
                            *n += 1;
                        }
                        _ => out.push_str("- "),
                    }
                }
                Event::End(TagEnd::Item) => ensure_newline(&mut out),
                Event::End(TagEnd::Paragraph) => {
                    ensure_newline(&mut out);
                    if lists.is_empty() {
                        out.push('\n');
                    }
                }
                Event::Text(text) if in_code => {
                    for line in text.lines() {
                        out.push_str("    ");
                        out.push_str(&self.code(line));
                        out.push('\n');
                    }
                }
                Event::Text(text) | Event::Code(text) => {
                    if bold {
                        out.push_str(&self.emphasize(&text));
                    } else {
                        out.push_str(&text);
                    }
                }
                Event::SoftBreak | Event::HardBreak => {
                    out.push('\n');
                    out.push_str(&"   ".repeat(lists.len()));
                }
                _ => {}
            }
        }

        out.trim_end().to_string()
    }
}

fn ensure_newline(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

fn print_message(renderer: &Renderer, message: &MessageView) {
    if message.sender == "assistant" {
        println!("{}\n", renderer.render(&message.content));
    }
}

fn print_replies(replies: &[String]) {
    for (i, reply) in replies.iter().enumerate() {
        println!("  [{}] {reply}", i + 1);
    }
}

/// Map a typed line to the text to submit: a number picks a suggested reply
fn resolve_input(line: &str, replies: &[String]) -> String {
    let line = line.trim();
    line.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| replies.get(i))
        .cloned()
        .unwrap_or_else(|| line.to_string())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let base = std::env::var("LEARNSYNC_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
    let client = Client::new(base);
    let renderer = Renderer {
        color: io::stdout().is_terminal(),
    };

    let mut session = client.create_session()?;
    let mut replies = Vec::new();
    for message in &session.messages {
        print_message(&renderer, message);
        replies.clone_from(&message.suggested_replies);
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print_replies(&replies);
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next().transpose()? else {
            break;
        };
        match line.trim() {
            "" => continue,
            "/quit" => break,
            "/restart" => {
                session = client.restart(&session.id)?;
                replies.clear();
                for message in &session.messages {
                    print_message(&renderer, message);
                    replies.clone_from(&message.suggested_replies);
                }
                continue;
            }
            _ => {}
        }

        let text = resolve_input(&line, &replies);
        println!("{}", "…".dark_grey());
        match client.chat(&session.id, &text) {
            Ok(view) => {
                for message in view.messages.iter().filter(|m| m.sender == "assistant") {
                    print_message(&renderer, message);
                    replies.clone_from(&message.suggested_replies);
                }
                if view.outcome == "abandoned" {
                    println!("(the conversation was restarted before a reply arrived)");
                }
            }
            Err(ureq::Error::Status(409, _)) => {
                println!("(still answering your previous message)");
            }
            Err(err) => return Err(err.into()),
        }
    }

    // Best effort; the server evicts idle sessions anyway
    let _ = client.delete(&session.id);
    Ok(())
}
