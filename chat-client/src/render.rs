//! Terminal rendering of chat messages.
//!
//! Bot text is Markdown and goes through `pulldown-cmark`; user text is shown as typed.

use colored::Colorize;
use pulldown_cmark::{Event, Parser, Tag};

use crate::session::{ChatMessage, ChatRole};

/// Label line followed by the message body.
pub fn render_message(msg: &ChatMessage) -> String {
    match msg.role {
        ChatRole::User => format!("{}\n{}\n", msg.role.label().cyan().bold(), msg.text),
        ChatRole::Bot => format!(
            "{}\n{}\n",
            msg.role.label().magenta().bold(),
            render_markdown(&msg.text)
        ),
    }
}

/// Renders a Markdown subset (headings, emphasis, code, lists, links) as ANSI text.
pub fn render_markdown(src: &str) -> String {
    let mut out = String::new();
    let mut bold = 0usize;
    let mut italic = 0usize;
    let mut heading = false;
    let mut in_code_block = false;
    // one entry per open list: next ordinal for ordered lists
    let mut lists: Vec<Option<u64>> = Vec::new();

    for event in Parser::new(src) {
        match event {
            Event::Start(Tag::Heading(..)) => heading = true,
            Event::End(Tag::Heading(..)) => {
                heading = false;
                out.push_str("\n\n");
            }
            Event::Start(Tag::Strong) => bold += 1,
            Event::End(Tag::Strong) => bold = bold.saturating_sub(1),
            Event::Start(Tag::Emphasis) => italic += 1,
            Event::End(Tag::Emphasis) => italic = italic.saturating_sub(1),
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(Tag::CodeBlock(_)) => {
                in_code_block = false;
                out.push('\n');
            }
            Event::Start(Tag::List(first)) => lists.push(first),
            Event::End(Tag::List(_)) => {
                lists.pop();
                if lists.is_empty() {
                    out.push('\n');
                }
            }
            Event::Start(Tag::Item) => {
                let depth = lists.len().saturating_sub(1);
                out.push_str(&"  ".repeat(depth));
                match lists.last_mut() {
                    Some(Some(n)) => {
                        out.push_str(&format!("{n}. "));
                        *n += 1;
                    }
                    _ => out.push_str("• "),
                }
            }
            Event::End(Tag::Item) => {
                if !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            Event::End(Tag::Paragraph) => {
                if lists.is_empty() {
                    out.push_str("\n\n");
                } else {
                    out.push('\n');
                }
            }
            Event::End(Tag::Link(_, dest, _)) => {
                out.push_str(&format!(" ({})", dest.as_ref().underline()));
            }
            Event::Text(text) => {
                if in_code_block {
                    for line in text.lines() {
                        out.push_str(&format!("    {}\n", line.dimmed()));
                    }
                } else {
                    out.push_str(&style(&text, heading || bold > 0, italic > 0));
                }
            }
            Event::Code(code) => out.push_str(&code.as_ref().yellow().to_string()),
            Event::SoftBreak => out.push(' '),
            Event::HardBreak | Event::Rule => out.push('\n'),
            _ => {}
        }
    }

    out.trim_end().to_string()
}

fn style(text: &str, bold: bool, italic: bool) -> String {
    match (bold, italic) {
        (true, true) => text.bold().italic().to_string(),
        (true, false) => text.bold().to_string(),
        (false, true) => text.italic().to_string(),
        (false, false) => text.to_string(),
    }
}
