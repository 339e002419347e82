// src/render/text.rs
// =============================================================================
// Small text helpers for the widgets: plain-text previews of markdown bodies
// and date formatting.
//
// Pull request bodies are markdown. Previews show the rendered text only
// (no `**`, no link syntax) so that cutting at a fixed length never leaves
// half a markup token behind.
// =============================================================================

use chrono::{DateTime, Utc};
use pulldown_cmark::{Event, Parser, Tag};

/// Flattens markdown to a single line of plain text
pub fn markdown_to_plain(markdown: &str) -> String {
    let mut text = String::new();

    for event in Parser::new(markdown) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak | Event::Rule => text.push(' '),
            Event::End(Tag::Paragraph)
            | Event::End(Tag::Heading(..))
            | Event::End(Tag::Item)
            | Event::End(Tag::CodeBlock(_)) => text.push(' '),
            _ => {}
        }
    }

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The first `max_chars` characters, with "..." appended when cut
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();

    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

pub fn format_date(date: DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}
