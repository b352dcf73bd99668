use chrono::{DateTime, TimeZone};

use crate::types::Alert;

const SEPARATOR: &str = "──────────";

/// Escape text for Telegram's HTML parse mode.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render every alert into one message: a summary header, one block per
/// alert, and a "Last check" footer.
pub fn format_message<Tz>(alerts: &[Alert], checked_at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut out = format!(
        "✅ <b>{} Crous listing{} matched</b>\n\n",
        alerts.len(),
        if alerts.len() == 1 { "" } else { "s" }
    );

    for alert in alerts {
        out.push_str(&format!(
            "🔑 <b>{}</b>\n{SEPARATOR}\n<a href=\"{}\">{}</a> ({})\n📍 {}\n\n",
            escape_html(&alert.keyword),
            escape_html(&alert.link),
            escape_html(&alert.title),
            escape_html(&alert.price),
            escape_html(&alert.address),
        ));
    }

    out.push_str(&format!(
        "Last check: {}",
        checked_at.format("%Y-%m-%d %H:%M:%S")
    ));
    out
}

/// Split `text` into consecutive chunks of at most `limit` characters.
///
/// Cuts after the last newline in range that is preceded by some content;
/// a line longer than `limit` is cut hard, but never inside an HTML tag or
/// entity. Telegram rejects blank messages, so a whitespace-only remainder is
/// folded into the previous chunk when it fits and dropped otherwise. Apart
/// from such dropped runs, joining the chunks gives back `text`.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut chunks = Vec::new();
    let mut rest = text;

    while rest.chars().count() > limit {
        let end = rest
            .char_indices()
            .nth(limit)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let window = &rest[..end];
        let cut = match window.rfind('\n') {
            Some(i) if !window[..i].trim().is_empty() => i + 1,
            _ => markup_safe_cut(window),
        };
        let (chunk, tail) = rest.split_at(cut);
        push_chunk(&mut chunks, chunk, limit);
        rest = tail;
    }

    push_chunk(&mut chunks, rest, limit);
    chunks
}

fn push_chunk(chunks: &mut Vec<String>, chunk: &str, limit: usize) {
    if chunk.trim().is_empty() {
        if let Some(last) = chunks.last_mut() {
            if last.chars().count() + chunk.chars().count() <= limit {
                last.push_str(chunk);
            }
        }
        return;
    }
    chunks.push(chunk.to_string());
}

/// Byte offset to hard-cut `window` at, backed off to before a tag or entity
/// the window would otherwise split.
fn markup_safe_cut(window: &str) -> usize {
    let mut cut = window.len();
    if let Some(open) = window.rfind('<') {
        if !window[open..].contains('>') {
            cut = open;
        }
    }
    if let Some(amp) = window[..cut].rfind('&') {
        if !window[amp..cut].contains(';') {
            cut = amp;
        }
    }
    if cut == 0 {
        window.len()
    } else {
        cut
    }
}
