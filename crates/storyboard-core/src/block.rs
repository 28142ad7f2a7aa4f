//! Block grammar: the flat, human-editable text form of a [`PanelSet`].
//!
//! A block looks like this:
//!
//! ```text
//! [BASIC BACKGROUND / CONTEXT]
//! Global style, character bible, consistency rules...
//!
//! [PROMPT 1] Optional Title
//! Prompt text for panel 1...
//!
//! [PROMPT 2]
//! Prompt text for panel 2...
//! ```
//!
//! Everything above the first `[PROMPT n]` header is background. Each header
//! owns the lines up to the next header.

use std::sync::LazyLock;

use regex::Regex;

use crate::panel::{Panel, PanelSet};

/// Marker line the renderer emits above the background.
pub const BACKGROUND_MARKER: &str = "[BASIC BACKGROUND / CONTEXT]";

static PROMPT_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\[PROMPT\s*([0-9]{1,2})\]\s*(.*)$").expect("prompt header pattern is valid")
});

/// Line boundaries: `\r\n`, lone `\r` or `\n`, and the other Unicode line
/// separators.
static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("\r\n|[\n\r\x0B\x0C\x1C\x1D\x1E\u{85}\u{2028}\u{2029}]")
        .expect("line break pattern is valid")
});

struct Header {
    line: usize,
    n: i64,
    title: String,
}

fn parse_header(line: &str) -> Option<(i64, String)> {
    let captures = PROMPT_HEADER.captures(line.trim())?;
    let n = captures.get(1)?.as_str().parse().ok()?;
    let title = captures
        .get(2)
        .map_or("", |m| m.as_str())
        .trim()
        .to_owned();
    Some((n, title))
}

/// Joins the lines above the first header into the background, dropping the
/// renderer's marker line when it leads the section.
fn background_from(lines: &[&str]) -> String {
    let mut rest = lines.iter().skip_while(|line| line.trim().is_empty());
    let mut kept: Vec<&str> = Vec::new();
    if let Some(first) = rest.next() {
        if !first.trim().eq_ignore_ascii_case(BACKGROUND_MARKER) {
            kept.push(first);
        }
    }
    kept.extend(rest);
    kept.join("\n").trim().to_owned()
}

/// Parses a block into its background and panels.
///
/// Panels are returned in header appearance order; duplicate numbers are all
/// kept. Text without any header becomes the background of an empty set.
#[must_use]
pub fn parse_block(text: &str) -> PanelSet {
    let lines: Vec<&str> = LINE_BREAK.split(text).collect();
    let headers: Vec<Header> = lines
        .iter()
        .enumerate()
        .filter_map(|(line, text)| parse_header(text).map(|(n, title)| Header { line, n, title }))
        .collect();

    let Some(first) = headers.first() else {
        return PanelSet::new(text.trim(), Vec::new());
    };

    let background = background_from(&lines[..first.line]);
    let panels = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let end = headers.get(idx + 1).map_or(lines.len(), |next| next.line);
            let body = lines[header.line + 1..end].join("\n");
            Panel::new(header.n, &header.title, body.trim())
        })
        .collect();

    PanelSet::new(background, panels)
}

/// Renders a background and panels into a block, panels sorted by number.
#[must_use]
pub fn render_block(background: &str, panels: &[Panel]) -> String {
    let mut parts: Vec<String> = Vec::new();

    let background = background.trim();
    if !background.is_empty() {
        parts.push(BACKGROUND_MARKER.to_owned());
        parts.push(background.to_owned());
        parts.push(String::new());
    }

    let mut sorted: Vec<&Panel> = panels.iter().collect();
    sorted.sort_by_key(|panel| panel.n);
    for panel in sorted {
        parts.push(
            format!("[PROMPT {}] {}", panel.n, panel.title)
                .trim_end()
                .to_owned(),
        );
        parts.push(panel.prompt.trim().to_owned());
        parts.push(String::new());
    }

    parts.join("\n").trim_end().to_owned()
}

impl PanelSet {
    /// Renders this set as an editable block.
    #[must_use]
    pub fn to_block(&self) -> String {
        render_block(&self.background, &self.panels)
    }
}
