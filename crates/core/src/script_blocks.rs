//! Script block parser.
//!
//! Classifies each line of generated script text as a stage direction, a
//! spoken line, or narration. Classification is lexical and line-local:
//! no lookahead and no state carried between lines, so the same line always
//! yields the same block.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Characters that open a stage direction.
pub const STAGE_OPENERS: &[char] = &['(', '（', '[', '【'];

/// Leading list markers stripped before classification.
const BULLET_MARKERS: &[char] = &['-', '•', '*'];

/// `<speaker>:<text>` with a 1-21 character speaker made of letters and spaces.
/// Accepts both ASCII and fullwidth colons.
pub const SPEAKER_LINE_PATTERN: &str = r"^(\p{L}[\p{L}\s]{0,20}?)\s*[:：]\s*(.*)$";

static SPEAKER_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SPEAKER_LINE_PATTERN).expect("valid regex"));

/// A classified unit of script text. Derived on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ScriptBlock {
    Stage { text: String },
    Line { speaker: String, text: String },
    Narration { text: String },
}

impl ScriptBlock {
    pub fn text(&self) -> &str {
        match self {
            ScriptBlock::Stage { text }
            | ScriptBlock::Line { text, .. }
            | ScriptBlock::Narration { text } => text,
        }
    }
}

/// Strip leading bullet markers and whitespace.
fn strip_bullets(line: &str) -> &str {
    line.trim_start_matches(|c: char| c.is_whitespace() || BULLET_MARKERS.contains(&c))
}

/// Classify a single line. Returns `None` for blank lines.
pub fn parse_line(raw: &str) -> Option<ScriptBlock> {
    let line = raw.trim();
    if line.is_empty() {
        return None;
    }

    let body = strip_bullets(line);
    if body.starts_with(STAGE_OPENERS) {
        return Some(ScriptBlock::Stage {
            text: body.to_string(),
        });
    }

    if let Some(caps) = SPEAKER_LINE_RE.captures(body) {
        return Some(ScriptBlock::Line {
            speaker: caps[1].trim().to_string(),
            text: caps[2].to_string(),
        });
    }

    Some(ScriptBlock::Narration {
        text: line.to_string(),
    })
}

/// Parse a block of text into script blocks, dropping blank lines.
///
/// Accepts `\n` and `\r\n` line endings.
pub fn parse_script(text: &str) -> Vec<ScriptBlock> {
    text.lines().filter_map(parse_line).collect()
}

/// Whether a block is dialogue spoken by the viewpoint character.
///
/// Matches when the speaker token contains the character's name. Only
/// affects which side a line is rendered on.
pub fn is_viewpoint_line(block: &ScriptBlock, character_name: &str) -> bool {
    match block {
        ScriptBlock::Line { speaker, .. } => {
            !character_name.is_empty() && speaker.contains(character_name)
        }
        _ => false,
    }
}
