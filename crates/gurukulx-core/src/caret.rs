//! Caret save/restore around text normalization.
//!
//! Editing hosts re-render text boxes after normalizing their content. The
//! caret is saved as a `(path, offset)` anchor relative to the text root
//! before normalization and walked back to a flat position afterwards.

use serde::{Deserialize, Serialize};

/// Caret position relative to the text root.
///
/// `path` holds child indices from the root; plain text box content has one
/// level (the line index). `offset` counts characters inside that node.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CaretAnchor {
    pub path: Vec<usize>,
    pub offset: usize,
}

impl CaretAnchor {
    /// Anchor for the caret at character index `caret` of `text`.
    ///
    /// Lines are separated by `\n`. A caret past the end anchors at the end
    /// of the last line.
    pub fn save(text: &str, caret: usize) -> Self {
        let mut remaining = caret;
        let mut last = (0, 0);
        for (line_index, line) in text.split('\n').enumerate() {
            let len = line.chars().count();
            if remaining <= len {
                return Self {
                    path: vec![line_index],
                    offset: remaining,
                };
            }
            remaining -= len + 1;
            last = (line_index, len);
        }
        Self {
            path: vec![last.0],
            offset: last.1,
        }
    }

    /// Walk the anchor into `text` and return a character index.
    ///
    /// Paths past the last line land on the last line, offsets past the end
    /// of a line land at its end.
    pub fn restore(&self, text: &str) -> usize {
        let target = self.path.first().copied().unwrap_or(0);
        let mut index = 0;
        let mut lines = text.split('\n').enumerate().peekable();
        while let Some((line_index, line)) = lines.next() {
            let len = line.chars().count();
            if line_index == target || lines.peek().is_none() {
                return index + self.offset.min(len);
            }
            index += len + 1;
        }
        index
    }
}

/// Normalize text box content: `\r\n` and lone `\r` become `\n`, and trailing
/// whitespace is removed from every line.
pub fn normalize_text(text: &str) -> String {
    normalize_with_caret(text, 0).0
}

/// Normalize `text` and carry the caret (a character index) through it.
pub fn normalize_with_caret(text: &str, caret: usize) -> (String, usize) {
    let (unified, caret) = unify_newlines(text, caret);
    let anchor = CaretAnchor::save(&unified, caret);

    let trimmed = unified
        .split('\n')
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n");

    let caret = anchor.restore(&trimmed);
    (trimmed, caret)
}

fn unify_newlines(text: &str, caret: usize) -> (String, usize) {
    let mut out = String::with_capacity(text.len());
    let mut out_len = 0;
    let mut mapped = None;
    let mut index = 0;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if index == caret {
            mapped = Some(out_len);
        }
        index += 1;

        if c == '\r' {
            out.push('\n');
            out_len += 1;
            if chars.peek() == Some(&'\n') {
                chars.next();
                // Caret between \r and \n lands after the newline.
                if index == caret {
                    mapped = Some(out_len);
                }
                index += 1;
            }
        } else {
            out.push(c);
            out_len += 1;
        }
    }

    (out, mapped.unwrap_or(out_len))
}
