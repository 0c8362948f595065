use super::Parser;
use crate::lexer::{CommentStyle, Token};

impl<'a> Parser<'a> {
    /// Move comments sitting directly at the cursor into the pending buffer.
    pub(super) fn absorb_comments(&mut self) {
        let tokens = self.tokens;
        while let Token::Comment { style, text } = &tokens[self.pos].token {
            if let Some(fragment) = normalize(*style, text) {
                self.pending.push(fragment);
            }
            self.pos += 1;
        }
    }

    /// Drain every comment collected since the last declaration, including
    /// the ones directly ahead of the next token.
    pub(super) fn leading_doc(&mut self) -> Vec<String> {
        self.absorb_comments();
        std::mem::take(&mut self.pending)
    }

    /// Close a declaration: consume its optional `,`/`;` separator, append
    /// the same-line comments between the body and that separator, then one
    /// trailing comment if it starts on the line of the last consumed token.
    /// Anything still pending is dropped.
    pub(super) fn finish_doc(&mut self, mut parts: Vec<String>) -> String {
        let tokens = self.tokens;
        let mut i = self.pos;
        while matches!(tokens[i].token, Token::Comment { .. }) && tokens[i].same_line {
            i += 1;
        }
        if matches!(tokens[i].token, Token::Comma | Token::Semi) {
            for t in &tokens[self.pos..i] {
                if let Token::Comment { style, text } = &t.token {
                    if let Some(fragment) = normalize(*style, text) {
                        parts.push(fragment);
                    }
                }
            }
            self.pos = i;
        }
        self.skip_separator();

        let next = &tokens[self.pos];
        if let Token::Comment { style, text } = &next.token {
            if next.same_line {
                if let Some(fragment) = normalize(*style, text) {
                    parts.push(fragment);
                }
                self.pos += 1;
            }
        }
        self.pending.clear();
        parts.join("\n")
    }
}

/// Strip delimiters and `*` continuation markers from one comment body.
/// Blank comments yield nothing.
fn normalize(style: CommentStyle, text: &str) -> Option<String> {
    let cleaned = match style {
        CommentStyle::Slash | CommentStyle::Hash => text.trim().to_owned(),
        CommentStyle::Block | CommentStyle::Doc => {
            let lines: Vec<&str> = text
                .lines()
                .map(|l| {
                    let l = l.trim();
                    l.strip_prefix('*').map_or(l, str::trim_start)
                })
                .collect();
            let start = lines.iter().position(|l| !l.is_empty());
            let end = lines.iter().rposition(|l| !l.is_empty());
            match (start, end) {
                (Some(s), Some(e)) => lines[s..=e].join("\n"),
                _ => String::new(),
            }
        }
    };
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}
