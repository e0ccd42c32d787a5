//! Line tokenizer and cursor for MDL files.
//!
//! MDL is a line-oriented format: every construct occupies whole lines and
//! tokens are separated by whitespace. `#` starts a comment running to the
//! end of the line. The tokenizer splits the whole file up front;
//! [`LineCursor`] then hands lines out one at a time with one line of
//! lookahead, which is all the grammar ever needs.

/// The whitespace-split tokens of one physical source line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenLine {
    /// Tokens in source order; empty for blank or fully commented lines.
    pub tokens: Vec<String>,
    /// 1-indexed source line number.
    pub number: usize,
}

impl TokenLine {
    /// First token on the line, if any.
    pub fn first(&self) -> Option<&str> {
        self.tokens.first().map(String::as_str)
    }

    /// Token at `idx`, if present.
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.tokens.get(idx).map(String::as_str)
    }

    /// True when the line holds no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of tokens on the line.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }
}

/// Split raw file text into token lines.
///
/// Comments are stripped before splitting, so a fully commented line stays
/// present as an empty token line and line numbers keep matching the source
/// file.
pub fn tokenize(text: &str) -> Vec<TokenLine> {
    text.lines()
        .enumerate()
        .map(|(i, line)| {
            let line = match line.find('#') {
                Some(idx) => &line[..idx],
                None => line,
            };
            TokenLine {
                tokens: line.split_whitespace().map(str::to_owned).collect(),
                number: i + 1,
            }
        })
        .collect()
}

/// FIFO cursor over tokenized lines, shared by all parsers.
///
/// Advancing is an index bump; nothing is ever removed from the underlying
/// vector. The cursor must not be shared between two concurrent parses.
#[derive(Debug)]
pub struct LineCursor {
    lines: Vec<TokenLine>,
    pos: usize,
}

impl LineCursor {
    /// Wrap tokenized lines in a cursor positioned at the first line.
    pub fn new(lines: Vec<TokenLine>) -> Self {
        Self { lines, pos: 0 }
    }

    /// Tokenize `text` and wrap the result.
    pub fn from_text(text: &str) -> Self {
        Self::new(tokenize(text))
    }

    /// The next unconsumed line, without advancing.
    pub fn peek(&self) -> Option<&TokenLine> {
        self.lines.get(self.pos)
    }

    /// Consume and return the next line.
    pub fn next_line(&mut self) -> Option<TokenLine> {
        let line = self.lines.get(self.pos).cloned();
        if line.is_some() {
            self.pos += 1;
        }
        line
    }

    /// True when every line has been consumed.
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.lines.len()
    }
}
