//! Whitespace tokenizer shared by all line grammars.
//!
//! A `Scanner` walks a single line left to right. Optional fields are tried
//! with `attempt`, which rewinds the cursor when the field does not match, so
//! a grammar reads like its line layout:
//!
//! `<priority> <name> [(<opts>)] <command> ...`

/// Cursor over one line of text.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    /// Consume a run of whitespace. Returns false when there was none.
    pub fn gap(&mut self) -> bool {
        let rest = self.rest();
        let trimmed = rest.trim_start();
        self.pos += rest.len() - trimmed.len();
        rest.len() != trimmed.len()
    }

    /// Next run of non-whitespace characters.
    pub fn word(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        if end == 0 {
            return None;
        }
        self.pos += end;
        Some(&rest[..end])
    }

    /// Next word, only if every character is an ASCII digit.
    pub fn digits(&mut self) -> Option<&'a str> {
        self.attempt(|s| {
            s.word()
                .filter(|w| w.bytes().all(|b| b.is_ascii_digit()))
        })
    }

    /// Content between `open` and `close`, e.g. `(a=b c=d)`.
    ///
    /// The content must be non-empty and runs to the first `close`.
    pub fn delimited(&mut self, open: char, close: char) -> Option<&'a str> {
        let inner = self.rest().strip_prefix(open)?;
        let end = inner.find(close)?;
        if end == 0 {
            return None;
        }
        self.pos += open.len_utf8() + end + close.len_utf8();
        Some(&inner[..end])
    }

    /// Everything up to the end of the line, trailing whitespace removed.
    pub fn remainder(&mut self) -> Option<&'a str> {
        let rest = self.rest().trim_end();
        if rest.is_empty() {
            return None;
        }
        self.pos = self.text.len();
        Some(rest)
    }

    /// Run `f`; if it yields nothing, restore the cursor.
    pub fn attempt<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let saved = self.pos;
        let out = f(self);
        if out.is_none() {
            self.pos = saved;
        }
        out
    }

    /// Optional field preceded by whitespace: ` <field>`.
    pub fn spaced<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        self.attempt(|s| if s.gap() { f(s) } else { None })
    }

    /// True once only whitespace is left.
    pub fn is_done(&self) -> bool {
        self.rest().trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn words_split_on_any_whitespace() {
        let mut s = Scanner::new("alpha \t beta");
        assert_eq!(s.word(), Some("alpha"));
        assert!(s.gap());
        assert_eq!(s.word(), Some("beta"));
        assert!(s.is_done());
        assert_eq!(s.word(), None);
    }

    #[test]
    fn digits_rewinds_on_non_numeric_word() {
        let mut s = Scanner::new("10abc rest");
        assert_eq!(s.digits(), None);
        assert_eq!(s.word(), Some("10abc"));
    }

    #[test]
    fn delimited_reads_to_first_close() {
        let mut s = Scanner::new("(a=1 b=2) tail");
        assert_eq!(s.delimited('(', ')'), Some("a=1 b=2"));
        assert!(s.gap());
        assert_eq!(s.word(), Some("tail"));
    }

    #[test]
    fn delimited_rejects_empty_or_unclosed() {
        assert_eq!(Scanner::new("[]").delimited('[', ']'), None);
        assert_eq!(Scanner::new("[open").delimited('[', ']'), None);
        assert_eq!(Scanner::new("x[y]").delimited('[', ']'), None);
    }

    #[test]
    fn spaced_requires_leading_gap_and_restores() {
        let mut s = Scanner::new("a b");
        assert_eq!(s.word(), Some("a"));
        assert_eq!(s.spaced(|s| s.word().filter(|w| *w == "z")), None);
        assert_eq!(s.spaced(|s| s.word()), Some("b"));
    }

    #[test]
    fn remainder_trims_trailing_space() {
        let mut s = Scanner::new("p1 p2  ");
        assert_eq!(s.remainder(), Some("p1 p2"));
        assert!(s.is_done());
    }
}
