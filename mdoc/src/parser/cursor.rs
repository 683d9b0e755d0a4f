/// A scanner over an immutable text buffer.
///
/// All counts are expressed in characters; the offset is kept in bytes so
/// that consumed spans can be returned as sub-slices of the buffer. Running
/// out of input is never an error: reads past the end yield empty strings.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    buffer: &'a str,
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buffer: &'a str) -> Self {
        Cursor { buffer, offset: 0 }
    }

    /// Byte offset of the next unread character.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of characters left to read.
    pub fn left(&self) -> usize {
        self.rest().chars().count()
    }

    pub fn is_eof(&self) -> bool {
        self.offset >= self.buffer.len()
    }

    /// The unread part of the buffer.
    pub fn rest(&self) -> &'a str {
        &self.buffer[self.offset..]
    }

    /// Text consumed since byte offset `start`.
    pub fn since(&self, start: usize) -> &'a str {
        &self.buffer[start..self.offset]
    }

    /// Return the next `count` characters and advance past them, or an empty
    /// string if fewer than `count` characters remain.
    pub fn read(&mut self, count: usize) -> &'a str {
        let text = self.peek(count);
        self.offset += text.len();
        text
    }

    /// Like [`Cursor::read`], without moving the offset.
    pub fn peek(&self, count: usize) -> &'a str {
        let rest = self.rest();
        match byte_len(rest, count) {
            Some(len) => &rest[..len],
            None => "",
        }
    }

    pub fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consume the maximal run of characters satisfying `pred`.
    pub fn read_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let text = self.peek_while(pred);
        self.offset += text.len();
        text
    }

    /// Like [`Cursor::read_while`], without moving the offset.
    pub fn peek_while(&self, pred: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let end = rest
            .char_indices()
            .find(|&(_, c)| !pred(c))
            .map_or(rest.len(), |(i, _)| i);
        &rest[..end]
    }

    /// Consume the maximal run where `pred(current, previous)` holds.
    ///
    /// `previous` is the character just before `current` in the buffer (which
    /// may already have been consumed), or `None` at the start of the buffer.
    pub fn read_while_prev(&mut self, pred: impl Fn(char, Option<char>) -> bool) -> &'a str {
        let rest = self.rest();
        let mut previous = self.buffer[..self.offset].chars().next_back();
        let mut end = rest.len();
        for (i, c) in rest.char_indices() {
            if !pred(c, previous) {
                end = i;
                break;
            }
            previous = Some(c);
        }
        let text = &rest[..end];
        self.offset += end;
        text
    }

    /// Consume the rest of the current line and its newline, if any.
    pub fn read_line(&mut self) -> &'a str {
        let start = self.offset;
        self.read_while(|c| c != '\n');
        self.read(1);
        self.since(start)
    }
}

/// Byte length of the first `count` characters of `text`, if it has that many.
fn byte_len(text: &str, count: usize) -> Option<usize> {
    let mut chars = text.char_indices();
    for _ in 0..count {
        chars.next()?;
    }
    Some(chars.next().map_or(text.len(), |(i, _)| i))
}
