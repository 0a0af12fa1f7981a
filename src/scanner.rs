//! A cursor over an owned byte buffer.
//!
//! Both the block and inline engines drive one of these.  Positions are byte
//! offsets, but the cursor always moves by whole decoded characters.

use crate::strings::decode_char;

#[derive(Debug, Clone, Default)]
pub struct Scanner {
    src: Vec<u8>,
    /// Beginning of the element not yet emitted.
    pub start: usize,
    /// Scan head.
    pub pos: usize,
    /// Width of the character most recently returned by `next`.
    width: usize,
}

impl Scanner {
    pub fn new(src: Vec<u8>) -> Self {
        Scanner {
            src,
            start: 0,
            pos: 0,
            width: 0,
        }
    }

    /// Returns the next character and advances past it.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<char> {
        match decode_char(self.rest()) {
            Some((c, w)) => {
                self.width = w;
                self.pos += w;
                Some(c)
            }
            None => {
                self.width = 0;
                None
            }
        }
    }

    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.peek_nth(1)
    }

    /// The `n`th character ahead of the cursor, 1-indexed.  Looking past the
    /// end of the buffer yields `None`.
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        let mut at = self.pos;
        let mut found = None;
        for _ in 0..n.max(1) {
            let (c, w) = decode_char(&self.src[at..])?;
            at += w;
            found = Some(c);
        }
        found
    }

    /// Advances past a run of `c`, returning how many were consumed.
    pub fn consume(&mut self, c: char) -> usize {
        self.consume_at_most(c, usize::MAX)
    }

    pub fn consume_at_most(&mut self, c: char, limit: usize) -> usize {
        let mut count = 0;
        while count < limit && self.peek() == Some(c) {
            self.next();
            count += 1;
        }
        count
    }

    /// Whether the upcoming characters are exactly `chars`.
    pub fn lookahead(&self, chars: &[char]) -> bool {
        let mut at = self.pos;
        for &expected in chars {
            match decode_char(&self.src[at..]) {
                Some((c, w)) if c == expected => at += w,
                _ => return false,
            }
        }
        true
    }

    /// Steps back over the character last returned by `next`.  Only a
    /// single step is supported; after end-of-input this does nothing.
    pub fn backup(&mut self) {
        self.pos -= self.width;
        self.width = 0;
    }

    pub fn ignore(&mut self) {
        self.start = self.pos;
    }

    /// Advances to the end of the current line, past its `\n` if there is
    /// one.  Returns `true` if a line break was consumed.
    pub fn skip_line(&mut self) -> bool {
        loop {
            match self.next() {
                Some('\n') => return true,
                Some(_) => (),
                None => return false,
            }
        }
    }

    /// Moves the cursor to `pos`, which must fall on a character boundary.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.src.len());
        self.width = 0;
    }

    /// Unscanned bytes.
    #[inline]
    pub fn rest(&self) -> &[u8] {
        &self.src[self.pos..]
    }

    /// Bytes between the start marker and the cursor.
    #[inline]
    pub fn pending(&self) -> &[u8] {
        &self.src[self.start..self.pos]
    }

    #[inline]
    pub fn buffer(&self) -> &[u8] {
        &self.src
    }
}
