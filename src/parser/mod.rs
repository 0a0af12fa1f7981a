pub mod inlines;
pub mod options;

use crate::nodes::{Block, ListItem, ListType, NodeHeading, NodeList};
pub use crate::parser::options::{Options, ReferenceScope};
use crate::scanner::Scanner;
use crate::strings;

// Quotes and list items nested deeper than this are not parsed any further;
// their text is kept as a single paragraph.  Recursion depth otherwise grows
// with the input.
const MAX_NESTING_DEPTH: usize = 100;

/// Parse a Markdown document into a lazy sequence of blocks.
///
/// ```rust
/// use md2txt::{parse_document, Kind};
///
/// let kinds = parse_document("# Title\n\n* * *\n\n> quoted\n")
///     .map(|block| block.kind())
///     .collect::<Vec<_>>();
/// assert_eq!(kinds, vec![Kind::Heading, Kind::Rule, Kind::QuoteBlock]);
/// ```
pub fn parse_document(md: &str) -> Parser {
    Parser::from_bytes(md.as_bytes())
}

/// A reference link's resolved details.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedReference {
    /// The destination URL of the reference link.
    pub url: String,

    /// The title of the link.
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Begin,
    Heading,
    Paragraph,
    UnorderedList,
    OrderedList,
    CodeBlock,
    Rule,
    Quote,
    Error,
    End,
}

/// The block engine.  Iterating a `Parser` yields the document's top-level
/// blocks in order; quotes and list items carry their nested blocks, which
/// are parsed in full by a fresh `Parser` over their dedented text.
#[derive(Debug)]
pub struct Parser {
    scanner: Scanner,
    state: State,
    depth: usize,
}

impl Parser {
    /// Build a parser over raw bytes.  Line endings are normalized to `\n`;
    /// invalid UTF-8 is tolerated and comes out as U+FFFD.
    pub fn from_bytes(md: &[u8]) -> Self {
        Parser::nested(strings::normalize_newlines(md), 0)
    }

    fn nested(src: Vec<u8>, depth: usize) -> Self {
        Parser {
            scanner: Scanner::new(src),
            state: State::Begin,
            depth,
        }
    }

    fn begin(&mut self) -> State {
        loop {
            let rest = self.scanner.rest();
            if rest.is_empty() {
                return State::End;
            }
            if strings::is_blank(rest) {
                self.scanner.skip_line();
                self.scanner.ignore();
                continue;
            }
            return classify(rest);
        }
    }

    fn parse_heading(&mut self) -> Block {
        let level = self.scanner.consume('#').min(6) as u8;
        let from = self.scanner.pos;
        let end = self.line_content_end();

        let text = strings::trim_hashes(&self.scanner.buffer()[from..end]);
        Block::Heading(NodeHeading {
            level,
            content: strings::to_string(text),
        })
    }

    /// Reads up to the next blank line.  A line of `=` or `-` directly under
    /// the text turns it into a heading instead.
    fn parse_paragraph(&mut self) -> Block {
        loop {
            let end = self.line_content_end();
            let rest = self.scanner.rest();

            if end < self.scanner.pos {
                if let Some(underline) = strings::setext_underline(rest) {
                    let content = self.text_between(self.scanner.start, end);
                    self.scanner.skip_line();
                    return Block::Heading(NodeHeading {
                        level: if underline == b'=' { 1 } else { 2 },
                        content: content.trim().to_string(),
                    });
                }
                if !strings::is_blank(rest) {
                    continue;
                }
            }

            return Block::Paragraph(self.text_between(self.scanner.start, end));
        }
    }

    fn parse_list(&mut self, ordered: bool) -> Block {
        let list_type = if ordered {
            ListType::Ordered
        } else {
            ListType::Bullet(self.scanner.peek().unwrap_or('*'))
        };

        let mut items = vec![];
        loop {
            items.push(self.parse_item(list_type));
            if !self.continues_list(list_type) {
                break;
            }
        }

        Block::List(NodeList { list_type, items })
    }

    fn parse_item(&mut self, list_type: ListType) -> ListItem {
        let rest = self.scanner.rest();
        let width = match list_type {
            ListType::Bullet(_) => strings::bullet_marker_width(rest),
            ListType::Ordered => strings::ordered_marker_width(rest),
        }
        .unwrap_or(0);
        let body = self.scanner.pos + width;

        // Collect the first line group with one level of indent dropped from
        // each continuation line.  The first dedented line that opens a
        // block of its own starts the item's nested content.
        let mut item = Vec::new();
        let mut from = body;
        let mut nested = None;
        loop {
            match self.scanner.next() {
                None => break,
                Some('\n') => {
                    let pos = self.scanner.pos;
                    let buf = self.scanner.buffer();
                    let rest = &buf[pos..];
                    if strings::is_blank(rest) {
                        break;
                    }
                    match strings::indent_width(rest) {
                        Some(indent) => {
                            item.extend_from_slice(&buf[from.min(pos)..pos]);
                            from = pos + indent;
                            if nested.is_none() && classify(&buf[from..]) != State::Paragraph {
                                nested = Some(item.len());
                            }
                        }
                        // Unindented lines continue the item only as plain text.
                        None if classify(rest) != State::Paragraph => break,
                        None => (),
                    }
                }
                Some(_) => (),
            }
        }

        let end = self.scanner.pos;
        item.extend_from_slice(&self.scanner.buffer()[from.min(end)..end]);
        let mut sub = match nested {
            Some(n) => item.split_off(n),
            None => vec![],
        };
        let content = strings::to_string(strings::trim_trailing_newlines(&item));

        // Blank lines followed by indented lines continue the item with
        // further blocks.
        let rest = self.scanner.rest();
        let blank = strings::blank_lines(rest);
        if blank > 0 && strings::indent_width(&rest[blank..]).is_some() {
            loop {
                let rest = self.scanner.rest();
                if rest.is_empty() {
                    break;
                }
                if strings::is_blank(rest) {
                    sub.push(b'\n');
                    self.scanner.skip_line();
                    continue;
                }
                let indent = match strings::indent_width(rest) {
                    Some(indent) => indent,
                    None => break,
                };
                let from = self.scanner.pos + indent;
                self.scanner.skip_line();
                sub.extend_from_slice(&self.scanner.buffer()[from..self.scanner.pos]);
            }
        }

        let blocks = if strings::trim_slice(&sub).is_empty() {
            vec![]
        } else {
            self.parse_nested(sub)
        };

        ListItem { content, blocks }
    }

    /// Whether another item of the same list follows, possibly after blank
    /// lines.  The blank lines are consumed if so.
    fn continues_list(&mut self, list_type: ListType) -> bool {
        let rest = self.scanner.rest();
        let blank = strings::blank_lines(rest);
        if !starts_item(&rest[blank..], list_type) {
            return false;
        }
        let target = self.scanner.pos + blank;
        while self.scanner.pos < target {
            self.scanner.skip_line();
        }
        true
    }

    fn parse_code_block(&mut self) -> Block {
        let marker: &[u8] = if self.scanner.peek() == Some('\t') {
            b"\t"
        } else {
            b"    "
        };

        let mut content = Vec::new();
        for line in 0.. {
            let from = self.scanner.pos + marker.len();
            let end = self.line_content_end();
            if line > 0 {
                content.push(b'\n');
            }
            content.extend_from_slice(&self.scanner.buffer()[from.min(end)..end]);
            if end == self.scanner.pos || !self.scanner.rest().starts_with(marker) {
                break;
            }
        }

        Block::CodeBlock(strings::to_string(&content))
    }

    fn parse_rule(&mut self) -> Block {
        if let Some(marker) = self.scanner.next() {
            loop {
                if self.scanner.peek() == Some(marker) {
                    self.scanner.next();
                } else if self.scanner.lookahead(&[' ', marker]) {
                    self.scanner.next();
                    self.scanner.next();
                } else {
                    break;
                }
            }
        }
        self.scanner.skip_line();
        Block::Rule
    }

    /// Reads up to the first blank line, strips one level of `>` from every
    /// line, and parses what is left as the quote's blocks.
    fn parse_quote(&mut self) -> Block {
        while self.scanner.skip_line() && !strings::is_blank(self.scanner.rest()) {}

        let text = strings::trim_trailing_newlines(self.scanner.pending());
        let mut sub = Vec::with_capacity(text.len());
        for (i, line) in text.split(|&b| b == b'\n').enumerate() {
            if i > 0 {
                sub.push(b'\n');
            }
            sub.extend_from_slice(strip_quote_marker(line));
        }

        Block::QuoteBlock(self.parse_nested(sub))
    }

    fn parse_nested(&self, sub: Vec<u8>) -> Vec<Block> {
        if self.depth >= MAX_NESTING_DEPTH {
            log::debug!(
                "nesting depth {} reached; keeping {} bytes as text",
                self.depth,
                sub.len()
            );
            let text = strings::trim_slice(&sub);
            if text.is_empty() {
                return vec![];
            }
            return vec![Block::Paragraph(strings::to_string(text))];
        }

        Parser::nested(sub, self.depth + 1).collect()
    }

    /// Advances past the current line and returns the index where its
    /// content ends, before the line break.
    fn line_content_end(&mut self) -> usize {
        if self.scanner.skip_line() {
            self.scanner.pos - 1
        } else {
            self.scanner.pos
        }
    }

    fn text_between(&self, from: usize, to: usize) -> String {
        strings::to_string(&self.scanner.buffer()[from..to])
    }
}

impl Iterator for Parser {
    type Item = Block;

    fn next(&mut self) -> Option<Block> {
        loop {
            log::trace!(
                "block state {:?} at {} (depth {})",
                self.state,
                self.scanner.pos,
                self.depth
            );

            let remaining = self.scanner.rest().len();
            let block = match self.state {
                State::Begin => {
                    self.state = self.begin();
                    continue;
                }
                State::Heading => self.parse_heading(),
                State::Paragraph => self.parse_paragraph(),
                State::UnorderedList => self.parse_list(false),
                State::OrderedList => self.parse_list(true),
                State::CodeBlock => self.parse_code_block(),
                State::Rule => self.parse_rule(),
                State::Quote => self.parse_quote(),
                State::Error => {
                    log::warn!(
                        "block parser made no progress at byte {}; stopping",
                        self.scanner.pos
                    );
                    self.state = State::End;
                    continue;
                }
                State::End => return None,
            };

            if self.scanner.rest().len() >= remaining {
                self.state = State::Error;
                continue;
            }

            self.scanner.ignore();
            self.state = State::Begin;
            return Some(block);
        }
    }
}

/// Classify a non-blank line by its leading characters.  Rules are checked
/// before bullets so that `* * *` is never a list.
fn classify(line: &[u8]) -> State {
    match line.first() {
        None => State::End,
        Some(b'#') => State::Heading,
        Some(b'*' | b'-' | b'+' | b'_') if strings::is_rule(line) => State::Rule,
        Some(b'*' | b'-' | b'+') if strings::bullet_marker_width(line).is_some() => {
            State::UnorderedList
        }
        Some(b'0'..=b'9') if strings::ordered_marker_width(line).is_some() => State::OrderedList,
        Some(b'>') => State::Quote,
        Some(_) if strings::indent_width(line).is_some() => State::CodeBlock,
        Some(_) => State::Paragraph,
    }
}

fn starts_item(line: &[u8], list_type: ListType) -> bool {
    match (classify(line), list_type) {
        (State::UnorderedList, ListType::Bullet(marker)) => {
            line.first().map(|&b| b as char) == Some(marker)
        }
        (State::OrderedList, ListType::Ordered) => true,
        _ => false,
    }
}

fn strip_quote_marker(line: &[u8]) -> &[u8] {
    match line {
        [b'>', b' ', rest @ ..] => rest,
        [b'>', rest @ ..] => rest,
        _ => line,
    }
}
