use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::nodes::{NodeLink, NodeText, Span};
use crate::parser::ResolvedReference;
use crate::scanner::Scanner;
use crate::strings::{self, is_escapable};

const MAX_LINK_LABEL_LENGTH: usize = 1000;
const MAX_BACKTICKS: usize = 80;

/// Reference definitions, keyed by normalized label.
#[derive(Debug, Default, Clone)]
pub struct RefMap {
    map: FxHashMap<String, ResolvedReference>,
}

impl RefMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a definition.  The first definition of a label wins; returns
    /// whether this one was stored.
    pub fn insert(&mut self, label: &str, reference: ResolvedReference) -> bool {
        let label = strings::normalize_label(label);
        if label.is_empty() || self.map.contains_key(&label) {
            return false;
        }
        log::debug!("reference definition [{}] -> {}", label, reference.url);
        self.map.insert(label, reference);
        true
    }

    pub fn lookup(&self, label: &str) -> Option<&ResolvedReference> {
        self.map.get(&strings::normalize_label(label))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Scan,
    Emphasis,
    Code,
    Reference,
    End,
}

/// The inline engine.  Iterating a `Subject` yields the spans of one
/// block's text in order.  Plain text is copied to an output buffer as it is
/// passed over and spans are left out of it, so what remains afterwards is
/// the surrounding plain text.
#[derive(Debug)]
pub struct Subject<'r> {
    scanner: Scanner,
    refmap: &'r mut RefMap,
    state: State,
    output: Vec<u8>,
    /// Start of the last backtick run of each length seen so far.
    backticks: [usize; MAX_BACKTICKS + 1],
    /// End of the line whose backticks have all been recorded.
    scanned_for_backticks: Option<usize>,
    /// End of the line most recently searched for a closer.
    eol: usize,
}

impl<'r> Subject<'r> {
    pub fn new(input: Vec<u8>, refmap: &'r mut RefMap) -> Self {
        Subject {
            output: Vec::with_capacity(input.len()),
            scanner: Scanner::new(input),
            refmap,
            state: State::Scan,
            backticks: [0; MAX_BACKTICKS + 1],
            scanned_for_backticks: None,
            eol: 0,
        }
    }

    /// The text left over once spans have been cut out.
    pub fn remaining(&self) -> &[u8] {
        &self.output
    }

    pub fn into_remaining(self) -> Vec<u8> {
        self.output
    }

    /// Keep the text between the start marker and the cursor.
    fn commit(&mut self) {
        self.output.extend_from_slice(self.scanner.pending());
        self.scanner.ignore();
    }

    /// Drop everything from the start marker up to `end`.
    fn cut(&mut self, end: usize) {
        self.scanner.seek(end);
        self.scanner.ignore();
    }

    fn scan(&mut self) -> State {
        loop {
            let c = match self.scanner.next() {
                None => return State::End,
                Some(c) => c,
            };

            match c {
                '\\' => {
                    if self
                        .scanner
                        .rest()
                        .first()
                        .map_or(false, |&b| is_escapable(b))
                    {
                        self.scanner.ignore();
                        self.scanner.next();
                    }
                }
                '`' => {
                    self.scanner.backup();
                    return State::Code;
                }
                '[' => {
                    self.scanner.backup();
                    return State::Reference;
                }
                '!' if self.scanner.peek() == Some('[') => {
                    self.scanner.backup();
                    return State::Reference;
                }
                '*' | '_' => {
                    self.scanner.backup();
                    if self.opens_emphasis(c as u8) {
                        return State::Emphasis;
                    }
                    self.scanner.next();
                }
                _ => (),
            }
            self.commit();
        }
    }

    fn opens_emphasis(&self, marker: u8) -> bool {
        let buf = self.scanner.buffer();
        let pos = self.scanner.pos;

        // Intraword underscores are literal.
        if marker == b'_' && self.output.last().map_or(false, u8::is_ascii_alphanumeric) {
            return false;
        }

        let run = run_length(&buf[pos..], marker);
        match buf.get(pos + run) {
            None => false,
            Some(&b) if strings::isspace(b) => false,
            Some(_) => find_closing(buf, pos + run, marker, 1).is_some(),
        }
    }

    fn handle_delim(&mut self) -> Option<Span> {
        let start = self.scanner.pos;
        let marker = self.scanner.peek()?;
        let run = self.scanner.consume(marker);
        let buf = self.scanner.buffer();
        let delim = marker as u8;

        let (close, strong) = match find_closing(buf, start + run, delim, run.min(2)) {
            Some(close) => (close, run >= 2),
            None => match find_closing(buf, start + run, delim, 1) {
                Some(close) => (close, false),
                None => {
                    self.commit();
                    return None;
                }
            },
        };

        let closing = run_length(&buf[close..], delim).min(run);
        let interior = buf[start + run..close].to_vec();
        self.cut(close + closing);

        let text = NodeText {
            start: self.output.len(),
            content: render(&interior, self.refmap),
        };
        Some(if strong {
            Span::Strong(text)
        } else {
            Span::Emphasis(text)
        })
    }

    /// End of the line holding `pos`.  Openers are only ever looked at in
    /// increasing order, so the last answer stands until `pos` passes it.
    fn line_end(&mut self, pos: usize) -> usize {
        if pos >= self.eol {
            self.eol = strings::line_end(self.scanner.buffer(), pos);
        }
        self.eol
    }

    /// Start of the next run of exactly `ticks` backticks between `from` and
    /// `eol`.  Every run passed over is recorded, so once a line has been
    /// scanned to its end, a length with no later run is answered at once.
    fn scan_to_closing_backtick(
        &mut self,
        from: usize,
        eol: usize,
        ticks: usize,
    ) -> Option<usize> {
        if ticks > MAX_BACKTICKS {
            return None;
        }
        if self.scanned_for_backticks == Some(eol) && self.backticks[ticks] < from {
            return None;
        }

        let buf = self.scanner.buffer();
        let mut i = from;
        loop {
            i += buf[i..eol].iter().take_while(|&&b| b != b'`').count();
            if i >= eol {
                self.scanned_for_backticks = Some(eol);
                return None;
            }
            let run = run_length(&buf[i..eol], b'`');
            if run <= MAX_BACKTICKS {
                self.backticks[run] = self.backticks[run].max(i);
            }
            if run == ticks {
                return Some(i);
            }
            i += run;
        }
    }

    fn handle_backticks(&mut self) -> Option<Span> {
        let start = self.scanner.pos;
        let ticks = self.scanner.consume('`');
        let eol = self.line_end(start);

        match self.scan_to_closing_backtick(start + ticks, eol, ticks) {
            Some(close) => {
                let content = strings::to_string(&self.scanner.buffer()[start + ticks..close]);
                self.cut(close + ticks);
                Some(Span::Code(NodeText {
                    start: self.output.len(),
                    content,
                }))
            }
            None => {
                // No closer on this line: the backticks are literal.
                self.commit();
                None
            }
        }
    }

    fn handle_reference(&mut self) -> Option<Span> {
        let start = self.scanner.pos;
        let image = self.scanner.peek() == Some('!');

        if !image && self.handle_definition() {
            return None;
        }

        let open = if image { start + 1 } else { start };
        let buf = self.scanner.buffer();
        let close = match matching(buf, open, b'[', b']') {
            Some(close) => close,
            None => return self.literal(),
        };
        let text = buf[open + 1..close].to_vec();

        let (end, id, url, title) = match buf.get(close + 1) {
            Some(b'(') => {
                let paren = match matching(buf, close + 1, b'(', b')') {
                    Some(paren) => paren,
                    None => return self.literal(),
                };
                let (url, title) = split_destination(&buf[close + 2..paren]);
                (paren + 1, String::new(), url, title)
            }
            Some(b'[') => {
                let id_close = match matching(buf, close + 1, b'[', b']') {
                    Some(id_close) => id_close,
                    None => return self.literal(),
                };
                let mut id = strings::to_string(strings::trim_slice(&buf[close + 2..id_close]));
                if id.is_empty() {
                    id = strings::to_string(&text);
                }
                let (url, title) = match self.refmap.lookup(&id) {
                    Some(r) => (r.url.clone(), r.title.clone()),
                    None => (String::new(), String::new()),
                };
                (id_close + 1, id, url, title)
            }
            _ => {
                let id = strings::to_string(&text);
                match self.refmap.lookup(&id) {
                    Some(r) => {
                        let (url, title) = (r.url.clone(), r.title.clone());
                        (close + 1, id, url, title)
                    }
                    None => return self.literal(),
                }
            }
        };

        self.cut(end);

        let link = NodeLink {
            start: self.output.len(),
            id,
            text: render(&text, self.refmap),
            title,
            url,
        };
        Some(if image {
            Span::Image(link)
        } else {
            Span::Link(link)
        })
    }

    /// Parses and removes a `[id]: url "title"` line.  Returns `false`,
    /// consuming nothing, if the cursor is not at one.
    fn handle_definition(&mut self) -> bool {
        let buf = self.scanner.buffer();
        let start = self.scanner.pos;

        let line_start = match indent_before(&self.output) {
            Some(line_start) => line_start,
            None => return false,
        };
        let close = match matching(buf, start, b'[', b']') {
            Some(close) => close,
            None => return false,
        };
        let label = &buf[start + 1..close];
        if buf.get(close + 1) != Some(&b':') || label.contains(&b'\n') {
            return false;
        }

        let eol = strings::line_end(buf, close);
        let (url, title) = split_destination(&buf[close + 2..eol]);
        if url.is_empty() {
            return false;
        }

        let label = strings::to_string(label);
        // The line goes along with its own line break, or with the one
        // before it when it is the last line.
        let (keep, end) = if eol < buf.len() {
            (line_start, eol + 1)
        } else {
            (line_start.saturating_sub(1), eol)
        };

        self.refmap.insert(&label, ResolvedReference { url, title });
        self.output.truncate(keep);
        self.cut(end);
        true
    }

    fn literal(&mut self) -> Option<Span> {
        self.scanner.next();
        self.commit();
        None
    }
}

impl Iterator for Subject<'_> {
    type Item = Span;

    fn next(&mut self) -> Option<Span> {
        loop {
            let span = match self.state {
                State::Scan => {
                    self.state = self.scan();
                    continue;
                }
                State::Emphasis => self.handle_delim(),
                State::Code => self.handle_backticks(),
                State::Reference => self.handle_reference(),
                State::End => return None,
            };
            self.state = State::Scan;
            if span.is_some() {
                return span;
            }
        }
    }
}

/// Render one block's raw text to plain text: run the inline engine, then
/// splice each span's content back in at its recorded offset.
pub fn render(input: &[u8], refmap: &mut RefMap) -> String {
    let mut subject = Subject::new(input.to_vec(), refmap);
    let spans = subject.by_ref().collect::<SmallVec<[Span; 8]>>();
    let mut output = subject.into_remaining();
    splice(&mut output, &spans);
    strings::to_string(&output)
}

/// Reinsert `spans`, in the order they were produced, into the text left
/// over after they were cut out.
pub fn splice(buf: &mut Vec<u8>, spans: &[Span]) {
    if spans.is_empty() {
        return;
    }

    let mut out = Vec::with_capacity(buf.len());
    let mut copied = 0;
    for span in spans {
        let at = span.start().clamp(copied, buf.len());
        out.extend_from_slice(&buf[copied..at]);
        out.extend_from_slice(span.content().as_bytes());
        copied = at;
    }
    out.extend_from_slice(&buf[copied..]);
    *buf = out;
}

fn run_length(bytes: &[u8], c: u8) -> usize {
    bytes.iter().take_while(|&&b| b == c).count()
}

/// First run of at least `min_run` `marker`s at or after `from` on the same
/// line, skipping backslash-escaped characters.
fn find_closing(buf: &[u8], from: usize, marker: u8, min_run: usize) -> Option<usize> {
    let mut i = from;
    while i < buf.len() {
        match buf[i] {
            b'\n' => return None,
            b'\\' => i += 2,
            c if c == marker => {
                let run = run_length(&buf[i..], marker);
                if run >= min_run {
                    return Some(i);
                }
                i += run;
            }
            _ => i += 1,
        }
    }
    None
}

/// Index of the bracket closing the one at `open`, honouring nesting and
/// backslash escapes.
fn matching(buf: &[u8], open: usize, opener: u8, closer: u8) -> Option<usize> {
    let limit = buf.len().min(open.saturating_add(MAX_LINK_LABEL_LENGTH));
    let mut depth = 0usize;
    let mut i = open;
    while i < limit {
        match buf[i] {
            b'\\' => {
                i += 2;
                continue;
            }
            b if b == opener => depth += 1,
            b if b == closer => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => (),
        }
        i += 1;
    }
    None
}

/// If `buf` ends in a line of up to three spaces, the index where that
/// line begins.
fn indent_before(buf: &[u8]) -> Option<usize> {
    let spaces = buf.iter().rev().take_while(|&&b| b == b' ').count();
    let line_start = buf.len() - spaces;
    if spaces <= 3 && (line_start == 0 || buf[line_start - 1] == b'\n') {
        Some(line_start)
    } else {
        None
    }
}

fn closing_quote(open: u8) -> u8 {
    if open == b'(' {
        b')'
    } else {
        open
    }
}

/// Split a link destination into its url and optional title, which may be
/// quoted with `"`, `'` or parentheses.
fn split_destination(inner: &[u8]) -> (String, String) {
    let inner = strings::trim_slice(inner);
    let split = inner.iter().position(|&b| strings::isspace(b));

    let (url, title) = match split {
        Some(ws) => {
            let rest = strings::ltrim_slice(&inner[ws..]);
            match (rest.first(), rest.last()) {
                (Some(&open @ (b'"' | b'\'' | b'(')), Some(&close))
                    if rest.len() >= 2 && close == closing_quote(open) =>
                {
                    (&inner[..ws], &rest[1..rest.len() - 1])
                }
                _ => (inner, &inner[..0]),
            }
        }
        None => (inner, &inner[..0]),
    };

    let url = match url {
        [b'<', middle @ .., b'>'] => middle,
        url => url,
    };

    (
        strings::to_string(&strings::unescape(url)),
        strings::to_string(&strings::unescape(title)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::Kind;
    use pretty_assertions::assert_eq;

    fn spans(input: &str) -> (Vec<Span>, String) {
        let mut refmap = RefMap::new();
        let mut subject = Subject::new(input.as_bytes().to_vec(), &mut refmap);
        let spans = subject.by_ref().collect::<Vec<_>>();
        let rest = strings::to_string(subject.remaining());
        (spans, rest)
    }

    #[test]
    fn emphasis_records_splice_offset() {
        let (spans, rest) = spans("un*frigging*believable");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].kind(), Kind::Emphasis);
        assert_eq!(spans[0].content(), "frigging");
        assert_eq!(spans[0].start(), 2);
        assert_eq!(rest, "unbelievable");

        let mut buf = rest.into_bytes();
        splice(&mut buf, &spans);
        assert_eq!(buf, b"unfriggingbelievable");
    }

    #[test]
    fn emphasis_and_strong() {
        let (spans, rest) = spans("*emphasis*");
        assert_eq!(spans[0].kind(), Kind::Emphasis);
        assert_eq!(spans[0].content(), "emphasis");
        assert_eq!(spans[0].start(), 0);
        assert_eq!(rest, "");

        let (spans, _) = self::spans("__strong__");
        assert_eq!(spans[0].kind(), Kind::Strong);
        assert_eq!(spans[0].content(), "strong");
        assert_eq!(spans[0].start(), 0);
    }

    #[test]
    fn later_offsets_account_for_earlier_cuts() {
        let (spans, rest) = spans("a *b* c `d` e");
        assert_eq!(rest, "a  c  e");
        assert_eq!(spans[0].start(), 2);
        assert_eq!(spans[1].kind(), Kind::Code);
        assert_eq!(spans[1].start(), 5);
    }

    #[test]
    fn code_span() {
        let (spans, rest) = spans("It is `code`");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].kind(), Kind::Code);
        assert_eq!(spans[0].content(), "code");
        assert_eq!(rest, "It is ");
    }

    #[test]
    fn code_span_closers_after_a_full_line_search() {
        // The unmatched triple run walks the whole line first; the later
        // single-backtick span must still find its closer.
        let (spans, rest) = spans("``` `` ` `` ` y `");
        assert_eq!(rest, "```  ");
        assert_eq!(
            spans
                .iter()
                .map(|s| (s.kind(), s.start(), s.content()))
                .collect::<Vec<_>>(),
            vec![
                (Kind::Code, 4, " ` ".to_string()),
                (Kind::Code, 5, " y ".to_string())
            ]
        );
    }

    #[test]
    fn long_backtick_runs_are_literal() {
        let ticks = "`".repeat(MAX_BACKTICKS + 1);
        let input = format!("{}a{}", ticks, ticks);
        let (spans, rest) = spans(&input);
        assert!(spans.is_empty());
        assert_eq!(rest, input);
    }

    #[test]
    fn inline_link_and_image() {
        let (spans, _) = spans("It is [link](ref \"title\")");
        assert_eq!(spans[0].kind(), Kind::Link);
        assert_eq!(spans[0].content(), "linktitleref");

        let (spans, _) = self::spans("It is ![image](ref \"title\")");
        assert_eq!(spans[0].kind(), Kind::Image);
        assert_eq!(spans[0].content(), "imagetitleref");
    }

    #[test]
    fn reference_definition_is_consumed() {
        let (spans, rest) = spans("[id]: link \"title\"\n[text][id]");
        assert_eq!(rest, "");
        match &spans[..] {
            [Span::Link(link)] => {
                assert_eq!(link.id, "id");
                assert_eq!(link.text, "text");
                assert_eq!(link.url, "link");
                assert_eq!(link.title, "title");
            }
            other => panic!("unexpected spans: {:?}", other),
        }
    }

    #[test]
    fn escapes_are_merged() {
        let (spans, rest) = spans("\\*not emphasis\\*");
        assert!(spans.is_empty());
        assert_eq!(rest, "*not emphasis*");

        let (_, rest) = self::spans("C:\\path\\to");
        assert_eq!(rest, "C:\\path\\to");
    }

    #[test]
    fn destinations() {
        assert_eq!(
            split_destination(b" <http://a.b/c> 'T' "),
            ("http://a.b/c".to_string(), "T".to_string())
        );
        assert_eq!(
            split_destination(b"url (paren title)"),
            ("url".to_string(), "paren title".to_string())
        );
        assert_eq!(
            split_destination(b"url"),
            ("url".to_string(), String::new())
        );
    }

    #[test]
    fn refmap_first_definition_wins() {
        let mut refmap = RefMap::new();
        let first = ResolvedReference {
            url: "one".to_string(),
            title: String::new(),
        };
        let second = ResolvedReference {
            url: "two".to_string(),
            title: String::new(),
        };
        assert!(refmap.insert("Foo", first));
        assert!(!refmap.insert("foo", second));
        assert_eq!(refmap.len(), 1);
        assert_eq!(refmap.lookup("FOO").map(|r| r.url.as_str()), Some("one"));
    }
}
