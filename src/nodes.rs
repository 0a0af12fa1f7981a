//! The element model produced by the block and inline engines.

use std::fmt;

use crate::parser::inlines::{self, RefMap};

/// The kind of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(strum::VariantArray))]
pub enum Kind {
    Heading,
    Paragraph,
    List,
    QuoteBlock,
    CodeBlock,
    Rule,
    Emphasis,
    Strong,
    Link,
    Code,
    Image,
}

/// Whether an element is structural or lives within a block's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Block,
    Inline,
}

impl Kind {
    pub fn element_type(self) -> ElementType {
        match self {
            Kind::Heading
            | Kind::Paragraph
            | Kind::List
            | Kind::QuoteBlock
            | Kind::CodeBlock
            | Kind::Rule => ElementType::Block,
            Kind::Emphasis | Kind::Strong | Kind::Link | Kind::Code | Kind::Image => {
                ElementType::Inline
            }
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Kind::Heading => "heading",
            Kind::Paragraph => "paragraph",
            Kind::List => "list",
            Kind::QuoteBlock => "quote_block",
            Kind::CodeBlock => "code_block",
            Kind::Rule => "rule",
            Kind::Emphasis => "emphasis",
            Kind::Strong => "strong",
            Kind::Link => "link",
            Kind::Code => "code",
            Kind::Image => "image",
        })
    }
}

/// A block element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// An ATX (`# Title`) or setext (`Title\n===`) heading.  Contains
    /// inlines.
    Heading(NodeHeading),

    /// A paragraph.  Contains inlines.
    Paragraph(String),

    /// A bullet or ordered list.
    List(NodeList),

    /// A block quote.  Contains the blocks parsed from its dedented text.
    QuoteBlock(Vec<Block>),

    /// An indented code block.  Its text is verbatim.
    CodeBlock(String),

    /// A horizontal rule.  Has no content.
    Rule,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeHeading {
    /// Level 1 through 6.
    pub level: u8,

    /// Raw heading text, markers removed.
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListType {
    /// Bullet list, with the marker character used (`*`, `-` or `+`).
    Bullet(char),

    /// Ordered list, `1.` style.
    Ordered,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeList {
    pub list_type: ListType,
    pub items: Vec<ListItem>,
}

/// A list item: the text of its first line group followed by any nested
/// blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListItem {
    pub content: String,
    pub blocks: Vec<Block>,
}

impl Block {
    pub fn kind(&self) -> Kind {
        match self {
            Block::Heading(..) => Kind::Heading,
            Block::Paragraph(..) => Kind::Paragraph,
            Block::List(..) => Kind::List,
            Block::QuoteBlock(..) => Kind::QuoteBlock,
            Block::CodeBlock(..) => Kind::CodeBlock,
            Block::Rule => Kind::Rule,
        }
    }

    /// The block's plain text, rendered with a reference table of its own.
    pub fn content(&self) -> String {
        self.render(&mut RefMap::new())
    }

    /// The block's plain text.  Reference definitions met while rendering
    /// are added to `refmap`, and shorthand references are resolved from it.
    pub fn render(&self, refmap: &mut RefMap) -> String {
        match self {
            Block::Heading(heading) => inlines::render(heading.content.as_bytes(), refmap),
            Block::Paragraph(content) => inlines::render(content.as_bytes(), refmap),
            Block::List(list) => {
                let mut output = Vec::new();
                for item in &list.items {
                    output.push(inlines::render(item.content.as_bytes(), refmap));
                    for block in &item.blocks {
                        output.push(block.render(refmap));
                    }
                }
                output.join("\n")
            }
            Block::QuoteBlock(blocks) => blocks
                .iter()
                .map(|b| b.render(refmap))
                .collect::<Vec<_>>()
                .join("\n"),
            Block::CodeBlock(content) => content.clone(),
            Block::Rule => String::new(),
        }
    }
}

/// Text carried by an emphasis, strong or code span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeText {
    /// Offset in the block text, after earlier spans were cut, at which the
    /// span's content is reinserted.
    pub start: usize,
    pub content: String,
}

/// A link or image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeLink {
    pub start: usize,

    /// The reference id, for `[text][id]` forms.  Empty for inline links.
    pub id: String,

    /// The link text or image alt text.
    pub text: String,

    pub title: String,

    pub url: String,
}

/// An inline span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Emphasis(NodeText),
    Strong(NodeText),
    Code(NodeText),
    Link(NodeLink),
    Image(NodeLink),
}

impl Span {
    pub fn kind(&self) -> Kind {
        match self {
            Span::Emphasis(..) => Kind::Emphasis,
            Span::Strong(..) => Kind::Strong,
            Span::Code(..) => Kind::Code,
            Span::Link(..) => Kind::Link,
            Span::Image(..) => Kind::Image,
        }
    }

    pub fn start(&self) -> usize {
        match self {
            Span::Emphasis(t) | Span::Strong(t) | Span::Code(t) => t.start,
            Span::Link(l) | Span::Image(l) => l.start,
        }
    }

    /// Plain text of the span.  Links and images flatten to their text,
    /// title and url, in that order.
    pub fn content(&self) -> String {
        match self {
            Span::Emphasis(t) | Span::Strong(t) | Span::Code(t) => t.content.clone(),
            Span::Link(l) | Span::Image(l) => {
                let mut s = String::with_capacity(l.text.len() + l.title.len() + l.url.len());
                s.push_str(&l.text);
                s.push_str(&l.title);
                s.push_str(&l.url);
                s
            }
        }
    }
}
