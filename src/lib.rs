//! A Markdown to plain-text converter.
//!
//! Markdown markup is stripped and the text it carries is kept: headings,
//! paragraphs, list items and quotes come out as their text, emphasis and
//! code spans lose their delimiters, and links and images flatten to their
//! text followed by their title and URL.
//!
//! ```rust
//! use md2txt::{markdown_to_text, Options};
//!
//! assert_eq!(markdown_to_text("Hello, **世界**!", &Options::default()),
//!            "Hello, 世界!");
//! ```
//!
//! Blocks can also be inspected one at a time.
//!
//! ```rust
//! use md2txt::{parse_document, Block, Kind};
//!
//! for block in parse_document("# Hello\n\n> *quoted*\n") {
//!     match block {
//!         Block::Heading(ref heading) => assert_eq!(heading.level, 1),
//!         _ => assert_eq!(block.kind(), Kind::QuoteBlock),
//!     }
//!     assert!(!block.content().contains('*'));
//! }
//! ```

#![deny(
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod nodes;
mod parser;
mod scanner;
mod strings;
mod text;


pub use nodes::{Block, ElementType, Kind, ListItem, Span};
pub use parser::inlines::{render as render_inlines, RefMap, Subject};
pub use parser::options::{Options, Parse, ReferenceScope, Render};
pub use parser::{parse_document, Parser, ResolvedReference};
pub use text::{assemble, format_document};

/// Render Markdown to plain text.
///
/// See the documentation of the crate root for an example.
pub fn markdown_to_text(md: &str, options: &Options) -> String {
    bytes_to_text(md.as_bytes(), options)
}

/// Render possibly non-UTF-8 Markdown to plain text.  Invalid sequences
/// come out as U+FFFD.
pub fn bytes_to_text(md: &[u8], options: &Options) -> String {
    let mut out = String::new();
    let _ = format_document(Parser::from_bytes(md), options, &mut out);
    out
}
