//! The plain-text formatter.

use std::fmt::{self, Write};

use crate::nodes::Block;
use crate::parser::inlines::RefMap;
use crate::parser::{Options, ReferenceScope};

/// Formats a sequence of blocks as plain text into the given writer.
///
/// Each block contributes its rendered content, with
/// `options.render.block_separator` between consecutive blocks.  Nothing
/// is written after the last one.
pub fn format_document<I>(blocks: I, options: &Options, output: &mut dyn Write) -> fmt::Result
where
    I: IntoIterator<Item = Block>,
{
    TextFormatter::new(options, output).format(blocks)
}

/// Join already-rendered block texts with newlines.
///
/// ```rust
/// assert_eq!(md2txt::assemble(vec!["a".to_string(), "b".to_string()]), "a\nb");
/// assert_eq!(md2txt::assemble(Vec::<String>::new()), "");
/// ```
pub fn assemble<I>(contents: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let mut output = String::new();
    for (i, content) in contents.into_iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        output.push_str(&content);
    }
    output
}

struct TextFormatter<'o> {
    output: &'o mut dyn Write,
    options: &'o Options,
    refmap: RefMap,
    written: usize,
}

impl<'o> TextFormatter<'o> {
    fn new(options: &'o Options, output: &'o mut dyn Write) -> Self {
        TextFormatter {
            output,
            options,
            refmap: RefMap::new(),
            written: 0,
        }
    }

    fn format<I>(mut self, blocks: I) -> fmt::Result
    where
        I: IntoIterator<Item = Block>,
    {
        for block in blocks {
            self.format_block(&block)?;
        }
        log::debug!(
            "formatted {} blocks, {} references defined",
            self.written,
            self.refmap.len()
        );
        Ok(())
    }

    fn format_block(&mut self, block: &Block) -> fmt::Result {
        if self.written > 0 {
            self.output.write_str(&self.options.render.block_separator)?;
        }
        if self.options.parse.reference_scope == ReferenceScope::Block {
            self.refmap = RefMap::new();
        }

        let text = block.render(&mut self.refmap);
        log::trace!("{} block: {} bytes", block.kind(), text.len());
        self.output.write_str(&text)?;
        self.written += 1;
        Ok(())
    }
}
