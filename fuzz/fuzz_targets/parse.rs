#![no_main]
use libfuzzer_sys::arbitrary::{self, Arbitrary};
use libfuzzer_sys::fuzz_target;
use md2txt::{format_document, parse_document, Block, Options, ReferenceScope};

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    block_scope: bool,
    separator: &'a str,
    markdown: &'a str,
}

fuzz_target!(|input: Input| {
    let mut options = Options::default();
    if input.block_scope {
        options.parse.reference_scope = ReferenceScope::Block;
    }
    options.render.block_separator = input.separator.to_string();

    let blocks = parse_document(input.markdown).collect::<Vec<Block>>();
    for block in &blocks {
        let _ = block.content();
    }

    let mut out = String::new();
    let _ = format_document(blocks, &options, &mut out);
});
