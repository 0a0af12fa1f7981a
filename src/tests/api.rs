use super::*;

#[test]
fn exercise_full_api() {
    let options = Options::default();
    let _: String = markdown_to_text("# a", &options);
    let _: String = bytes_to_text(b"# a", &options);

    let parser: Parser = parse_document("a");
    let blocks: Vec<Block> = parser.collect();
    let _: Kind = blocks[0].kind();
    let _: String = blocks[0].content();

    let mut refmap = RefMap::new();
    let _: String = blocks[0].render(&mut refmap);
    let _: String = render_inlines(b"*a*", &mut refmap);
    let _: bool = refmap.insert(
        "x",
        ResolvedReference {
            url: "u".to_string(),
            title: String::new(),
        },
    );
    let _: Option<&ResolvedReference> = refmap.lookup("X");

    let mut out = String::new();
    let _: std::fmt::Result = format_document(blocks, &options, &mut out);
    let _: String = assemble(vec![out]);

    let _ = Options {
        parse: Parse {
            reference_scope: ReferenceScope::Document,
        },
        render: Render {
            block_separator: "\n".to_string(),
        },
    };
}

#[cfg(feature = "bon")]
#[test]
fn builders() {
    let options = Options {
        parse: Parse::builder()
            .reference_scope(ReferenceScope::Block)
            .build(),
        render: Render::builder().block_separator(" | ".to_string()).build(),
    };
    assert_eq!(
        markdown_to_text("[r]: /u\n\n# One\n\nTwo [x][r]", &options),
        " | One | Two x"
    );

    let defaults = Render::builder().build();
    assert_eq!(defaults.block_separator, "\n");
}

#[test]
fn block_separator() {
    text_opts!(
        [render.block_separator = "\n\n".to_string()],
        "# Title\nBody text.\n",
        "Title\n\nBody text.",
    );
    text_opts!(
        [render.block_separator = String::new()],
        "a\n\nb\n\nc",
        "abc",
    );
}

#[test]
fn separator_applies_to_top_level_only() {
    text_opts!(
        [render.block_separator = " / ".to_string()],
        "* a\n* b\n\n> c\n>\n> d\n",
        "a\nb / c\nd",
    );
}

#[test]
fn assemble_joins_with_newlines() {
    let contents = parse_document("# a\n\nb\n\n---\n\nc").map(|block| block.content());
    assert_eq!(assemble(contents), "a\nb\n\nc");
}

#[test]
fn blocks_are_lazy() {
    let mut blocks = parse_document("# first\n\nsecond\n\nthird");
    assert_eq!(blocks.next().map(|b| b.content()), Some("first".to_string()));
    assert_eq!(blocks.next().map(|b| b.content()), Some("second".to_string()));
    assert_eq!(blocks.next().map(|b| b.content()), Some("third".to_string()));
    assert_eq!(blocks.next(), None);
    assert_eq!(blocks.next(), None);
}
