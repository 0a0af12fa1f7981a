use super::*;

#[test]
fn basic() {
    text(
        concat!(
            "My **document**.\n",
            "\n",
            "It's mine.\n",
            "\n",
            "> Yes.\n",
            "\n",
            "## Hi!\n",
            "\n",
            "Okay.\n"
        ),
        concat!("My document.\n", "It's mine.\n", "Yes.\n", "Hi!\n", "Okay."),
    );
}

#[test]
fn list_between_paragraphs() {
    text(
        concat!(
            "This is a list:\n",
            "\n",
            "*   item\n",
            "*   item\n",
            "*   item\n",
            "\n",
            "and this is a new paragraph."
        ),
        concat!(
            "This is a list:\n",
            "item\n",
            "item\n",
            "item\n",
            "and this is a new paragraph."
        ),
    );
}

#[test]
fn atx_headings() {
    text("## This is an H2", "This is an H2");
    text("#头部\n", "头部");
    text("### Closed ###\n", "Closed");
    text("# Title#\n", "Title");
    text("# C#\n", "C");
    text("## # Title # ##\n", "Title");
    text("#\n", "");
}

#[test]
fn setext_headings() {
    text("This is an H1\n=============", "This is an H1");
    text("一级头部\n======\n", "一级头部");
    text("Sub\n---\n\nBody\n", "Sub\nBody");
}

#[test]
fn heading_levels() {
    let levels = parse_document("# a\n## b\n###### f\n######## g\nx\n--\n")
        .filter_map(|block| match block {
            Block::Heading(heading) => Some(heading.level),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(levels, vec![1, 2, 6, 6, 2]);
}

#[test]
fn paragraphs() {
    text("一级头部\n", "一级头部");
    text("line one\nline two\n\nnext\n", "line one\nline two\nnext");
}

#[test]
fn thematic_breaks() {
    text("***", "");
    text("* * *", "");
    text("+++", "");
    text("+ + +\n", "");
    text("---\n\n- - -\n\n\n___\n", "\n\n");
    text("above\n\n* * *\n\nbelow", "above\n\nbelow");
}

#[test]
fn rule_is_not_a_list() {
    assert_eq!(block_kinds("* * *\n* item\n"), vec![Kind::Rule, Kind::List]);
    assert_eq!(block_kinds("***\n"), vec![Kind::Rule]);
    assert_eq!(block_kinds("+++\n+ item\n"), vec![Kind::Rule, Kind::List]);
    assert_eq!(block_kinds("* item\n"), vec![Kind::List]);
}

#[test]
fn empty_documents() {
    text("", "");
    text("\n\n", "");
    text("  \n\t\n", "");
    assert!(parse_document("").next().is_none());
}

#[test]
fn line_endings() {
    text("# a\r\nb\r\n", "a\nb");
    text("a\rb\r\rc", "a\nb\nc");
    text("\u{feff}# bom\n", "bom");
}

#[test]
fn invalid_utf8() {
    assert_eq!(
        bytes_to_text(b"caf\xe9 *au* lait", &Options::default()),
        "caf\u{fffd} au lait"
    );
}

#[test]
fn unicode_passes_through() {
    text("**粗体**和*斜体*", "粗体和斜体");
    text("> 引用 `代码`", "引用 代码");
}

#[test]
fn output_is_stable() {
    let input = concat!(
        "# Title\n",
        "\n",
        "Some *text* with a [link](http://example.com \"Example\").\n",
        "\n",
        "* one\n",
        "* two\n",
        "\n",
        "> quoted\n",
    );
    let once = markdown_to_text(input, &Options::default());
    let twice = markdown_to_text(&once, &Options::default());
    assert_eq!(
        once,
        "Title\nSome text with a linkExamplehttp://example.com.\none\ntwo\nquoted"
    );
    assert_eq!(once, twice);
}

#[test]
fn empty_blocks_collapse_on_a_second_pass() {
    let options = Options::default();

    let once = markdown_to_text("a\n\n***\n\nb", &options);
    assert_eq!(once, "a\n\nb");
    assert_eq!(markdown_to_text(&once, &options), "a\nb");

    let once = markdown_to_text("[id]: http://example.com\n\nsee [it][id]", &options);
    assert_eq!(once, "\nsee ithttp://example.com");
    assert_eq!(
        markdown_to_text(&once, &options),
        "see ithttp://example.com"
    );
}
