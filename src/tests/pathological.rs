use super::*;
use ntest::timeout;

#[test]
#[timeout(4000)]
fn pathological_emphases() {
    let n = 10_000;
    let input = "*a_ ".repeat(n);
    let output = markdown_to_text(&input, &Options::default());
    assert!(output.len() < input.len());
    assert!(!output.contains('*'));
}

#[test]
#[timeout(4000)]
fn pathological_unclosed_brackets() {
    let n = 20_000;
    let input = "[".repeat(n);
    assert_eq!(markdown_to_text(&input, &Options::default()), input);
}

#[test]
#[timeout(4000)]
fn pathological_nested_brackets() {
    let n = 5_000;
    let input = format!("{}a{}", "[".repeat(n), "]".repeat(n));
    assert_eq!(markdown_to_text(&input, &Options::default()), input);
}

#[test]
#[timeout(4000)]
fn pathological_backticks() {
    let n = 10_000;
    let input = "`a``".repeat(n);
    markdown_to_text(&input, &Options::default());
}

#[test]
#[timeout(4000)]
fn pathological_code_spans_on_one_line() {
    // An unmatched opener, then pairs of triple backticks, then another
    // unmatched opener.
    let n = 200_001;
    let input = "``a`".repeat(n);
    assert_eq!(
        markdown_to_text(&input, &Options::default()),
        format!("``{}`", "a".repeat(n))
    );
}

#[test]
#[timeout(4000)]
fn pathological_unmatched_backtick_runs() {
    let n = 2_000;
    let mut input = String::new();
    for _ in 0..n {
        for ticks in (1..=40).rev() {
            input.push_str(&"`".repeat(ticks));
            input.push('x');
        }
    }
    let output = markdown_to_text(&input, &Options::default());
    assert_eq!(output.matches('x').count(), n * 40);
}

#[test]
#[timeout(4000)]
fn pathological_spans_on_one_line() {
    let n = 100_000;
    let input = "*a* [b](c) ".repeat(n);
    let output = markdown_to_text(&input, &Options::default());
    assert_eq!(output, "a bc ".repeat(n));
}

#[test]
#[timeout(4000)]
fn pathological_many_list_items() {
    let n = 50_000;
    let input = "* a\n    b\n".repeat(n);
    let output = markdown_to_text(&input, &Options::default());
    assert_eq!(output.lines().count(), 2 * n);
}

#[test]
#[timeout(4000)]
fn pathological_quote_nesting() {
    let n = 10_000;
    let input = format!("{}deep", ">".repeat(n));
    let output = markdown_to_text(&input, &Options::default());
    assert!(output.ends_with("deep"));
}

#[test]
#[timeout(4000)]
fn pathological_list_nesting() {
    let n = 150;
    let mut input = String::new();
    for depth in 0..n {
        input.push_str(&"    ".repeat(depth));
        input.push_str("* x\n");
    }
    let output = markdown_to_text(&input, &Options::default());
    assert!(output.starts_with("x\nx\n"));
}

#[test]
#[timeout(4000)]
fn pathological_indented_list_lines() {
    let n = 10_000;
    let input = format!("* a\n{}", "    b\n".repeat(n));
    let output = markdown_to_text(&input, &Options::default());
    assert_eq!(output.lines().count(), n + 1);
}

#[test]
#[timeout(4000)]
fn pathological_reference_definitions() {
    let n = 2_000;
    let mut input = String::new();
    for i in 0..n {
        input.push_str(&format!("[{}]: /u{}\n", i, i));
    }
    input.push_str(&format!("\n[last][{}]", n - 1));
    assert_eq!(
        markdown_to_text(&input, &Options::default()),
        format!("\nlast/u{}", n - 1)
    );
}

#[test]
fn degenerate_inputs() {
    let cases = [
        ("*", "*"),
        ("**", "**"),
        ("_", "_"),
        ("`", "`"),
        ("[", "["),
        ("]", "]"),
        ("!", "!"),
        ("\\", "\\"),
        (">", ""),
        ("#", ""),
        ("1.", "1."),
        ("1. ", ""),
        ("* ", ""),
    ];
    for (input, expected) in cases {
        text(input, expected);
    }
}
