use super::*;
use proptest::prelude::*;

#[test]
fn script_tags_become_text() {
    assert_eq!(
        make_safe("<script>evil</script>"),
        "&lt;script&gt;evil&lt;/script&gt;"
    );
    assert_eq!(
        make_safe("<SCRIPT src=x>"),
        "&lt;SCRIPT src=x&gt;"
    );
}

#[test]
fn device_log_markers_are_literal() {
    assert_eq!(
        make_safe("crash in <file.mm : 48592>"),
        "crash in &lt;file.mm : 48592&gt;"
    );
    assert_eq!(make_safe("1 < 2 > 0"), "1 &lt; 2 &gt; 0");
}

#[test]
fn safelisted_tags_survive() {
    assert_eq!(make_safe("<b>bold</b> text"), "<b>bold</b> text");
    assert_eq!(make_safe("a<br/>b<BR>c"), "a<br>b<br>c");
    assert_eq!(
        make_safe("<span class=\"warn\" onclick=\"x()\">w</span>"),
        "<span class=\"warn\">w</span>"
    );
    assert_eq!(make_safe("<pre style='x'>p</pre>"), "<pre>p</pre>");
}

#[test]
fn links_keep_only_safe_schemes() {
    assert_eq!(
        make_safe("<a href=\"https://example.com/?a=1&b=2\">x</a>"),
        "<a href=\"https://example.com/?a=1&amp;b=2\">x</a>"
    );
    assert_eq!(
        make_safe("<a href=\"javascript:alert(1)\">x</a>"),
        "<a>x</a>"
    );
    assert_eq!(
        make_safe("<a href=\"java\tscript:alert(1)\">x</a>"),
        "<a>x</a>"
    );
    assert_eq!(
        make_safe("<a href='/logs/c1'>x</a>"),
        "<a href=\"/logs/c1\">x</a>"
    );
}

#[test]
fn encoded_schemes_are_judged_after_decoding() {
    for href in [
        "javascript&#58;alert(1)",
        "javascript&colon;alert(1)",
        "&#x6A;avascript:alert(1)",
        "&#106;avascript&#x3A;alert(1)",
        "java&Tab;script&colon;alert(1)",
    ] {
        assert_eq!(make_safe(&format!("<a href=\"{href}\">x</a>")), "<a>x</a>", "{href}");
    }
    assert_eq!(
        make_safe("<a href=\"https&#58;//example.com\">x</a>"),
        "<a href=\"https://example.com\">x</a>"
    );
}

#[test]
fn attribute_values_carry_no_live_references() {
    assert_eq!(
        make_safe("<a href=\"/q?a=1&amp;b=2\">x</a>"),
        "<a href=\"/q?a=1&amp;b=2\">x</a>"
    );
    // Without a semicolon a browser would still decode `&#58`.
    assert_eq!(
        make_safe("<a href=\"javascript&#58alert(1)\">x</a>"),
        "<a href=\"javascript&amp;#58alert(1)\">x</a>"
    );
    assert_eq!(
        make_safe("<span class=\"a&quot; onclick=&quot;x\">s</span>"),
        "<span class=\"a&quot; onclick=&quot;x\">s</span>"
    );
}

#[test]
fn tags_are_balanced() {
    assert_eq!(make_safe("<b>open"), "<b>open</b>");
    assert_eq!(make_safe("stray</i> close"), "stray close");
    assert_eq!(make_safe("<b><i>x</b>"), "<b><i>x</i></b>");
}

#[test]
fn ampersands_are_escaped_unless_entities() {
    assert_eq!(make_safe("fish & chips"), "fish &amp; chips");
    assert_eq!(make_safe("&lt;kept&gt; &#39; &#x41;"), "&lt;kept&gt; &#39; &#x41;");
}

#[test]
fn plain_text_is_unchanged() {
    let line = "00/00 12:00:01  [Log] player spawned at (1, 2)\nsecond line";
    assert_eq!(make_safe(line), line);
}

fn every_href_is_safe(output: &str) -> bool {
    let href = Regex::new(r#"href="([^"]*)""#).expect("href pattern");
    href.captures_iter(output)
        .all(|caps| is_safe_href(&decode_references(&caps[1])))
}

fn every_tag_is_safelisted(output: &str) -> bool {
    let opener = Regex::new(r"<(/?)([a-z0-9]+)").expect("opener pattern");
    let lt_count = output.matches('<').count();
    let tag_count = opener
        .captures_iter(output)
        .filter(|caps| ALLOWED_TAGS.contains(&&caps[2]))
        .count();
    lt_count == tag_count
}

proptest! {
    #[test]
    fn sanitized_output_never_contains_foreign_markup(input in ".{0,200}") {
        let output = make_safe(&input);
        prop_assert!(!output.to_ascii_lowercase().contains("<script"));
        prop_assert!(every_tag_is_safelisted(&output));
    }

    #[test]
    fn sanitized_markup_fragments_are_stable(
        parts in proptest::collection::vec(
            prop_oneof![
                Just("<script>".to_string()),
                Just("</script>".to_string()),
                Just("<b>".to_string()),
                Just("</b>".to_string()),
                Just("<span class=\"x\">".to_string()),
                Just("<a href=\"javascript:x\">".to_string()),
                Just("<a href=\"javascript&#58;x\">".to_string()),
                Just("<a href=\"&#x6A;avascript&colon;x\">".to_string()),
                Just("<a href=\"/ok?a&amp;b\">".to_string()),
                Just("<file.mm : 1>".to_string()),
                Just("&".to_string()),
                "[a-z ]{0,8}",
            ],
            0..12,
        )
    ) {
        let input = parts.concat();
        let output = make_safe(&input);
        prop_assert!(!output.contains("<script"));
        prop_assert!(!output.contains("javascript:"));
        prop_assert!(every_href_is_safe(&output));
        prop_assert!(every_tag_is_safelisted(&output));
    }
}
