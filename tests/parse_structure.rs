use rstest::rstest;
use tagscript::{parse, Element, Node, ParseError};

#[rstest]
#[case::three_args("{$ FOR x 1 10 $}...{$END$}")]
#[case::four_args("{$ FOR x 1 2 10 $}...{$END$}")]
#[case::string_bounds(r#"{$ FOR x "1" "10" $}{$END$}"#)]
#[case::variable_bounds("{$ FOR x 1 3 $}{$ FOR y x 3 $}{$END$}{$END$}")]
#[case::lowercase_keywords("{$for x 1 2$}{$end$}")]
#[case::empty_echo("{$=$}")]
fn well_formed_documents_parse(#[case] source: &str) {
    assert!(parse(source).is_ok(), "failed to parse {source:?}");
}

#[rstest]
#[case::too_few("{$ FOR x 1 $}{$END$}", ParseError::ForArity(2))]
#[case::too_many("{$ FOR x 1 2 3 4 $}{$END$}", ParseError::ForArity(5))]
#[case::no_args("{$ FOR $}{$END$}", ParseError::ForArity(0))]
#[case::unclosed("{$ FOR x 1 10 $}", ParseError::Unclosed(1))]
#[case::two_unclosed("{$ FOR x 1 10 $}{$ FOR y 1 10 $}{$END$}{$ FOR z 1 2 $}", ParseError::Unclosed(2))]
#[case::lone_end("{$END$}", ParseError::NothingToEnd)]
#[case::extra_end("{$FOR i 1 2$}{$END$}{$END$}", ParseError::NothingToEnd)]
#[case::unterminated_tag("text {$= 1 2", ParseError::UnterminatedTag)]
#[case::empty_tag("{$ $}", ParseError::UnknownTag("`$}`".into()))]
#[case::unknown_keyword("{$ IF x $}", ParseError::UnknownTag("variable `IF`".into()))]
fn malformed_structure_is_rejected(#[case] source: &str, #[case] expected: ParseError) {
    assert_eq!(parse(source), Err(expected));
}

#[test]
fn function_is_not_a_for_bound() {
    assert_eq!(
        parse("{$ FOR x @sin 10 $}{$END$}"),
        Err(ParseError::InvalidElement {
            tag: "FOR",
            kind: "function",
            text: "@sin".into(),
        })
    );
}

#[test]
fn operator_is_not_a_for_bound() {
    assert!(matches!(
        parse("{$ FOR x 1 + $}{$END$}"),
        Err(ParseError::InvalidElement { kind: "operator", .. })
    ));
}

#[test]
fn keywords_are_not_echo_elements() {
    assert!(matches!(
        parse("{$= 1 END $}"),
        Err(ParseError::UnexpectedToken { tag: "=", .. })
    ));
}

#[test]
fn text_between_tags_keeps_order() {
    let doc = parse("a{$= 1 $}b{$FOR i 1 1$}c{$END$}d").unwrap();
    let shape: Vec<&str> = doc
        .children
        .iter()
        .map(|node| match node {
            Node::Text(_) => "text",
            Node::Echo(_) => "echo",
            Node::ForLoop(_) => "for",
        })
        .collect();
    assert_eq!(shape, ["text", "echo", "text", "for", "text"]);
}

#[test]
fn for_string_bound_keeps_resolved_text() {
    let doc = parse(r#"{$ FOR x "a\"b" 3 $}{$END$}"#).unwrap();
    let Node::ForLoop(node) = &doc.children[0] else {
        panic!("expected FOR");
    };
    assert_eq!(node.start, Element::String("a\"b".into()));
}
