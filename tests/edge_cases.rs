use tagscript::{render, render_with_context, Error, RenderContext, RuntimeError};

// ── End-to-end rendering edge cases ──

#[test]
fn plain_text_template_no_tags() {
    assert_eq!(render("Hello, world!").unwrap(), "Hello, world!");
}

#[test]
fn empty_template_renders_nothing() {
    assert_eq!(render("").unwrap(), "");
}

#[test]
fn echo_with_no_variables_bound() {
    assert_eq!(render("Result: {$= 2 3 + $}").unwrap(), "Result: 5");
}

#[test]
fn loop_echoes_each_value() {
    assert_eq!(render("{$FOR i 1 3$}{$=i$}{$END$}").unwrap(), "123");
}

#[test]
fn surviving_values_are_written_in_order() {
    assert_eq!(render(r#"{$= "a" 1 2 + "b" $}"#).unwrap(), "a3b");
}

#[test]
fn mixed_arithmetic_promotes_to_double() {
    assert_eq!(render("{$= 10 13.0 + $}").unwrap(), "23.0");
    assert_eq!(render(r#"{$= "3.5" 2 * $}"#).unwrap(), "7.0");
    assert_eq!(render("{$= 7 2 / $}").unwrap(), "3");
}

#[test]
fn exponent_operator() {
    assert_eq!(render("{$= 2 8 ^ $}").unwrap(), "256");
    assert!(matches!(
        render("{$= 2 -1 ^ $}"),
        Err(Error::Runtime(RuntimeError::InvalidExponent(_)))
    ));
}

#[test]
fn escaped_text_renders_literally() {
    assert_eq!(render(r"a \{$= 1 $} b \\ c").unwrap(), r"a {$= 1 $} b \ c");
}

#[test]
fn string_escapes_render_as_characters() {
    assert_eq!(render(r#"{$= "line\nnext\t\"q\"" $}"#).unwrap(), "line\nnext\t\"q\"");
}

#[test]
fn nested_loops_multiply_table() {
    let template = "{$FOR i 1 3$}{$FOR j 1 3$}{$= i j * $} {$END$}\n{$END$}";
    assert_eq!(render(template).unwrap(), "1 2 3 \n2 4 6 \n3 6 9 \n");
}

#[test]
fn loop_bounds_may_come_from_strings_and_variables() {
    assert_eq!(
        render(r#"{$FOR n "1" "2"$}{$FOR m n "3"$}{$=m$}{$END$};{$END$}"#).unwrap(),
        "123;23;"
    );
}

#[test]
fn sine_and_decimal_format_compose() {
    assert_eq!(
        render(r#"{$= 30 @sin "0.000" @decfmt $}"#).unwrap(),
        "0.500"
    );
}

#[test]
fn dup_then_multiply_squares() {
    assert_eq!(render("{$FOR i 1 4$}{$= i @dup * $},{$END$}").unwrap(), "1,4,9,16,");
}

#[test]
fn params_fall_back_to_default() {
    let mut ctx = RenderContext::new();
    ctx.set_parameter("a", "4");
    let out = render_with_context(
        r#"{$= "a" "1" @paramGet "b" "2" @paramGet + $}"#,
        &mut ctx,
    )
    .unwrap();
    assert_eq!(out, "6");
}

#[test]
fn temporary_parameters_round_trip_within_render() {
    let mut ctx = RenderContext::new();
    let out = render_with_context(
        r#"{$= "x" "k" @tparamSet "k" "none" @tparamGet "k" @tparamDel "k" "gone" @tparamGet $}"#,
        &mut ctx,
    )
    .unwrap();
    assert_eq!(out, "xgone");
    assert_eq!(ctx.temporary_parameter("k"), None);
}

#[test]
fn set_mime_type_updates_context() {
    let mut ctx = RenderContext::new();
    assert_eq!(ctx.mime_type(), "text/html");
    render_with_context(r#"{$= "text/plain" @setMimeType $}"#, &mut ctx).unwrap();
    assert_eq!(ctx.mime_type(), "text/plain");
}

#[test]
fn text_that_is_not_a_number_fails() {
    assert_eq!(
        render(r#"{$= "abc" 1 + $}"#),
        Err(Error::Runtime(RuntimeError::NotANumber("abc".into())))
    );
}

#[test]
fn unknown_function_fails() {
    assert_eq!(
        render("{$= 1 @nope $}"),
        Err(Error::Runtime(RuntimeError::UnknownFunction("nope".into())))
    );
}

#[test]
fn unicode_text_passes_through() {
    assert_eq!(render("こんにちは {$= \"🌍\" $}").unwrap(), "こんにちは 🌍");
}
