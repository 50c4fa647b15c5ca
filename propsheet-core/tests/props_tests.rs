//! Integration tests for the props compiler
//!
//! These tests run whole inputs through the public API: regex round trips,
//! entry parsing and the JSON documents the compiler produces.

use propsheet_core::{Error, SyntaxErrorKind, VERSION_PATTERN, compile, entry, parse};
use serde_json::json;

fn check_common_expr(pattern: &str) {
    let expr = parse(pattern).unwrap_or_else(|e| panic!("{:?} failed: {}", pattern, e));
    assert_eq!(expr.to_regex_string(), pattern, "round trip of {:?}", pattern);
}

#[test]
fn test_cppref_examples() {
    let patterns = [
        "abc|def",
        "ab|abc",
        "((a)|(ab))((c)|(bc))",
        "",
        "abc|",
        "|abc",
        "a[a-z]{2,4}",
        "a[a-z]{2,4}?",
        "(aa|aabaac|ba|b|c)*",
        "^(a+)\\1*,\\1+$",
        "(z)((a+)?(b+)?(c))*",
        "a$",
        "o\\b",
        "(?=(a+))",
        "(?=(a+))a*b\\1",
        "(?=.*[[:lower:]])(?=.*[[:upper:]])(?=.*[[:punct:]]).{6,}",
    ];
    for pattern in patterns {
        check_common_expr(pattern);
    }
}

#[test]
fn test_whitespace_is_significant() {
    let patterns = [
        "   ",
        " |  |   ",
        " ((  )+ | (  )* | ( )){2,3} ",
        "\t\\t| ",
        "\\uaabb \\xbb",
        "( ( ) ( (|  (()| ( | | | |))) ))",
        " {2,} + * ? (?= | ) (?! | ) (?: ( | ) | )",
        "^$",
    ];
    for pattern in patterns {
        check_common_expr(pattern);
    }
}

#[test]
fn test_good_classes_and_escapes() {
    let patterns = [
        "[^a-z0-9-]",
        "[^-a-z@0-9$]",
        "a\\[\\[[^^\\[\\]]+",
        "\\cD\\cd[\\cd]",
        "\\D[^[:digit:]]\\w[_[:alnum:]]\\W[^_[:alnum:]]",
        "[^[=ru=]-[.cz.]abc]",
        "a{02,010}",
        "x{007}?",
        "a{4294967296}",
    ];
    for pattern in patterns {
        check_common_expr(pattern);
    }
}

#[test]
fn test_malformed_patterns() {
    let patterns = ["+", "{2,3}", "((())", "(?!", "\\ t", "\\ uaabb", "(?!))"];
    for pattern in patterns {
        assert!(
            matches!(parse(pattern), Err(Error::Syntax(_))),
            "{:?} should be rejected",
            pattern
        );
    }
}

#[test]
fn test_malformed_error_kinds() {
    let kind = |pattern: &str| match parse(pattern) {
        Err(Error::Syntax(e)) => e.kind,
        other => panic!("{:?} gave {:?}", pattern, other),
    };
    assert_eq!(kind("+"), SyntaxErrorKind::NothingToRepeat("+".to_string()));
    assert_eq!(kind("((())"), SyntaxErrorKind::UnterminatedGroup);
    assert_eq!(kind("(?!))"), SyntaxErrorKind::UnbalancedParen);
    assert_eq!(kind("\\ t"), SyntaxErrorKind::InvalidEscape);
}

#[test]
fn test_entry_count() {
    assert_eq!(entry::parse("").unwrap().len(), 0);
    assert_eq!(entry::parse("{}{}{}").unwrap().len(), 3);
    assert_eq!(entry::parse("{} manufacturer=\"{}\" {}").unwrap().len(), 2);
}

#[test]
fn test_propset() {
    let doc = compile("{ a: -1, b: \"test\", true: true, false: false }").unwrap();
    assert_eq!(
        doc.to_json_value().unwrap(),
        json!([{
            "props": { "a": -1, "b": "test", "true": true, "false": false },
            "selector": {}
        }])
    );
}

#[test]
fn test_exact() {
    let doc = compile("manufacturer = \"abc\", hwVersion = \"cdf\" { }").unwrap();
    assert_eq!(
        doc.to_json_value().unwrap(),
        json!([{
            "props": {},
            "selector": {
                "manufacturer": { "type": "exact", "value": "abc" },
                "hwVersion": { "type": "exact", "value": "cdf" }
            }
        }])
    );
}

#[test]
fn test_fuzzy() {
    let doc = compile("swVersion ~ /abc ()(?:())(?v >= 1)/ { }").unwrap();
    assert_eq!(
        doc.to_json_value().unwrap(),
        json!([{
            "props": {},
            "selector": {
                "swVersion": {
                    "type": "fuzzy",
                    "regex": format!("abc ()(?:()){}", VERSION_PATTERN),
                    "smatch": { "3": { "check": "version", ">=": "1" } }
                }
            }
        }])
    );
}

#[test]
fn test_multiple_version_groups() {
    let doc = compile(
        "fw ~ /(?v >= 1.2 < 2)-(rc|beta)?(?v = 7)/, vendor = \"acme\" { timeout: 30 }\n\
         {}",
    )
    .unwrap();
    assert_eq!(doc.len(), 2);
    assert_eq!(
        doc.to_json_value().unwrap()[0]["selector"]["fw"],
        json!({
            "type": "fuzzy",
            "regex": format!("{}-(rc|beta)?{}", VERSION_PATTERN, VERSION_PATTERN),
            "smatch": {
                "1": { "check": "version", ">=": "1.2", "<": "2" },
                "3": { "check": "version", "=": "7" }
            }
        })
    );
}

#[test]
fn test_fuzzy_regex_keeps_quantifier_text() {
    let doc = compile("v ~ /a{02}(?v>=1)/ {}").unwrap();
    assert_eq!(
        doc.to_json_value().unwrap()[0]["selector"]["v"]["regex"],
        json!(format!("a{{02}}{}", VERSION_PATTERN))
    );
}

#[test]
fn test_deep_nesting_is_a_syntax_error() {
    let pattern = format!("{}{}", "(".repeat(3000), ")".repeat(3000));
    assert!(matches!(
        parse(&pattern),
        Err(Error::Syntax(e)) if matches!(e.kind, SyntaxErrorKind::NestingTooDeep(_))
    ));
    let props = format!("{}{}", "{".repeat(50_000), "}".repeat(50_000));
    assert!(matches!(
        compile(&props),
        Err(Error::Syntax(e)) if matches!(e.kind, SyntaxErrorKind::NestingTooDeep(_))
    ));
}

#[test]
fn test_error_is_all_or_nothing() {
    let result = compile("a = \"x\" { }\nb ~ /[z-a]/ { }");
    let Err(Error::Syntax(error)) = result else {
        panic!("expected a syntax error, got {:?}", result);
    };
    let source = "a = \"x\" { }\nb ~ /[z-a]/ { }";
    assert_eq!(error.span.line_col(source), (2, 7));
}
