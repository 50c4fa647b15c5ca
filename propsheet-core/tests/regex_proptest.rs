//! Property-based tests for the regex dialect
//!
//! Patterns are generated together with their capture groups counted by
//! construction, so the parser and rewriter can be checked against an
//! independent numbering:
//! - Every generated pattern reprints exactly as written, counts included
//! - Version groups are numbered in the same sequence as plain groups
//! - The rewritten pattern is itself a valid pattern with no version groups

use proptest::prelude::*;
use propsheet_core::{parse, rewrite_pattern};

/// A generated pattern fragment
#[derive(Debug, Clone)]
struct Fragment {
    text: String,
    /// Capturing groups in the fragment, version groups included
    groups: u32,
    /// Numbers of the version groups, counted from the fragment's start
    versions: Vec<u32>,
    quantifiable: bool,
}

impl Fragment {
    fn atom(text: impl Into<String>) -> Self {
        Fragment {
            text: text.into(),
            groups: 0,
            versions: Vec::new(),
            quantifiable: true,
        }
    }

    /// Join fragments with `separator`, renumbering each part's version
    /// groups after the groups to its left
    fn join(parts: &[Fragment], separator: &str) -> Self {
        let mut groups = 0;
        let mut versions = Vec::new();
        for part in parts {
            versions.extend(part.versions.iter().map(|v| v + groups));
            groups += part.groups;
        }
        Fragment {
            text: parts
                .iter()
                .map(|p| p.text.as_str())
                .collect::<Vec<_>>()
                .join(separator),
            groups,
            versions,
            quantifiable: false,
        }
    }
}

/// Generate a single version assertion such as `>= 1.2`
fn assertion_strategy() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just(">="), Just(">"), Just("<="), Just("<"), Just("=")],
        " ?",
        "[0-9]{1,3}(\\.[0-9]{1,3}){0,2}",
    )
        .prop_map(|(cmp, ws, version)| format!("{}{}{}", cmp, ws, version))
}

/// Generate a `(?v ...)` group
fn version_group_strategy() -> impl Strategy<Value = Fragment> {
    (
        " {0,2}",
        prop::collection::vec(assertion_strategy(), 1..4),
        " {0,2}",
    )
        .prop_map(|(lead, assertions, trail)| Fragment {
            text: format!("(?v{}{}{})", lead, assertions.join(" "), trail),
            groups: 1,
            versions: vec![1],
            quantifiable: true,
        })
}

/// Generate leaf atoms
fn leaf_strategy() -> impl Strategy<Value = Fragment> {
    prop_oneof![
        // Plain characters, including whitespace
        "[a-z0-9 ,-]".prop_map(Fragment::atom),
        // Escapes
        prop_oneof![Just("\\d"), Just("\\."), Just("\\x41"), Just("\\cM")].prop_map(Fragment::atom),
        Just(Fragment::atom(".")),
        // Character classes
        prop_oneof![
            Just("[a-f0-9]"),
            Just("[^[:digit:]-]"),
            Just("[.\\]]"),
            Just("[^^]"),
            Just("[(]")
        ]
        .prop_map(Fragment::atom),
        // Assertions cannot be quantified
        prop_oneof![Just("^"), Just("$"), Just("\\b"), Just("\\B")].prop_map(|s| Fragment {
            quantifiable: false,
            ..Fragment::atom(s)
        }),
        version_group_strategy(),
    ]
}

/// Generate a count, sometimes written with leading zeros
fn bound_strategy() -> impl Strategy<Value = (u32, String)> {
    (0u32..12, 0usize..3).prop_map(|(n, zeros)| (n, format!("{}{}", "0".repeat(zeros), n)))
}

/// Generate quantifiers, counts written as they would appear in source
fn quantifier_strategy() -> impl Strategy<Value = String> {
    (
        prop_oneof![
            Just("*".to_string()),
            Just("+".to_string()),
            Just("?".to_string()),
            bound_strategy().prop_map(|(_, n)| format!("{{{}}}", n)),
            bound_strategy().prop_map(|(_, n)| format!("{{{},}}", n)),
            (bound_strategy(), bound_strategy()).prop_map(|((a, a_text), (b, b_text))| {
                if a <= b {
                    format!("{{{},{}}}", a_text, b_text)
                } else {
                    format!("{{{},{}}}", b_text, a_text)
                }
            }),
        ],
        any::<bool>(),
    )
        .prop_map(|(q, lazy)| if lazy { q + "?" } else { q })
}

/// Generate whole patterns
fn pattern_strategy() -> impl Strategy<Value = Fragment> {
    leaf_strategy().prop_recursive(4, 48, 4, |inner| {
        prop_oneof![
            // Concatenation
            prop::collection::vec(inner.clone(), 0..4).prop_map(|parts| Fragment::join(&parts, "")),
            // Alternation
            prop::collection::vec(inner.clone(), 2..4)
                .prop_map(|parts| Fragment::join(&parts, "|")),
            // Groups
            (
                inner.clone(),
                prop_oneof![Just("("), Just("(?:"), Just("(?="), Just("(?!"), Just("(?<=")]
            )
                .prop_map(|(body, opener)| {
                    let capturing = opener == "(";
                    let offset = u32::from(capturing);
                    Fragment {
                        text: format!("{}{})", opener, body.text),
                        groups: body.groups + offset,
                        versions: body.versions.iter().map(|v| v + offset).collect(),
                        quantifiable: capturing || opener == "(?:",
                    }
                }),
            // Quantified atoms
            (inner, quantifier_strategy()).prop_map(|(mut fragment, quantifier)| {
                if fragment.quantifiable {
                    fragment.text.push_str(&quantifier);
                    fragment.quantifiable = false;
                }
                fragment
            }),
        ]
    })
}

#[cfg(test)]
mod proptest_tests {
    use super::*;

    proptest! {
        #[test]
        fn test_pattern_round_trip(fragment in pattern_strategy()) {
            let result = parse(&fragment.text);
            prop_assert!(result.is_ok(), "Failed to parse: {:?}", fragment.text);

            if let Ok(expr) = result {
                prop_assert_eq!(expr.to_regex_string(), fragment.text);
            }
        }

        #[test]
        fn test_version_groups_numbered_in_order(fragment in pattern_strategy()) {
            let rewrite = rewrite_pattern(&fragment.text);
            prop_assert!(rewrite.is_ok(), "Failed to rewrite: {:?}", fragment.text);

            if let Ok(rewrite) = rewrite {
                let keys: Vec<u32> = rewrite.assertions.keys().copied().collect();
                prop_assert_eq!(keys, fragment.versions);
                prop_assert_eq!(rewrite.groups.group_count(), fragment.groups as usize);
                prop_assert!(!rewrite.pattern.contains("(?v"));
            }
        }

        #[test]
        fn test_rewritten_pattern_reparses(fragment in pattern_strategy()) {
            let rewrite = rewrite_pattern(&fragment.text);
            prop_assert!(rewrite.is_ok(), "Failed to rewrite: {:?}", fragment.text);

            if let Ok(rewrite) = rewrite {
                let reparsed = rewrite_pattern(&rewrite.pattern);
                prop_assert!(reparsed.is_ok(), "Failed to reparse: {:?}", rewrite.pattern);

                if let Ok(reparsed) = reparsed {
                    prop_assert_eq!(&reparsed.pattern, &rewrite.pattern);
                    prop_assert_eq!(reparsed.groups.group_count(), fragment.groups as usize);
                    prop_assert!(reparsed.assertions.is_empty());
                }
            }
        }
    }
}

#[cfg(test)]
mod specific_tests {
    use super::*;

    #[test]
    fn test_join_renumbers_versions() {
        let plain = Fragment {
            text: "(a)".to_string(),
            groups: 1,
            versions: Vec::new(),
            quantifiable: true,
        };
        let version = Fragment {
            text: "(?v>1)".to_string(),
            groups: 1,
            versions: vec![1],
            quantifiable: true,
        };
        let joined = Fragment::join(&[plain.clone(), version.clone(), plain, version], "|");
        assert_eq!(joined.text, "(a)|(?v>1)|(a)|(?v>1)");
        assert_eq!(joined.versions, vec![2, 4]);
        let rewrite = rewrite_pattern(&joined.text).unwrap();
        assert_eq!(
            rewrite.assertions.keys().copied().collect::<Vec<_>>(),
            joined.versions
        );
    }

    #[test]
    fn test_version_pattern_is_one_group() {
        let rewrite = rewrite_pattern("(?v>=1)").unwrap();
        let reparsed = rewrite_pattern(&rewrite.pattern).unwrap();
        assert_eq!(reparsed.groups.group_count(), 1);
        assert!(reparsed.assertions.is_empty());
    }

    #[test]
    fn test_leading_zero_counts_round_trip() {
        for pattern in ["a{02,010}", "x{007}?", "(?v=1){00,}"] {
            assert_eq!(parse(pattern).unwrap().to_regex_string(), pattern);
        }
    }
}
