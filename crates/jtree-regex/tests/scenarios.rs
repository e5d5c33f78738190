use jtree_regex::{Regex, RegexError, regex_match};

#[test]
fn numeric_dotted_pattern_matches_substring() {
    let (ok, start, len, err) = regex_match(r"[0-9]+\.[0-9]+", "v=3.14");
    assert!(ok);
    assert_eq!(start, 2);
    assert_eq!(len, 4);
    assert!(err.is_none());
}

#[test]
fn alternation_is_rejected() {
    let (ok, _, _, err) = regex_match("a|b", "a");
    assert!(!ok);
    assert_eq!(err, Some(RegexError::BranchNotImplemented));
}

#[test]
fn every_match_also_matches_at_its_own_start() {
    let cases = [
        (r"[0-9]+\.[0-9]+", "v=3.14"),
        (r"[a-z]+", "123abc456"),
        (r"^abc", "abcdef"),
        (r"x$", "wxyzx"),
        (r"\d+", "a42b"),
        (r"a*b", "aaab"),
        (r"[^0-9]+", "12ab34"),
    ];
    for (pattern, text) in cases {
        let re = Regex::compile(pattern).expect("pattern compiles");
        if let Some(m) = re.find(text) {
            let slice = &text[m.start..m.start + m.len];
            let resliced = re.find(slice).expect("match re-finds in its own slice");
            assert_eq!(
                resliced.start, 0,
                "pattern {pattern:?} on slice {slice:?} should match at offset 0"
            );
        }
    }
}

#[test]
fn negated_class_inverts_after_caret() {
    let re = Regex::compile("[^0-9]+").unwrap();
    let m = re.find("12ab34").expect("matches the non-digit run");
    assert_eq!(m.start, 2);
    assert_eq!(m.len, 2);
}
