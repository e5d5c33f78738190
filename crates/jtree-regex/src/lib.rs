//! A small, hand-rolled Pike-style backtracking matcher.
//!
//! No pack example repo ships its own regex engine (the teacher links
//! against the `regex` crate), so this module is grounded directly on
//! `original_source/DrJson/TUI/dre.c`/`dre.h` — the C implementation
//! spec.md §4.6's grammar, error codes, and match algorithm were
//! distilled from. `dre_match_start_only`'s one-node-at-a-time loop with
//! a one-character lookahead for `*`/`+`/`?` is `match_seq`/`match_atom`
//! here; `dre_try_matchcharset`/`dre_try_matchone` is `class_matches`/
//! `match_atom`'s `Atom::Class` arm; `|` unconditionally erroring as
//! `RE_ERROR_BRANCH_NOT_IMPLEMENTED` (`dre_match_start_only`, the
//! `current_c == '|'` check) is `RegexError::BranchNotImplemented` here.
//! `dre.h`'s doc comment calls `[^abc]` "currently broken" but
//! `dre_flip_try_match_result` actually inverts correctly — the tested
//! behavior, not the doc comment, is spec.md §9's resolved Open Question
//! and what `Atom::Class { negated, .. }` implements.
//!
//! Matching operates on bytes, not `char`s, per the `.` rule ("any byte
//! except newline"): multi-byte UTF-8 sequences are matched byte-by-byte,
//! which is sufficient for the literal/class/anchor grammar this engine
//! supports.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RegexError {
    #[error("pattern ends with a backslash")]
    EndsWithBackslash,
    #[error("missing right square bracket")]
    MissingRightSquareBracket,
    #[error("bad escape sequence")]
    BadEscape,
    #[error("branching (|) is not implemented")]
    BranchNotImplemented,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClassItem {
    Byte(u8),
    Range(u8, u8),
    Digit,
    NonDigit,
    Word,
    NonWord,
    Space,
    NonSpace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Atom {
    Literal(u8),
    AnyByte,
    Class { items: Vec<ClassItem>, negated: bool },
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quant {
    One,
    Star,
    Plus,
    Question,
}

#[derive(Debug, Clone)]
struct Node {
    atom: Atom,
    quant: Quant,
}

/// A compiled pattern, ready to be matched against any number of texts.
#[derive(Debug, Clone)]
pub struct Regex {
    nodes: Vec<Node>,
}

/// The result of a successful match: byte offset and byte length within
/// the searched text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan {
    pub start: usize,
    pub len: usize,
}

impl Regex {
    pub fn compile(pattern: &str) -> Result<Self, RegexError> {
        let nodes = parse(pattern)?;
        Ok(Self { nodes })
    }

    /// Search `text` for the leftmost match. If the pattern is anchored
    /// at the start (`^` in leading position) only position zero is
    /// tried.
    pub fn find(&self, text: &str) -> Option<MatchSpan> {
        let bytes = text.as_bytes();
        let anchored_start = matches!(self.nodes.first(), Some(n) if n.atom == Atom::Start);
        let mut start = 0;
        loop {
            if let Some(end) = match_seq(&self.nodes, 0, bytes, start) {
                return Some(MatchSpan {
                    start,
                    len: end - start,
                });
            }
            if anchored_start || start >= bytes.len() {
                return None;
            }
            start += 1;
        }
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.find(text).is_some()
    }
}

/// Contract helper mirroring spec.md §4.6's `match(pattern, text)`
/// signature directly: compiles the pattern fresh every call.
pub fn regex_match(
    pattern: &str,
    text: &str,
) -> (bool, usize, usize, Option<RegexError>) {
    match Regex::compile(pattern) {
        Err(e) => (false, 0, 0, Some(e)),
        Ok(re) => match re.find(text) {
            Some(m) => (true, m.start, m.len, None),
            None => (false, 0, 0, None),
        },
    }
}

fn match_seq(nodes: &[Node], ni: usize, text: &[u8], ti: usize) -> Option<usize> {
    let Some(node) = nodes.get(ni) else {
        return Some(ti);
    };
    match node.quant {
        Quant::One => {
            let next = match_atom(&node.atom, text, ti)?;
            match_seq(nodes, ni + 1, text, next)
        }
        Quant::Question => {
            if let Some(next) = match_atom(&node.atom, text, ti) {
                if let Some(r) = match_seq(nodes, ni + 1, text, next) {
                    return Some(r);
                }
            }
            match_seq(nodes, ni + 1, text, ti)
        }
        Quant::Star | Quant::Plus => {
            let min_reps = if node.quant == Quant::Plus { 1 } else { 0 };
            let mut positions = vec![ti];
            let mut cur = ti;
            while let Some(next) = match_atom(&node.atom, text, cur) {
                if next == cur {
                    break;
                }
                positions.push(next);
                cur = next;
            }
            for k in (min_reps..positions.len()).rev() {
                if let Some(r) = match_seq(nodes, ni + 1, text, positions[k]) {
                    return Some(r);
                }
            }
            None
        }
    }
}

fn match_atom(atom: &Atom, text: &[u8], ti: usize) -> Option<usize> {
    match atom {
        Atom::Literal(b) => {
            if ti < text.len() && text[ti] == *b {
                Some(ti + 1)
            } else {
                None
            }
        }
        Atom::AnyByte => {
            if ti < text.len() && text[ti] != b'\n' {
                Some(ti + 1)
            } else {
                None
            }
        }
        Atom::Class { items, negated } => {
            if ti < text.len() && class_matches(items, text[ti]) != *negated {
                Some(ti + 1)
            } else {
                None
            }
        }
        Atom::Start => (ti == 0).then_some(ti),
        Atom::End => (ti == text.len()).then_some(ti),
    }
}

fn class_matches(items: &[ClassItem], b: u8) -> bool {
    items.iter().any(|item| match item {
        ClassItem::Byte(c) => *c == b,
        ClassItem::Range(lo, hi) => *lo <= b && b <= *hi,
        ClassItem::Digit => b.is_ascii_digit(),
        ClassItem::NonDigit => !b.is_ascii_digit(),
        ClassItem::Word => b.is_ascii_alphanumeric() || b == b'_',
        ClassItem::NonWord => !(b.is_ascii_alphanumeric() || b == b'_'),
        ClassItem::Space => b.is_ascii_whitespace(),
        ClassItem::NonSpace => !b.is_ascii_whitespace(),
    })
}

fn parse(pattern: &str) -> Result<Vec<Node>, RegexError> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut nodes = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let atom = match c {
            '|' => return Err(RegexError::BranchNotImplemented),
            '^' if i == 0 => {
                i += 1;
                nodes.push(Node {
                    atom: Atom::Start,
                    quant: Quant::One,
                });
                continue;
            }
            '$' if i == chars.len() - 1 => {
                i += 1;
                nodes.push(Node {
                    atom: Atom::End,
                    quant: Quant::One,
                });
                continue;
            }
            '.' => {
                i += 1;
                Atom::AnyByte
            }
            '[' => {
                let (atom, consumed) = parse_class(&chars[i..])?;
                i += consumed;
                atom
            }
            '\\' => {
                if i + 1 >= chars.len() {
                    return Err(RegexError::EndsWithBackslash);
                }
                let atom = escape_atom(chars[i + 1])?;
                i += 2;
                atom
            }
            '*' | '+' | '?' => return Err(RegexError::BadEscape),
            other => {
                i += 1;
                // Non-ASCII chars are several bytes in the text being
                // matched; emit one literal node per byte so `cat\u{e9}`
                // actually matches the UTF-8 encoding of `caf\u{e9}`
                // rather than the char's truncated low byte. Only the
                // last byte's node carries the trailing quantifier, if
                // any — this engine has no notion of quantifying a
                // multi-byte unit as a whole.
                let bytes = char_utf8_bytes(other);
                for &byte in &bytes[..bytes.len() - 1] {
                    nodes.push(Node { atom: Atom::Literal(byte), quant: Quant::One });
                }
                Atom::Literal(bytes[bytes.len() - 1])
            }
        };
        let quant = if i < chars.len() {
            match chars[i] {
                '*' => {
                    i += 1;
                    Quant::Star
                }
                '+' => {
                    i += 1;
                    Quant::Plus
                }
                '?' => {
                    i += 1;
                    Quant::Question
                }
                _ => Quant::One,
            }
        } else {
            Quant::One
        };
        nodes.push(Node { atom, quant });
    }
    Ok(nodes)
}

/// `c`'s UTF-8 encoding as owned bytes, ASCII chars included (a 1-byte
/// vec equal to `c as u8`).
fn char_utf8_bytes(c: char) -> Vec<u8> {
    let mut buf = [0u8; 4];
    c.encode_utf8(&mut buf).as_bytes().to_vec()
}

fn escape_atom(c: char) -> Result<Atom, RegexError> {
    Ok(match c {
        'd' => Atom::Class {
            items: vec![ClassItem::Digit],
            negated: false,
        },
        'D' => Atom::Class {
            items: vec![ClassItem::Digit],
            negated: true,
        },
        'w' => Atom::Class {
            items: vec![ClassItem::Word],
            negated: false,
        },
        'W' => Atom::Class {
            items: vec![ClassItem::Word],
            negated: true,
        },
        's' => Atom::Class {
            items: vec![ClassItem::Space],
            negated: false,
        },
        'S' => Atom::Class {
            items: vec![ClassItem::Space],
            negated: true,
        },
        't' => Atom::Literal(b'\t'),
        'n' => Atom::Literal(b'\n'),
        '\\' | '.' | '*' | '+' | '?' | '^' | '$' | '(' | ')' | '[' | ']' | '{' | '}' | '-'
        | '|' => Atom::Literal(c as u8),
        _ => return Err(RegexError::BadEscape),
    })
}

/// Parse a `[...]` class starting at `chars[0] == '['`. Returns the atom
/// and the number of `char`s consumed (including both brackets).
fn parse_class(chars: &[char]) -> Result<(Atom, usize), RegexError> {
    let mut i = 1;
    let negated = chars.get(i) == Some(&'^');
    if negated {
        i += 1;
    }
    let mut items = Vec::new();
    let start_of_items = i;
    loop {
        match chars.get(i) {
            None => return Err(RegexError::MissingRightSquareBracket),
            Some(']') if i > start_of_items => {
                i += 1;
                break;
            }
            Some('\\') => {
                let Some(&next) = chars.get(i + 1) else {
                    return Err(RegexError::EndsWithBackslash);
                };
                match escape_atom(next)? {
                    Atom::Literal(b) => items.push(ClassItem::Byte(b)),
                    Atom::Class { items: mut cs, negated: false } => items.append(&mut cs),
                    Atom::Class { negated: true, .. } => {
                        // A negated meta-class can't be folded into this
                        // class's own possible negation without double
                        // negation semantics; reject rather than guess.
                        return Err(RegexError::BadEscape);
                    }
                    _ => return Err(RegexError::BadEscape),
                }
                i += 2;
            }
            Some(&c) => {
                // range: c '-' d, with '-' literal at the edges. A byte
                // range only makes sense for single-byte (ASCII) edges;
                // a non-ASCII edge falls through to the literal-bytes
                // handling below instead of truncating to a low byte.
                if let (Some(&'-'), Some(&d)) = (chars.get(i + 1), chars.get(i + 2)) {
                    if d != ']' && c.is_ascii() && d.is_ascii() {
                        items.push(ClassItem::Range(c as u8, d as u8));
                        i += 3;
                        continue;
                    }
                }
                for byte in char_utf8_bytes(c) {
                    items.push(ClassItem::Byte(byte));
                }
                i += 1;
            }
        }
    }
    Ok((Atom::Class { items, negated }, i))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(pattern: &str, text: &str) -> Option<MatchSpan> {
        Regex::compile(pattern).unwrap().find(text)
    }

    #[test]
    fn literal_substring() {
        assert_eq!(find("cat", "concatenate"), Some(MatchSpan { start: 2, len: 3 }));
    }

    #[test]
    fn non_ascii_literal_matches_its_own_utf8_bytes() {
        let m = find("caf\u{e9}", "un caf\u{e9} chaud").expect("matches the accented word");
        assert_eq!(&"un caf\u{e9} chaud"[m.start..m.start + m.len], "caf\u{e9}");
    }

    #[test]
    fn non_ascii_char_in_class_matches_its_utf8_bytes() {
        assert!(find("[\u{e9}\u{e8}]", "caf\u{e9}").is_some());
        assert!(find("^[\u{e9}\u{e8}]$", "x").is_none());
    }

    #[test]
    fn dot_matches_any_byte_but_newline() {
        assert!(find("a.c", "abc").is_some());
        assert!(find("a.c", "a\nc").is_none());
    }

    #[test]
    fn anchors() {
        assert!(find("^abc", "abc").is_some());
        assert!(find("^abc", "xabc").is_none());
        assert!(find("abc$", "xabc").is_some());
        assert!(find("abc$", "abcx").is_none());
    }

    #[test]
    fn leading_caret_mid_pattern_is_literal() {
        assert!(find("a^b", "a^b").is_some());
    }

    #[test]
    fn quantifiers() {
        assert_eq!(find("ab*c", "ac"), Some(MatchSpan { start: 0, len: 2 }));
        assert_eq!(find("ab*c", "abbbc"), Some(MatchSpan { start: 0, len: 5 }));
        assert!(find("ab+c", "ac").is_none());
        assert!(find("ab?c", "abc").is_some());
        assert!(find("ab?c", "ac").is_some());
    }

    #[test]
    fn greedy_then_backtrack() {
        // `a.*c` must backtrack off the greedy `.*` to find the final `c`.
        assert_eq!(find("a.*c", "axxxcxxxc"), Some(MatchSpan { start: 0, len: 9 }));
    }

    #[test]
    fn character_classes() {
        assert!(find("[abc]", "b").is_some());
        assert!(find("[^abc]", "b").is_none());
        assert!(find("[^abc]", "z").is_some());
        assert!(find("[a-z]+", "Hello").is_some());
    }

    #[test]
    fn dash_at_edges_is_literal() {
        assert!(find("[a-]", "-").is_some());
        assert!(find("[-a]", "-").is_some());
    }

    #[test]
    fn digit_and_word_shorthand() {
        assert!(find(r"\d+", "42").is_some());
        assert!(find(r"\D", "4").is_none());
        assert!(find(r"\w+", "foo_1").is_some());
    }

    #[test]
    fn trailing_backslash_is_error() {
        assert_eq!(Regex::compile("abc\\").unwrap_err(), RegexError::EndsWithBackslash);
    }

    #[test]
    fn unknown_escape_is_error() {
        assert_eq!(Regex::compile(r"\q").unwrap_err(), RegexError::BadEscape);
    }

    #[test]
    fn unterminated_class_is_error() {
        assert_eq!(
            Regex::compile("[abc").unwrap_err(),
            RegexError::MissingRightSquareBracket
        );
    }

    #[test]
    fn branch_is_explicit_error() {
        assert_eq!(Regex::compile("a|b").unwrap_err(), RegexError::BranchNotImplemented);
    }

    #[test]
    fn contract_function_matches_struct_api() {
        let (matched, start, len, err) = regex_match("a+", "baaab");
        assert!(matched);
        assert_eq!((start, len), (1, 3));
        assert!(err.is_none());
    }

    #[test]
    fn match_at_zero_property() {
        // Any pattern that matches text unanchored also matches when the
        // text is sliced to start exactly at the reported match start.
        let cases = [("cat", "concatenate"), ("[0-9]+", "id42x"), ("a.*z", "xaz")];
        for (pattern, text) in cases {
            let re = Regex::compile(pattern).unwrap();
            if let Some(m) = re.find(text) {
                let sliced = &text[m.start..];
                let anchored = Regex::compile(&format!("^{pattern}")).unwrap();
                assert!(anchored.find(sliced).is_some());
            }
        }
    }
}
