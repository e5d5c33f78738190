//! Signature grammar: `:open [--braceless] <file>`,
//! `:sort [<query>] [keys|values] [asc|desc]`.
//!
//! A signature is a flat sequence of declaration tokens parsed once per
//! command at table-construction time, grounded on `command_parser.rs`'s
//! split-head-then-classify shape but generalized from a fixed set of
//! known command names to an arbitrary declared grammar.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    /// `<file>` / `<dir>`: treated as a filesystem path.
    Path,
    /// Any other `<name>`: an opaque string argument.
    String,
}

/// A flag spelling or bare-word alternative (`--braceless`, `asc|desc`)
/// that is matched against an exact token rather than absorbed into a
/// parameter's free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSpec {
    pub names: Vec<String>,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamKind,
    pub optional: bool,
}

impl ParamSpec {
    pub fn placeholder(&self) -> String {
        format!("<{}>", self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    pub markers: Vec<MarkerSpec>,
    pub params: Vec<ParamSpec>,
}

/// Parse a signature string into its marker and parameter declarations.
/// Top-level tokens are whitespace-separated; `[...]` wraps a token as
/// optional (brackets are stripped before the inner token is classified).
pub fn parse_signature(text: &str) -> Signature {
    let mut sig = Signature::default();
    for raw in text.split_whitespace() {
        let (inner, optional) = strip_brackets(raw);
        classify(inner, optional, &mut sig);
    }
    sig
}

fn strip_brackets(token: &str) -> (&str, bool) {
    if let Some(stripped) = token.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        (stripped, true)
    } else {
        (token, false)
    }
}

fn classify(token: &str, optional: bool, sig: &mut Signature) {
    if let Some(name) = token.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
        let kind = if name == "file" || name == "dir" {
            ParamKind::Path
        } else {
            ParamKind::String
        };
        sig.params.push(ParamSpec {
            name: name.to_string(),
            kind,
            optional,
        });
        return;
    }
    let names: Vec<String> = token.split('|').map(str::to_string).collect();
    sig.markers.push(MarkerSpec { names, optional });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_and_path_param() {
        let sig = parse_signature("[--braceless] <file>");
        assert_eq!(sig.markers.len(), 1);
        assert!(sig.markers[0].optional);
        assert_eq!(sig.markers[0].names, vec!["--braceless".to_string()]);
        assert_eq!(sig.params.len(), 1);
        assert_eq!(sig.params[0].kind, ParamKind::Path);
        assert!(sig.params[0].optional);
    }

    #[test]
    fn alt_markers_and_query_param() {
        let sig = parse_signature("[<query>] [keys|values] [asc|desc]");
        assert_eq!(sig.params.len(), 1);
        assert_eq!(sig.params[0].kind, ParamKind::String);
        assert_eq!(sig.markers.len(), 2);
        assert_eq!(
            sig.markers[0].names,
            vec!["keys".to_string(), "values".to_string()]
        );
        assert_eq!(
            sig.markers[1].names,
            vec!["asc".to_string(), "desc".to_string()]
        );
    }

    #[test]
    fn mandatory_params_are_not_optional() {
        let sig = parse_signature("<file>");
        assert!(!sig.params[0].optional);
    }
}
