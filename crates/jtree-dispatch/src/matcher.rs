//! Argument matcher and completion, per the four-step contract: tokenize,
//! match flag/alt-marker tokens, fold the remaining tokens into
//! parameters by position, then check for missing mandatory parameters
//! or leftover tokens.

use thiserror::Error;

use crate::signature::Signature;
use crate::tokenize::{TokenizeError, tokenize};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatchError {
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
    #[error("missing required argument <{0}>")]
    MissingParameter(String),
    #[error("unexpected argument: {0}")]
    LeftoverTokens(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    /// Canonical (first) spelling of each marker that was present.
    pub markers: Vec<String>,
    /// One slot per declared parameter, in declaration order.
    pub params: Vec<Option<String>>,
}

impl ParsedArgs {
    pub fn has_marker(&self, name: &str) -> bool {
        self.markers.iter().any(|m| m == name)
    }

    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).and_then(|p| p.as_deref())
    }
}

fn flush(
    pending: &mut Vec<String>,
    params: &mut [Option<String>],
    param_idx: &mut usize,
) -> Result<(), MatchError> {
    if pending.is_empty() {
        return Ok(());
    }
    if *param_idx >= params.len() {
        return Err(MatchError::LeftoverTokens(pending.join(" ")));
    }
    params[*param_idx] = Some(pending.join(" "));
    *param_idx += 1;
    pending.clear();
    Ok(())
}

/// Match `input` against `sig`, returning the matched markers and the
/// filled parameter slots.
pub fn match_args(sig: &Signature, input: &str) -> Result<ParsedArgs, MatchError> {
    let tokens = tokenize(input)?;
    let mut markers_seen = Vec::new();
    let mut params: Vec<Option<String>> = vec![None; sig.params.len()];
    let mut param_idx = 0;
    let mut pending: Vec<String> = Vec::new();

    for token in tokens {
        let is_marker = sig
            .markers
            .iter()
            .any(|m| m.names.iter().any(|n| n == &token));
        if is_marker {
            flush(&mut pending, &mut params, &mut param_idx)?;
            markers_seen.push(token);
        } else {
            pending.push(token);
        }
    }
    flush(&mut pending, &mut params, &mut param_idx)?;

    for (i, p) in sig.params.iter().enumerate() {
        if !p.optional && params[i].is_none() {
            return Err(MatchError::MissingParameter(p.name.clone()));
        }
    }

    Ok(ParsedArgs {
        markers: markers_seen,
        params,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResult {
    /// The partial token being completed (empty if the cursor sits just
    /// after a space, i.e. at the start of a fresh token).
    pub token: String,
    pub candidates: Vec<String>,
}

/// Candidate completions for `input`, per the spec's two rules (grounded
/// on `cmd_get_completion_params`, `original_source/DrJson/TUI/cmd_parse.c:537-576`):
/// a partial last token is completed against flag/marker spellings
/// exclusively — a flag-prefix match wins outright and params are never
/// offered alongside it (`cmd_parse.c:550-552`'s `matched` branch), falling
/// back to remaining parameter placeholders only when no marker matches.
/// Once the line is fully accepted (trailing space, the `all_consumed:`
/// label at `cmd_parse.c:567-576`), every remaining undone marker and
/// every unfilled param placeholder are offered together as one union.
pub fn complete(sig: &Signature, input: &str) -> CompletionResult {
    let ends_with_space = input.is_empty() || input.ends_with(' ') || input.ends_with('\t');
    let mut tokens = tokenize(input).unwrap_or_default();
    let partial = if ends_with_space {
        String::new()
    } else {
        tokens.pop().unwrap_or_default()
    };

    let accepted = tokens.join(" ");
    let parsed = match_args(sig, &accepted).unwrap_or_default();
    let filled = parsed.params.iter().filter(|p| p.is_some()).count();

    let remaining_markers = || {
        sig.markers
            .iter()
            .filter(|m| !m.names.iter().any(|n| parsed.has_marker(n)))
    };
    let remaining_params = || sig.params.iter().skip(filled).map(|p| p.placeholder());

    let candidates = if ends_with_space {
        remaining_markers()
            .flat_map(|m| m.names.first().cloned())
            .chain(remaining_params())
            .collect()
    } else {
        let mut matched: Vec<String> = remaining_markers()
            .flat_map(|m| m.names.clone())
            .filter(|n| n.starts_with(&partial))
            .collect();
        if matched.is_empty() {
            matched = remaining_params().collect();
        }
        matched
    };

    CompletionResult {
        token: partial,
        candidates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::parse_signature;

    #[test]
    fn fills_mandatory_path_param() {
        let sig = parse_signature("[--braceless] <file>");
        let parsed = match_args(&sig, "data.json").unwrap();
        assert_eq!(parsed.param(0), Some("data.json"));
        assert!(!parsed.has_marker("--braceless"));
    }

    #[test]
    fn flag_and_param_in_either_order() {
        let sig = parse_signature("[--braceless] <file>");
        let parsed = match_args(&sig, "--braceless data.json").unwrap();
        assert!(parsed.has_marker("--braceless"));
        assert_eq!(parsed.param(0), Some("data.json"));
    }

    #[test]
    fn missing_mandatory_param_errors() {
        let sig = parse_signature("<file>");
        assert_eq!(
            match_args(&sig, ""),
            Err(MatchError::MissingParameter("file".to_string()))
        );
    }

    #[test]
    fn leftover_tokens_error() {
        let sig = parse_signature("<file>");
        assert!(matches!(
            match_args(&sig, "a.json extra"),
            Err(MatchError::LeftoverTokens(_))
        ));
    }

    #[test]
    fn whitespace_inside_concatenated_param_preserved() {
        let sig = parse_signature("<query>");
        let parsed = match_args(&sig, "a b c").unwrap();
        assert_eq!(parsed.param(0), Some("a b c"));
    }

    #[test]
    fn sort_signature_alt_markers() {
        let sig = parse_signature("[<query>] [keys|values] [asc|desc]");
        let parsed = match_args(&sig, "desc").unwrap();
        assert!(parsed.has_marker("desc"));
        assert!(!parsed.has_marker("asc"));
        assert_eq!(parsed.param(0), None);
    }

    #[test]
    fn completion_matches_flag_prefix() {
        let sig = parse_signature("[--braceless] <file>");
        let result = complete(&sig, "--brace");
        assert_eq!(result.candidates, vec!["--braceless".to_string()]);
    }

    #[test]
    fn completion_on_empty_line_offers_every_unfilled_marker_and_param() {
        let sig = parse_signature("[--braceless] <file>");
        let result = complete(&sig, "");
        assert_eq!(
            result.candidates,
            vec!["--braceless".to_string(), "<file>".to_string()]
        );
    }

    #[test]
    fn completion_after_trailing_space_accepts_prior_tokens() {
        let sig = parse_signature("[--braceless] <file>");
        let result = complete(&sig, "--braceless ");
        assert_eq!(result.token, "");
        assert_eq!(result.candidates, vec!["<file>".to_string()]);
    }
}
