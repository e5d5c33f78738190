//! Command dispatcher: signature grammar, tokenizer, argument matcher,
//! completion, the command table, and the aggregate session state that
//! ties the navigation engine to the command/search line editors.
//!
//! Grounded on `core-actions/src/dispatcher/{command.rs,command_parser.rs}`:
//! a structured parser classifies the raw command-line buffer, then a
//! small per-command handler mutates state and reports a status. Here the
//! classification step is data-driven (a declared signature grammar per
//! command) rather than a hand-written `match` over a fixed enum, since
//! the command table is open-ended (spec.md §4.5 lists a minimum set).

mod commands;
mod matcher;
mod signature;
mod state;
mod tokenize;

pub use commands::{CommandOutcome, CommandSpec, command_table, dispatch_line, split_head};
pub use matcher::{CompletionResult, MatchError, ParsedArgs, complete, match_args};
pub use signature::{MarkerSpec, ParamKind, ParamSpec, Signature, parse_signature};
pub use state::{AppState, SearchMode};
pub use tokenize::{TokenizeError, tokenize};

/// Completion candidates for a partial command line, resolved against the
/// signature of the command the line names (or against the command names
/// themselves, if the head word isn't finished yet).
pub fn complete_line(input: &str) -> CompletionResult {
    if !input.contains(char::is_whitespace) {
        let candidates: Vec<String> = command_table()
            .iter()
            .flat_map(|c| c.names.iter().copied())
            .filter(|n| n.starts_with(input))
            .map(str::to_string)
            .collect();
        return CompletionResult {
            token: input.to_string(),
            candidates,
        };
    }
    let (head, tail) = commands::split_head(input);
    let table = command_table();
    match table.iter().find(|c| c.names.contains(&head)) {
        Some(cmd) => complete(&cmd.signature, tail),
        None => CompletionResult {
            token: String::new(),
            candidates: Vec::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completes_command_name() {
        let result = complete_line("qu");
        assert_eq!(
            result.candidates,
            vec!["quit".to_string(), "query".to_string()]
        );
    }

    #[test]
    fn completes_unambiguous_command_name() {
        let result = complete_line("hel");
        assert_eq!(result.candidates, vec!["help".to_string()]);
    }

    #[test]
    fn completes_argument_after_space() {
        let result = complete_line("open ");
        assert_eq!(
            result.candidates,
            vec!["--braceless".to_string(), "<file>".to_string()]
        );
    }
}
