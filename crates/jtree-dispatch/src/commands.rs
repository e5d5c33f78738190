//! The command table: one `CommandSpec` per entry, each carrying its
//! parsed signature and a handler over the aggregate [`AppState`].
//!
//! Grounded on `dispatcher/command.rs`'s `execute_command` — a parsed
//! command routed to a small per-command handler function that mutates
//! state and reports an ephemeral status — generalized from a fixed
//! `match` over a hand-written enum to a data-driven table so new
//! commands are one `CommandSpec` entry rather than a new match arm.

use std::path::PathBuf;

use serde_json::Value;

use jtree_core::{Path, compare, eval, eval_mut, parse_document, parse_expression, parse_path,
    pretty_print, pretty_print_to_file};

use crate::matcher::{ParsedArgs, match_args};
use crate::signature::{Signature, parse_signature};
use crate::state::{AppState, SearchMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Ok(Option<String>),
    Error(String),
    Quit,
}

pub struct CommandSpec {
    pub names: &'static [&'static str],
    pub signature: Signature,
    pub signature_text: &'static str,
    pub handler: fn(&mut AppState, &ParsedArgs) -> CommandOutcome,
}

pub fn command_table() -> Vec<CommandSpec> {
    vec![
        spec(&["help"], "", cmd_help),
        spec(&["quit", "q"], "", cmd_quit),
        spec(&["print", "p"], "[<path>]", cmd_print),
        spec(&["yank", "y"], "[<file>]", cmd_yank),
        spec(&["query"], "<query>", cmd_query),
        spec(&["focus"], "", cmd_focus),
        spec(&["unfocus"], "", cmd_unfocus),
        spec(&["sort"], "[<query>] [keys|values] [asc|desc]", cmd_sort),
        spec(&["filter"], "<query>", cmd_filter),
        spec(&["reset"], "", cmd_reset),
        spec(&["gc"], "", cmd_gc),
        spec(&["ls"], "[<path>]", cmd_ls),
        spec(&["open"], "[--braceless] <file>", cmd_open),
        spec(&["indent"], "<n>", cmd_indent),
        spec(&["braceless"], "", cmd_braceless),
    ]
}

fn spec(
    names: &'static [&'static str],
    signature: &str,
    handler: fn(&mut AppState, &ParsedArgs) -> CommandOutcome,
) -> CommandSpec {
    CommandSpec {
        names,
        signature: parse_signature(signature),
        signature_text: signature,
        handler,
    }
}

/// Split the command's name from the rest of the line, the way
/// `command_parser.rs`'s `split_head` separates `:w!` from a trailing
/// path, but without the leading `:` (the caller strips that).
pub fn split_head(body: &str) -> (&str, &str) {
    let trimmed = body.trim_start();
    let mut idx = 0usize;
    for (offset, ch) in trimmed.char_indices() {
        if ch.is_whitespace() {
            break;
        }
        idx = offset + ch.len_utf8();
    }
    if idx == 0 {
        (trimmed, "")
    } else {
        trimmed.split_at(idx)
    }
}

/// Look up, argument-match, and run the named command against `line`
/// (the text after the leading `:`).
pub fn dispatch_line(app: &mut AppState, line: &str) -> CommandOutcome {
    let (head, tail) = split_head(line);
    if head.is_empty() {
        return CommandOutcome::Error("no command".to_string());
    }
    let table = command_table();
    let Some(cmd) = table.iter().find(|c| c.names.contains(&head)) else {
        return CommandOutcome::Error(format!("unknown command: {head}"));
    };
    match match_args(&cmd.signature, tail.trim_start()) {
        Ok(args) => (cmd.handler)(app, &args),
        Err(e) => CommandOutcome::Error(e.to_string()),
    }
}

fn cmd_help(_app: &mut AppState, _args: &ParsedArgs) -> CommandOutcome {
    let names: Vec<&str> = command_table().iter().flat_map(|c| c.names.iter().copied()).collect();
    CommandOutcome::Ok(Some(names.join(", ")))
}

fn cmd_quit(app: &mut AppState, _args: &ParsedArgs) -> CommandOutcome {
    app.quit = true;
    CommandOutcome::Quit
}

fn resolve_path_arg(app: &AppState, text: Option<&str>) -> Option<Path> {
    match text {
        Some(s) => Some(parse_path(s).0),
        None => app.nav.current_item().map(|i| i.path.clone()),
    }
}

fn cmd_print(app: &mut AppState, args: &ParsedArgs) -> CommandOutcome {
    let Some(path) = resolve_path_arg(app, args.param(0)) else {
        return CommandOutcome::Error("no current position".to_string());
    };
    match eval(&app.nav.root, &path) {
        Some(v) => CommandOutcome::Ok(Some(pretty_print(v, app.indent))),
        None => CommandOutcome::Error(format!("no such path: {}", path.display())),
    }
}

fn cmd_yank(app: &mut AppState, args: &ParsedArgs) -> CommandOutcome {
    let Some(path) = app.nav.current_item().map(|i| i.path.clone()) else {
        return CommandOutcome::Error("no current position".to_string());
    };
    let Some(value) = eval(&app.nav.root, &path) else {
        return CommandOutcome::Error(format!("no such path: {}", path.display()));
    };
    let text = pretty_print(value, app.indent);
    match args.param(0) {
        Some(file) => match pretty_print_to_file(value, app.indent, &PathBuf::from(file)) {
            Ok(()) => CommandOutcome::Ok(Some(format!("yanked to {file}"))),
            Err(e) => CommandOutcome::Error(format!("write failed: {e}")),
        },
        None => CommandOutcome::Ok(Some(text)),
    }
}

fn cmd_query(app: &mut AppState, args: &ParsedArgs) -> CommandOutcome {
    let Some(text) = args.param(0) else {
        return CommandOutcome::Error("query requires a path".to_string());
    };
    let (path, rest) = parse_path(text);
    if !rest.trim().is_empty() {
        return CommandOutcome::Error(format!("unexpected trailing text: {rest}"));
    }
    app.search_mode = Some(SearchMode::QueryScoped(path));
    CommandOutcome::Ok(Some("query scope set".to_string()))
}

fn cmd_focus(app: &mut AppState, _args: &ParsedArgs) -> CommandOutcome {
    match app.nav.focus() {
        Ok(()) => {
            app.nav.rebuild();
            CommandOutcome::Ok(Some("focused".to_string()))
        }
        Err(e) => CommandOutcome::Error(e.to_string()),
    }
}

fn cmd_unfocus(app: &mut AppState, _args: &ParsedArgs) -> CommandOutcome {
    match app.nav.unfocus() {
        Ok(()) => {
            app.nav.rebuild();
            CommandOutcome::Ok(Some("unfocused".to_string()))
        }
        Err(e) => CommandOutcome::Error(e.to_string()),
    }
}

fn cmd_sort(app: &mut AppState, args: &ParsedArgs) -> CommandOutcome {
    let Some(path) = app.nav.current_item().map(|i| i.path.clone()) else {
        return CommandOutcome::Error("no current position".to_string());
    };
    let by_keys = args.has_marker("keys");
    let descending = args.has_marker("desc");
    let sub_expr = args.param(0).map(parse_expression);

    let Some(value) = eval_mut(&mut app.nav.root, &path) else {
        return CommandOutcome::Error(format!("no such path: {}", path.display()));
    };
    match value {
        Value::Array(items) => {
            items.sort_by(|a, b| {
                let ka = sub_expr.as_ref().and_then(|e| eval(a, &e.path)).unwrap_or(a);
                let kb = sub_expr.as_ref().and_then(|e| eval(b, &e.path)).unwrap_or(b);
                let ord = compare(ka, kb);
                if descending { ord.reverse() } else { ord }
            });
        }
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = std::mem::take(map).into_iter().collect();
            entries.sort_by(|(ka, va), (kb, vb)| {
                let ord = if by_keys {
                    ka.cmp(kb)
                } else {
                    let ka = sub_expr.as_ref().and_then(|e| eval(va, &e.path)).unwrap_or(va);
                    let kb = sub_expr.as_ref().and_then(|e| eval(vb, &e.path)).unwrap_or(vb);
                    compare(ka, kb)
                };
                if descending { ord.reverse() } else { ord }
            });
            *map = entries.into_iter().collect();
        }
        _ => return CommandOutcome::Error("sort target is not a container".to_string()),
    }
    app.nav.needs_rebuild = true;
    app.nav.rebuild();
    CommandOutcome::Ok(Some("sorted".to_string()))
}

fn cmd_filter(app: &mut AppState, args: &ParsedArgs) -> CommandOutcome {
    let Some(text) = args.param(0) else {
        return CommandOutcome::Error("filter requires an expression".to_string());
    };
    let expr = parse_expression(text);
    let Some(path) = app.nav.current_item().map(|i| i.path.clone()) else {
        return CommandOutcome::Error("no current position".to_string());
    };
    let Some(value) = eval_mut(&mut app.nav.root, &path) else {
        return CommandOutcome::Error(format!("no such path: {}", path.display()));
    };
    match value {
        Value::Array(items) => {
            items.retain(|item| jtree_core::eval_truthy(item, &expr));
        }
        Value::Object(map) => {
            let kept: Vec<(String, Value)> = std::mem::take(map)
                .into_iter()
                .filter(|(_, v)| jtree_core::eval_truthy(v, &expr))
                .collect();
            *map = kept.into_iter().collect();
        }
        _ => return CommandOutcome::Error("filter target is not a container".to_string()),
    }
    app.nav.needs_rebuild = true;
    app.nav.rebuild();
    CommandOutcome::Ok(Some("filtered".to_string()))
}

fn cmd_reset(app: &mut AppState, _args: &ParsedArgs) -> CommandOutcome {
    app.nav = jtree_nav::NavState::with_layout(app.original_root.clone(), app.nav.layout);
    CommandOutcome::Ok(Some("reset to loaded document".to_string()))
}

fn cmd_gc(app: &mut AppState, _args: &ParsedArgs) -> CommandOutcome {
    jtree_core::gc(&[&app.nav.root]);
    CommandOutcome::Ok(Some("gc: no-op over serde_json::Value".to_string()))
}

fn cmd_ls(app: &mut AppState, args: &ParsedArgs) -> CommandOutcome {
    let Some(path) = resolve_path_arg(app, args.param(0)) else {
        return CommandOutcome::Error("no current position".to_string());
    };
    let Some(value) = eval(&app.nav.root, &path) else {
        return CommandOutcome::Error(format!("no such path: {}", path.display()));
    };
    let listing = match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| format!("[{i}] {}", jtree_core::kind_label(v)))
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{k}: {}", jtree_core::kind_label(v)))
            .collect::<Vec<_>>()
            .join("\n"),
        other => jtree_core::kind_label(other).to_string(),
    };
    CommandOutcome::Ok(Some(listing))
}

fn cmd_open(app: &mut AppState, args: &ParsedArgs) -> CommandOutcome {
    let Some(file) = args.param(0) else {
        return CommandOutcome::Error("open requires a file".to_string());
    };
    let braceless = args.has_marker("--braceless");
    let text = match std::fs::read_to_string(file) {
        Ok(t) => t,
        Err(e) => return CommandOutcome::Error(format!("read failed: {e}")),
    };
    match parse_document(&text, braceless) {
        Ok(root) => {
            app.original_root = root.clone();
            app.nav = jtree_nav::NavState::with_layout(root, app.nav.layout);
            app.braceless = braceless;
            CommandOutcome::Ok(Some(format!("opened {file}")))
        }
        Err(e) => CommandOutcome::Error(format!("parse failed: {e}")),
    }
}

fn cmd_indent(app: &mut AppState, args: &ParsedArgs) -> CommandOutcome {
    let Some(n) = args.param(0).and_then(|s| s.parse::<usize>().ok()) else {
        return CommandOutcome::Error("indent requires an integer".to_string());
    };
    if n > 80 {
        return CommandOutcome::Error("indent must be 0..=80".to_string());
    }
    app.indent = n;
    CommandOutcome::Ok(Some(format!("indent set to {n}")))
}

fn cmd_braceless(app: &mut AppState, _args: &ParsedArgs) -> CommandOutcome {
    app.braceless = !app.braceless;
    CommandOutcome::Ok(Some(format!("braceless reparse: {}", app.braceless)))
}
