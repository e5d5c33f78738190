//! `jtree` entrypoint.
//!
//! Structured the way `ox-bin::main` is: a startup phase (logging, panic
//! hook, argument parsing, document load) followed by either a one-shot
//! pipeline (queries applied, result printed/written, exit) or the
//! interactive event loop. Unlike the teacher, there is no background
//! event source to multiplex — spec.md's concurrency model is a direct
//! blocking `crossterm::event::read()` loop, so `core-events`/`tokio`
//! have no counterpart here (see DESIGN.md).

use std::io::Read;
use std::path::PathBuf;
use std::sync::Once;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, error, info};
use tracing_appender::non_blocking::WorkerGuard;

use jtree_core::{gc, kind_label, parse_document, parse_path, pretty_print, pretty_print_to_file};
use jtree_dispatch::{AppState, CommandOutcome, CompletionResult, SearchMode, complete_line,
    dispatch_line};
use jtree_edit::{CompletionCallback, CompletionSnapshot, Key, LineEditorState, Outcome};
use jtree_keymap::{NavAction, PendingContext};
use jtree_term::{CrosstermBackend, TerminalBackend, TerminalCapabilities};

const ARG_PARSE_ERROR: i32 = 2;

/// Interactive JSON-family document explorer.
#[derive(Parser, Debug)]
#[command(name = "jtree", version, about = "Interactive JSON document explorer")]
struct Args {
    /// File to open; omitted reads standard input.
    path: Option<PathBuf>,
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,
    /// Path query to evaluate in one-shot mode; may be repeated.
    #[arg(short = 'q', long = "query")]
    query: Vec<String>,
    #[arg(long)]
    braceless: bool,
    #[arg(long)]
    ndjson: bool,
    #[arg(short = 'p', long = "pretty")]
    pretty: bool,
    #[arg(long, value_name = "N")]
    indent: Option<usize>,
    #[arg(short = 'i', long = "interactive")]
    interactive: bool,
    #[arg(long)]
    intern: bool,
    #[arg(long)]
    gc: bool,
    /// Print the full command reference, including commands omitted from
    /// `-h`'s short summary, and exit.
    #[arg(short = 'H', long = "hidden-help")]
    hidden_help: bool,
    /// Force plain (non-styled) output regardless of TTY detection.
    #[arg(long)]
    plain: bool,
    #[arg(long = "fish-completions")]
    fish_completions: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.fish_completions {
        print!("{}", fish_completion_script());
        return Ok(());
    }

    let _log_guard = configure_logging();
    install_panic_hook();
    info!(target: "runtime", "startup");

    if args.hidden_help {
        print_hidden_help();
        return Ok(());
    }

    match run(&args) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!(target: "runtime", error = %e, "fatal");
            eprintln!("jtree: {e}");
            std::process::exit(1);
        }
    }
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = std::path::Path::new(".");
    let file_appender = tracing_appender::rolling::never(log_dir, "jtree.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(()) => Some(guard),
        Err(_) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn read_input(args: &Args) -> Result<String> {
    match &args.path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading standard input")?;
            Ok(buf)
        }
    }
}

/// Parse `text` honoring `--ndjson` (one value per line, collected into
/// an array) ahead of the shared `braceless`-aware parser.
fn parse_input(text: &str, args: &Args) -> Result<serde_json::Value> {
    if args.ndjson {
        let values: Result<Vec<serde_json::Value>, serde_json::Error> = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(serde_json::from_str)
            .collect();
        return Ok(serde_json::Value::Array(values.context("parsing ndjson")?));
    }
    parse_document(text, args.braceless).context("parsing document")
}

fn intern_all(root: &serde_json::Value) -> usize {
    let mut interner = jtree_core::Interner::new();
    fn walk(value: &serde_json::Value, interner: &mut jtree_core::Interner) {
        match value {
            serde_json::Value::Object(map) => {
                for (k, v) in map {
                    interner.atomize(k);
                    walk(v, interner);
                }
            }
            serde_json::Value::Array(items) => {
                for v in items {
                    walk(v, interner);
                }
            }
            _ => {}
        }
    }
    walk(root, &mut interner);
    interner.len()
}

fn run(args: &Args) -> Result<i32> {
    let text = read_input(args)?;
    let root = parse_input(&text, args)?;

    if args.intern {
        let count = intern_all(&root);
        debug!(target: "startup", interned_keys = count, "intern_pass_complete");
    }
    if args.gc {
        gc(&[&root]);
    }

    let indent = if args.pretty { args.indent.unwrap_or(2) } else { args.indent.unwrap_or(0) };
    if indent > 80 {
        eprintln!("jtree: --indent must be 0..=80");
        return Ok(ARG_PARSE_ERROR);
    }

    if args.interactive {
        let config = jtree_config::load_from(None);
        return run_interactive(root, args, indent, &config);
    }
    run_one_shot(root, args, indent)
}

fn run_one_shot(root: serde_json::Value, args: &Args, indent: usize) -> Result<i32> {
    let mut outputs = Vec::new();
    for q in &args.query {
        let (path, rest) = parse_path(q);
        if !rest.trim().is_empty() {
            eprintln!("jtree: unexpected trailing text in query {q:?}: {rest}");
            return Ok(1);
        }
        match jtree_core::eval(&root, &path) {
            Some(v) => outputs.push(pretty_print(v, indent)),
            None => {
                eprintln!("jtree: no match for query {q:?}");
                return Ok(1);
            }
        }
    }
    let rendered = if outputs.is_empty() { pretty_print(&root, indent) } else { outputs.join("\n") };

    if let Some(file) = &args.output {
        // With no queries, go through the library's documented file-sink
        // variant directly; with queries, write the already-rendered text.
        let write_result = if args.query.is_empty() {
            pretty_print_to_file(&root, indent, file)
        } else {
            std::fs::write(file, &rendered)
        };
        return match write_result {
            Ok(()) => Ok(0),
            Err(e) => {
                eprintln!("jtree: write failed: {e}");
                Ok(1)
            }
        };
    }
    println!("{rendered}");
    Ok(0)
}

/// Where the command-line history file lives: local `jtree.toml` discovery
/// gives a project-scoped config, but history is a per-user thing, so this
/// only ever looks in the platform config dir (falling back to the current
/// directory when that's unavailable, same as `jtree_config::discover`).
fn history_file_path() -> PathBuf {
    if let Some(dir) = dirs::config_dir() {
        dir.join("jtree").join("history")
    } else {
        PathBuf::from(".jtree_history")
    }
}

/// A missing or unreadable history file just means "no history yet";
/// never fatal, matching `jtree_config::load_from`'s resilience policy.
fn load_history(max: usize) -> jtree_edit::History {
    let path = history_file_path();
    match std::fs::read_to_string(&path) {
        Ok(content) => {
            let lines = content.lines().map(str::to_string).collect();
            jtree_edit::History::from_lines(lines, max)
        }
        Err(_) => jtree_edit::History::new(max),
    }
}

fn save_history(history: &jtree_edit::History) {
    let path = history_file_path();
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            debug!(target: "shutdown", error = %e, "history_dir_create_failed");
            return;
        }
    }
    let content = history.to_lines().join("\n");
    if let Err(e) = std::fs::write(&path, content) {
        debug!(target: "shutdown", error = %e, "history_write_failed");
    }
}

fn fish_completion_script() -> &'static str {
    "complete -c jtree -l braceless -d 'parse input without enclosing braces'\n\
complete -c jtree -l ndjson -d 'parse newline-delimited JSON'\n\
complete -c jtree -s p -l pretty -d 'pretty-print output'\n\
complete -c jtree -l indent -d 'pretty-print indent width' -r\n\
complete -c jtree -s i -l interactive -d 'open the interactive explorer'\n\
complete -c jtree -s q -l query -d 'evaluate a path query' -r\n\
complete -c jtree -s o -l output -d 'write result to a file' -r\n\
complete -c jtree -l plain -d 'disable styled output'\n\
complete -c jtree -s h -l help -d 'print help'\n\
complete -c jtree -s v -l version -d 'print version'\n"
}

fn print_hidden_help() {
    println!("jtree: interactive JSON-family document explorer\n");
    println!("commands:");
    for cmd in jtree_dispatch::command_table() {
        println!("  :{:<10} {}", cmd.names.join("/"), cmd.signature_text);
    }
}

// ---- interactive session -------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Navigation,
    Command,
    Search { forward: bool },
}

struct DispatchCompletion {
    base: Option<(CompletionSnapshot, String)>,
}

impl DispatchCompletion {
    fn new() -> Self {
        Self { base: None }
    }
}

impl CompletionCallback for DispatchCompletion {
    fn complete(
        &mut self,
        editor: &mut LineEditorState,
        snapshot: CompletionSnapshot,
        tab_count: u32,
    ) -> i32 {
        let base_text = match &self.base {
            Some((s, text)) if *s == snapshot => text.clone(),
            _ => {
                let text = editor.buffer()[..snapshot.length].to_string();
                self.base = Some((snapshot, text.clone()));
                text
            }
        };
        let CompletionResult { token, candidates } = complete_line(&base_text);
        if candidates.is_empty() {
            return -1;
        }
        let idx = (tab_count as usize - 1) % candidates.len();
        let prefix_len = base_text.len() - token.len();
        let mut rewritten = base_text[..prefix_len].to_string();
        rewritten.push_str(&candidates[idx]);
        editor.set_buffer(&rewritten);
        0
    }
}

fn run_interactive(
    root: serde_json::Value,
    args: &Args,
    indent: usize,
    config: &jtree_config::Config,
) -> Result<i32> {
    let layout = jtree_nav::FlatLayout {
        width: config.view.flat_width,
        threshold: config.view.flat_threshold,
    };
    let mut app = AppState::with_options(root, layout, config.editor.history_limit);
    app.command_history = load_history(config.editor.history_limit);
    app.indent = indent;
    app.braceless = args.braceless;
    app.search_mode = Some(if config.search.default_mode == "query" {
        let path = app.nav.current_item().map(|i| i.path.clone()).unwrap_or_default();
        SearchMode::QueryScoped(path)
    } else {
        SearchMode::Recursive
    });
    let caps = if args.plain { TerminalCapabilities::plain() } else { TerminalCapabilities::detect() };
    let plain = args.plain || !caps.is_tty;

    let mut backend = CrosstermBackend::new();
    let _guard = backend.enter_guard()?;
    backend.set_title("jtree")?;

    let mut mode = Mode::Navigation;
    let mut pending = PendingContext::new();
    let mut completion = DispatchCompletion::new();
    let mut viewport = jtree_render::Viewport::new(1);

    loop {
        let (cols, rows) = backend.size().unwrap_or((80, 24));
        viewport.height = rows.saturating_sub(1).max(1) as usize;
        draw(&app, &mode, &mut viewport, cols, plain)?;

        if app.quit {
            save_history(&app.command_history);
            return Ok(0);
        }

        let Some(event) = backend.read_event(Duration::from_millis(250))? else {
            continue;
        };
        let Event::Key(key_event) = event else { continue };
        if key_event.kind == crossterm::event::KeyEventKind::Release {
            continue;
        }

        match mode {
            Mode::Navigation => handle_navigation_key(&mut app, &mut pending, &mut mode, key_event),
            Mode::Command => handle_command_key(&mut app, &mut completion, key_event, &mut mode),
            Mode::Search { forward } => {
                handle_search_key(&mut app, &mut completion, key_event, &mut mode, forward)
            }
        }
        if app.nav.needs_rebuild {
            app.nav.rebuild();
        }
    }
}

fn apply_command_outcome(app: &mut AppState, outcome: CommandOutcome) {
    match outcome {
        CommandOutcome::Ok(Some(msg)) => app.set_message(msg),
        CommandOutcome::Ok(None) => {}
        CommandOutcome::Error(msg) => app.set_message(format!("error: {msg}")),
        CommandOutcome::Quit => app.quit = true,
    }
}

fn handle_navigation_key(
    app: &mut AppState,
    pending: &mut PendingContext,
    mode: &mut Mode,
    key_event: KeyEvent,
) {
    let Some(c) = nav_char(key_event) else { return };
    let Some(action) = pending.compose_with_context(c) else { return };
    match action {
        NavAction::Move(d) => app.nav.move_cursor(d),
        NavAction::CollapseOrParent => {
            if app.nav.current_is_expanded() {
                let _ = app.nav.toggle_expand();
            } else {
                app.nav.jump_parent(false);
            }
        }
        NavAction::ExpandOrEnter => {
            if app.nav.current_is_expanded() {
                app.nav.move_cursor(1);
            } else if app.nav.toggle_expand().is_err() {
                app.nav.move_cursor(1);
            }
        }
        NavAction::JumpHome => app.nav.jump_home(),
        NavAction::JumpEnd => app.nav.jump_end(),
        NavAction::PrevSibling => app.nav.jump_prev_sibling(),
        NavAction::NextSibling => app.nav.jump_next_sibling(),
        NavAction::ExpandRecursive => {
            let _ = app.nav.expand_recursive();
        }
        NavAction::CollapseAll => app.nav.collapse_all(),
        NavAction::OpenSearchRecursive => {
            app.search_editor.set_buffer("");
            *mode = Mode::Search { forward: true };
        }
        NavAction::OpenSearchQueryScoped => {
            app.search_editor.set_buffer("");
            *mode = Mode::Search { forward: false };
        }
        NavAction::NextMatch => {
            if !app.advance_search(true) {
                app.set_message("no match");
            }
        }
        NavAction::PrevMatch => {
            if !app.advance_search(false) {
                app.set_message("no match");
            }
        }
        NavAction::OpenCommand => {
            app.command_editor.set_buffer("");
            *mode = Mode::Command;
        }
        NavAction::ToggleExpand => {
            let _ = app.nav.toggle_expand();
        }
        NavAction::JumpNthChild(n) => app.nav.jump_nth_child(n),
        NavAction::Quit => app.quit = true,
    }
}

fn nav_char(key_event: KeyEvent) -> Option<char> {
    match key_event.code {
        KeyCode::Char(c) => Some(c),
        KeyCode::Up => Some('k'),
        KeyCode::Down => Some('j'),
        KeyCode::Enter => Some('\r'),
        _ => None,
    }
}

fn handle_command_key(
    app: &mut AppState,
    completion: &mut DispatchCompletion,
    key_event: KeyEvent,
    mode: &mut Mode,
) {
    let Some(key) = decode_edit_key(key_event) else { return };
    let outcome = app
        .command_editor
        .handle_key(key, &app.command_history, Some(completion));
    match outcome {
        Outcome::Submit(line) => {
            app.command_history.push(line.clone());
            let result = dispatch_line(app, &line);
            apply_command_outcome(app, result);
            *mode = Mode::Navigation;
        }
        Outcome::Cancelled | Outcome::Eof => *mode = Mode::Navigation,
        Outcome::Suspend | Outcome::Continue | Outcome::Redisplay => {}
    }
}

fn handle_search_key(
    app: &mut AppState,
    completion: &mut DispatchCompletion,
    key_event: KeyEvent,
    mode: &mut Mode,
    forward: bool,
) {
    let Some(key) = decode_edit_key(key_event) else { return };
    let outcome = app
        .search_editor
        .handle_key(key, &app.search_history, Some(completion));
    match outcome {
        Outcome::Submit(line) => {
            app.search_history.push(line.clone());
            let search_mode = if forward {
                SearchMode::Recursive
            } else {
                app.search_mode.clone().unwrap_or(SearchMode::Recursive)
            };
            app.set_search_pattern(&line, search_mode);
            if !app.advance_search(true) {
                app.set_message("no match");
            }
            *mode = Mode::Navigation;
        }
        Outcome::Cancelled | Outcome::Eof => *mode = Mode::Navigation,
        Outcome::Suspend | Outcome::Continue | Outcome::Redisplay => {}
    }
}

fn decode_edit_key(key_event: KeyEvent) -> Option<Key> {
    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
    Some(match key_event.code {
        KeyCode::Char('a') if ctrl => Key::CtrlA,
        KeyCode::Char('e') if ctrl => Key::CtrlE,
        KeyCode::Char('k') if ctrl => Key::CtrlK,
        KeyCode::Char('u') if ctrl => Key::CtrlU,
        KeyCode::Char('w') if ctrl => Key::CtrlW,
        KeyCode::Char('l') if ctrl => Key::CtrlL,
        KeyCode::Char('p') if ctrl => Key::CtrlP,
        KeyCode::Char('n') if ctrl => Key::CtrlN,
        KeyCode::Char('r') if ctrl => Key::CtrlR,
        KeyCode::Char('c') if ctrl => Key::CtrlC,
        KeyCode::Char('d') if ctrl => Key::CtrlD,
        KeyCode::Char('z') if ctrl => Key::CtrlZ,
        KeyCode::Char(c) => Key::Printable(c),
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => Key::ShiftTab,
        KeyCode::Enter => Key::Enter,
        _ => return None,
    })
}

fn draw(
    app: &AppState,
    mode: &Mode,
    viewport: &mut jtree_render::Viewport,
    cols: u16,
    plain: bool,
) -> Result<()> {
    let mut writer =
        jtree_render::render_frame(&app.nav.root, &app.nav.items, app.nav.cursor, viewport, cols, plain);
    let status_row = viewport.height as u16;
    writer.move_to(0, status_row);
    writer.clear_line();
    let status = match mode {
        Mode::Command => format!(":{}", app.command_editor.buffer()),
        Mode::Search { forward: true } => format!("/{}", app.search_editor.buffer()),
        Mode::Search { forward: false } => format!("?{}", app.search_editor.buffer()),
        Mode::Navigation => app
            .message
            .clone()
            .unwrap_or_else(|| current_node_summary(app)),
    };
    writer.print(status);
    writer.flush().context("writing frame")
}

fn current_node_summary(app: &AppState) -> String {
    app.nav
        .current_item()
        .and_then(|item| jtree_core::eval(&app.nav.root, &item.path))
        .map(kind_label)
        .unwrap_or_default()
}
