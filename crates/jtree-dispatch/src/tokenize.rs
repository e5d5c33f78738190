//! Quote- and bracket/brace-depth-aware tokenizer for a command's argument
//! string. Grounded on `command_parser.rs`'s `split_head` scan, extended
//! from "stop at the first whitespace" to full quoting and nesting.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenizeError {
    #[error("unterminated quote")]
    UnterminatedQuote,
    #[error("unbalanced bracket or brace")]
    UnbalancedBracket,
}

/// Split `input` into whitespace-separated tokens. A single or double
/// quote starts a run that ends at the matching unescaped quote
/// (backslash escapes the quote character and backslash itself); a `{`
/// or `[` starts a run that ends at its depth-matched close, so a JSON
/// literal argument survives as one token.
pub fn tokenize(input: &str) -> Result<Vec<String>, TokenizeError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            ' ' | '\t' => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            '"' | '\'' => {
                in_token = true;
                let quote = c;
                loop {
                    match chars.next() {
                        None => return Err(TokenizeError::UnterminatedQuote),
                        Some('\\') => match chars.peek() {
                            Some(&next) if next == quote || next == '\\' => {
                                current.push(next);
                                chars.next();
                            }
                            _ => current.push('\\'),
                        },
                        Some(ch) if ch == quote => break,
                        Some(ch) => current.push(ch),
                    }
                }
            }
            '{' | '[' => {
                in_token = true;
                let close = if c == '{' { '}' } else { ']' };
                current.push(c);
                let mut depth = 1usize;
                while depth > 0 {
                    match chars.next() {
                        None => return Err(TokenizeError::UnbalancedBracket),
                        Some(ch) => {
                            current.push(ch);
                            if ch == c {
                                depth += 1;
                            } else if ch == close {
                                depth -= 1;
                            }
                        }
                    }
                }
            }
            other => {
                in_token = true;
                current.push(other);
            }
        }
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}
