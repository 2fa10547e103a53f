//! # Command Grammar
//!
//! The `:`-prompt accepts a small fixed grammar:
//!
//! ```text
//! set level=<LEVEL>       LEVEL ∈ {ALL, DEBUG, INFO, WARNING, ERROR, CRITICAL}
//! set resource=<SUBSTR>   substring filter on the request resource path
//! unset level             back to ALL
//! unset resource          drop the resource filter
//! ```
//!
//! Parsing is total: anything the grammar does not recognize comes back
//! as `None`, and execution treats that as an unknown command rather
//! than an error path.

use crate::logs::LevelFilter;

/// A recognized command, ready to apply to the fetch filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetLevel(LevelFilter),
    SetResource(String),
    UnsetLevel,
    UnsetResource,
}

/// Parses one line of command input. Level names are case-insensitive;
/// surrounding whitespace is ignored.
pub fn parse(input: &str) -> Option<Command> {
    let input = input.trim();

    if let Some(rest) = input.strip_prefix("set ") {
        let (key, value) = rest.split_once('=')?;
        return match key.trim() {
            "level" => value.trim().parse().ok().map(Command::SetLevel),
            "resource" => {
                let value = value.trim();
                (!value.is_empty()).then(|| Command::SetResource(value.to_string()))
            }
            _ => None,
        };
    }

    if let Some(rest) = input.strip_prefix("unset ") {
        return match rest.trim() {
            "level" => Some(Command::UnsetLevel),
            "resource" => Some(Command::UnsetResource),
            _ => None,
        };
    }

    None
}
