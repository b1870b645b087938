//! Line-oriented command scripts.
//!
//! One command per line, `COMMAND: arg1, arg2, ...`. Command names are case
//! insensitive; blank lines and lines starting with `#` are skipped. A bad
//! line produces a [`LineError`] and never stops the lines after it.
//!
//! ```text
//! BUILD: 50, 30, 70
//! INSERT: 20
//! SEARCH: 65
//! DELETE: 30
//! ```

mod runner;

use std::fmt;

pub use runner::{run_script, ScriptReport, ScriptRunner};

use crate::engine::{BuildInput, Request, StructureKind};
use crate::error::StructvizError;
use crate::model::{Side, Value};

/// A parsed command and the 1-based line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Source line.
    pub line: usize,
    /// What to ask the engine.
    pub request: Request,
}

/// A problem attributed to one script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineError {
    /// Source line.
    pub line: usize,
    /// Description.
    pub message: String,
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}: {}", self.line, self.message)
    }
}

/// Parse `text` into commands for a structure of `kind`. Argument shapes
/// depend on the structure, e.g. `INSERT` takes `value[, index]` on lists
/// and `parentIndex, value, L|R` on a plain binary tree.
#[must_use]
pub fn parse(text: &str, kind: StructureKind) -> Vec<Result<Command, LineError>> {
    text.lines()
        .enumerate()
        .filter_map(|(i, raw)| {
            let line = i + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                return None;
            }
            Some(
                parse_line(trimmed, kind)
                    .map(|request| Command { line, request })
                    .map_err(|message| LineError { line, message }),
            )
        })
        .collect()
}

fn parse_line(line: &str, kind: StructureKind) -> Result<Request, String> {
    let (name, rest) = line.split_once(':').unwrap_or((line, ""));
    let name = name.trim().to_ascii_uppercase();
    let args: Vec<&str> = if rest.trim().is_empty() {
        Vec::new()
    } else {
        rest.split(',').map(str::trim).collect()
    };
    let unsupported = |operation: &'static str| {
        StructvizError::Unsupported {
            operation,
            structure: kind.name(),
        }
        .to_string()
    };
    match (name.as_str(), kind) {
        ("BUILD", StructureKind::Huffman) => args
            .iter()
            .copied()
            .map(weight_pair)
            .collect::<Result<Vec<_>, _>>()
            .map(|pairs| Request::Build(BuildInput::Weights(pairs))),
        ("BUILD", _) => args
            .iter()
            .copied()
            .map(value)
            .collect::<Result<Vec<_>, _>>()
            .map(|values| Request::Build(BuildInput::Values(values))),
        ("CLEAR", _) => {
            arity(&args, 0, 0, "CLEAR takes no arguments")?;
            Ok(Request::Clear)
        }
        ("SEARCH", _) => {
            arity(&args, 1, 1, "SEARCH expects a value")?;
            Ok(Request::Search(value(args[0])?))
        }
        ("PUSH" | "INSERT", StructureKind::Stack) => {
            arity(&args, 1, 1, "PUSH expects a value")?;
            Ok(Request::Push(value(args[0])?))
        }
        ("POP" | "DELETE" | "REMOVE", StructureKind::Stack) => {
            arity(&args, 0, 0, "POP takes no arguments")?;
            Ok(Request::Pop)
        }
        ("PUSH", _) => Err(unsupported("PUSH")),
        ("POP", _) => Err(unsupported("POP")),
        ("INSERT", StructureKind::Sequence | StructureKind::LinkedList) => {
            arity(&args, 1, 2, "INSERT expects value[, index]")?;
            let index = args.get(1).copied().map(index).transpose()?;
            Ok(Request::Insert {
                value: value(args[0])?,
                index,
            })
        }
        ("INSERT", StructureKind::BinaryTree) => {
            arity(&args, 3, 3, "INSERT expects parentIndex, value, L|R")?;
            Ok(Request::InsertChild {
                parent_index: index(args[0])?,
                value: value(args[1])?,
                side: args[2].parse::<Side>().map_err(|e| e.to_string())?,
            })
        }
        ("INSERT", StructureKind::Bst | StructureKind::Avl) => {
            arity(&args, 1, 1, "INSERT expects a value")?;
            Ok(Request::Insert {
                value: value(args[0])?,
                index: None,
            })
        }
        ("DELETE" | "REMOVE", StructureKind::Bst | StructureKind::Avl) => {
            arity(&args, 1, 1, "DELETE expects a value")?;
            Ok(Request::Delete(value(args[0])?))
        }
        (
            "DELETE" | "REMOVE",
            StructureKind::Sequence | StructureKind::LinkedList | StructureKind::BinaryTree,
        ) => {
            arity(&args, 1, 1, "REMOVE expects an index")?;
            Ok(Request::Remove {
                index: index(args[0])?,
            })
        }
        ("INSERT", StructureKind::Huffman) => Err(unsupported("INSERT")),
        ("DELETE", StructureKind::Huffman) => Err(unsupported("DELETE")),
        ("REMOVE", StructureKind::Huffman) => Err(unsupported("REMOVE")),
        (other, _) => Err(format!("unknown command '{other}'")),
    }
}

fn arity(args: &[&str], min: usize, max: usize, usage: &str) -> Result<(), String> {
    if (min..=max).contains(&args.len()) {
        Ok(())
    } else {
        Err(usage.to_owned())
    }
}

fn non_empty(arg: &str) -> Result<&str, String> {
    if arg.is_empty() {
        Err("malformed argument: empty value".to_owned())
    } else {
        Ok(arg)
    }
}

fn value(arg: &str) -> Result<Value, String> {
    non_empty(arg)?
        .parse()
        .map_err(|_| format!("invalid value '{arg}'"))
}

fn index(arg: &str) -> Result<usize, String> {
    non_empty(arg)?
        .parse()
        .map_err(|_| format!("invalid index '{arg}'"))
}

fn weight_pair(arg: &str) -> Result<(String, u64), String> {
    let (key, weight) = non_empty(arg)?
        .rsplit_once(':')
        .ok_or_else(|| format!("expected key:weight, got '{arg}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{arg}'"));
    }
    let weight = weight
        .trim()
        .parse()
        .map_err(|_| format!("invalid weight in '{arg}'"))?;
    Ok((key.to_owned(), weight))
}
