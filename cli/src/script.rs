use std::num::ParseIntError;
use std::str::FromStr;

use sapper_core::Coord2;
use thiserror::Error;

/// A single player action read from a move script.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Move {
    Reveal(Coord2),
    Flag(Coord2),
    /// Total seconds elapsed since the session started.
    Tick(u32),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MoveError {
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("`{command}` expects {expected} argument(s), got {got}")]
    ArgumentCount {
        command: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("invalid number `{value}`")]
    InvalidNumber {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("line {line}: {source}")]
pub struct ScriptError {
    pub line: usize,
    #[source]
    pub source: MoveError,
}

impl FromStr for Move {
    type Err = MoveError;

    /// `reveal ROW COL`, `flag ROW COL` or `tick SECONDS`, with `r`/`f`/`t` as short forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let command = words.next().unwrap_or_default();
        let args: Vec<&str> = words.collect();

        match command.to_ascii_lowercase().as_str() {
            "reveal" | "r" => Ok(Move::Reveal(coords("reveal", &args)?)),
            "flag" | "f" => Ok(Move::Flag(coords("flag", &args)?)),
            "tick" | "t" => {
                expect_args("tick", &args, 1)?;
                Ok(Move::Tick(number(args[0])?))
            }
            _ => Err(MoveError::UnknownCommand(command.to_string())),
        }
    }
}

fn expect_args(command: &'static str, args: &[&str], expected: usize) -> Result<(), MoveError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(MoveError::ArgumentCount {
            command,
            expected,
            got: args.len(),
        })
    }
}

fn coords(command: &'static str, args: &[&str]) -> Result<Coord2, MoveError> {
    expect_args(command, args, 2)?;
    Ok((number(args[0])?, number(args[1])?))
}

fn number<T: FromStr<Err = ParseIntError>>(value: &str) -> Result<T, MoveError> {
    value.parse().map_err(|source| MoveError::InvalidNumber {
        value: value.to_string(),
        source,
    })
}

/// Parses one move per line; blank lines and `#` comments are skipped.
pub fn parse_script(text: &str) -> Result<Vec<(usize, Move)>, ScriptError> {
    text.lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.split('#').next().unwrap_or_default().trim()))
        .filter(|(_, line)| !line.is_empty())
        .map(|(line, content)| {
            content
                .parse()
                .map(|parsed| (line, parsed))
                .map_err(|source| ScriptError { line, source })
        })
        .collect()
}
