// src/exec/args.rs

//! Turning a flat argument string into an invocation.

use std::path::PathBuf;

/// The resolved executable path plus its split argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>, arg: &str) -> Self {
        Self {
            program: program.into(),
            args: split_args(arg),
        }
    }
}

/// Split `arg` on runs of whitespace.
///
/// There is no quoting or escaping: an argument that itself contains
/// whitespace cannot be expressed through this function.
pub fn split_args(arg: &str) -> Vec<String> {
    arg.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_single_spaces() {
        assert_eq!(split_args("-i test.mp4"), vec!["-i", "test.mp4"]);
    }

    #[test]
    fn ignores_leading_trailing_and_repeated_whitespace() {
        assert_eq!(
            split_args("  -loglevel warning\t-y \n -i  in.mp4 out.mp4  "),
            vec!["-loglevel", "warning", "-y", "-i", "in.mp4", "out.mp4"]
        );
    }

    #[test]
    fn blank_string_yields_no_arguments() {
        assert!(split_args("").is_empty());
        assert!(split_args(" \t\n ").is_empty());
    }

    #[test]
    fn quotes_are_not_interpreted() {
        assert_eq!(
            split_args(r#"-metadata title="two words""#),
            vec!["-metadata", "title=\"two", "words\""]
        );
    }

    #[test]
    fn invocation_keeps_program_and_split_args() {
        let inv = Invocation::new("/usr/bin/ffmpeg", "-i a.mp4 b.mkv");
        assert_eq!(inv.program, PathBuf::from("/usr/bin/ffmpeg"));
        assert_eq!(inv.args, vec!["-i", "a.mp4", "b.mkv"]);
    }
}
