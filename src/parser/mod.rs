//! Directive scanner.
//!
//! Splits a norm file into header configuration and command blocks.
//!
//! ```text
//! -- !norm                          <- sentinel, first non-blank line
//! -- !package store                 <- header directives
//!
//! -- !read_one FindUser             <- command start
//! -- !input email string            <- block directives and SQL body,
//! -- !output ID int                    in any order
//! SELECT id FROM users WHERE email = $1
//!                                   <- blank line ends the block
//! ```

pub mod builder;
pub mod directives;


use std::collections::HashMap;
use std::iter::Enumerate;
use std::str::Lines;

use tracing::{debug, warn};

use crate::ast::{Command, CommandKind, HeaderConfig, NormFile};
use crate::error::{NormError, NormResult};
use builder::CommandBuilder;
use directives::{Directive, GrammarError, Line, SENTINEL, Scope};

/// Scan a norm file using the built-in header defaults.
pub fn parse(source: &str) -> NormResult<NormFile> {
    parse_with(source, HeaderConfig::default())
}

/// Scan a norm file, starting from the given header defaults.
pub fn parse_with(source: &str, header: HeaderConfig) -> NormResult<NormFile> {
    Scanner::new(source, header).scan()
}

/// Line-by-line state machine over a norm file.
pub struct Scanner<'a> {
    lines: Enumerate<Lines<'a>>,
    header: HeaderConfig,
    commands: Vec<Command>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str, header: HeaderConfig) -> Self {
        Self {
            lines: source.lines().enumerate(),
            header,
            commands: Vec::new(),
        }
    }

    /// Run the scanner to completion.
    pub fn scan(mut self) -> NormResult<NormFile> {
        self.expect_sentinel()?;

        while let Some((line_no, line)) = self.next_line() {
            match classify(line_no, line)? {
                Line::Blank | Line::Text(_) => {}
                Line::Directive(directive) => self.top_level(directive, line_no, line)?,
            }
        }

        warn_duplicates(&self.commands);
        debug!(
            commands = self.commands.len(),
            package = %self.header.package,
            output = %self.header.output,
            "scanned norm file"
        );

        Ok(NormFile {
            header: self.header,
            commands: self.commands,
        })
    }

    /// 1-based line number and text of the next line.
    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        self.lines.next().map(|(i, line)| (i + 1, line))
    }

    fn expect_sentinel(&mut self) -> NormResult<()> {
        let mut last = 0;
        while let Some((line_no, line)) = self.next_line() {
            if line.trim().is_empty() {
                last = line_no;
                continue;
            }
            if line == SENTINEL {
                return Ok(());
            }
            return Err(NormError::MissingSentinel {
                line: line_no,
                found: line.to_string(),
            });
        }
        Err(NormError::MissingSentinel {
            line: last + 1,
            found: String::new(),
        })
    }

    fn top_level(&mut self, directive: Directive<'a>, line_no: usize, line: &str) -> NormResult<()> {
        let reason = match directive.scope() {
            Scope::Header | Scope::Start => None,
            Scope::Block => Some("block directives must follow a command start"),
            Scope::Sentinel => Some("the sentinel belongs on the first line"),
        };
        if let Some(reason) = reason {
            return Err(out_of_scope(line_no, line, reason));
        }

        match directive {
            Directive::File(path) => self.header.output = path.to_string(),
            Directive::Package(name) => self.header.package = name.to_string(),
            Directive::DriverLib(lib) => self.header.driver_lib = lib.to_string(),
            Directive::DriverName(name) => self.header.driver_name = name.to_string(),
            Directive::Import(spec) => self.header.imports.push(spec.to_string()),
            Directive::Start { kind, name } => {
                let command = self.scan_block(kind, name, line_no)?;
                self.commands.push(command);
            }
            _ => {}
        }
        Ok(())
    }

    /// Consume lines up to the next blank line or end of input.
    fn scan_block(&mut self, kind: CommandKind, name: &str, start: usize) -> NormResult<Command> {
        let mut builder = CommandBuilder::new(kind, name, start);

        while let Some((line_no, line)) = self.next_line() {
            match classify(line_no, line)? {
                Line::Blank => break,
                Line::Text(text) => builder.push_body(text),
                Line::Directive(directive) => builder
                    .apply(directive)
                    .map_err(|reason| out_of_scope(line_no, line, reason))?,
            }
        }

        let command = builder.finish();
        debug!(
            kind = %command.kind,
            name = %command.name,
            line = command.line,
            inputs = command.inputs.len(),
            outputs = command.outputs.len(),
            "parsed command"
        );
        Ok(command)
    }
}

fn classify(line_no: usize, line: &str) -> NormResult<Line<'_>> {
    directives::tokenize(line).map_err(|e| match e {
        GrammarError::Malformed => NormError::format(line_no, line),
        GrammarError::Unknown => NormError::unknown(line_no, line),
    })
}

/// A known directive used where it is not accepted reads as an unknown command.
fn out_of_scope(line_no: usize, line: &str, reason: &'static str) -> NormError {
    debug!(line = line_no, reason, "directive out of scope");
    NormError::unknown(line_no, line)
}

/// Duplicate names are emitted as-is; the Go compiler reports the redefinition.
fn warn_duplicates(commands: &[Command]) {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for cmd in commands {
        match seen.get(cmd.name.as_str()) {
            Some(&first) => warn!(
                name = %cmd.name,
                first_line = first,
                line = cmd.line,
                "command name defined more than once"
            ),
            None => {
                seen.insert(cmd.name.as_str(), cmd.line);
            }
        }
    }
}
