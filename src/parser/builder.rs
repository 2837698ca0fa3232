//! Incremental construction of a [`Command`] from the lines of one block.

use tracing::warn;

use super::directives::Directive;
use crate::ast::{Command, CommandKind};

/// Collects the directives and body lines of a single command block.
///
/// Fields are appended in encounter order; body lines and directives may be
/// interleaved freely.
#[derive(Debug)]
pub struct CommandBuilder {
    command: Command,
}

impl CommandBuilder {
    pub fn new(kind: CommandKind, name: &str, line: usize) -> Self {
        Self {
            command: Command::new(kind, name, line),
        }
    }

    pub fn kind(&self) -> CommandKind {
        self.command.kind
    }

    /// Apply a block-level directive.
    ///
    /// Returns the reason when the directive is not valid inside this block.
    pub fn apply(&mut self, directive: Directive<'_>) -> Result<(), &'static str> {
        match directive {
            Directive::Input { .. } => {
                self.command.inputs.extend(directive.arg());
            }
            Directive::Output { .. } if self.kind().has_outputs() => {
                self.command.outputs.extend(directive.arg());
            }
            Directive::Output { .. } => return Err("exec commands have no outputs"),
            Directive::Model(model) if self.kind().has_outputs() => {
                if let Some(previous) = self.command.model.replace(model.to_string()) {
                    warn!(
                        command = %self.command.name,
                        previous = %previous,
                        model,
                        "model declared more than once, keeping the last one"
                    );
                }
            }
            Directive::Model(_) => return Err("exec commands have no model"),
            Directive::Doc(text) => self.command.doc.push(text.to_string()),
            Directive::Start { .. } => {
                return Err("separate command blocks with a blank line");
            }
            Directive::Sentinel => return Err("the sentinel belongs on the first line"),
            Directive::File(_)
            | Directive::Package(_)
            | Directive::DriverLib(_)
            | Directive::DriverName(_)
            | Directive::Import(_) => {
                return Err("header directives belong at the top level");
            }
        }
        Ok(())
    }

    /// Append a raw SQL line.
    pub fn push_body(&mut self, text: &str) {
        self.command.body.push(text.to_string());
    }

    pub fn finish(self) -> Command {
        self.command
    }
}
