//! Go code emitter.
//!
//! Renders the file preamble once, then each command through the template
//! registered for its kind.

pub mod exec;
pub mod header;
pub mod read;
pub mod read_one;
pub mod sig;

use std::fmt::{self, Write};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::ast::{Command, CommandKind, NormFile};
use crate::error::{NormError, NormResult};

pub use exec::ExecTemplate;
pub use read::ReadTemplate;
pub use read_one::ReadOneTemplate;

/// Renders one command into Go source.
pub trait Template {
    fn render(&self, cmd: &Command, out: &mut String) -> fmt::Result;
}

/// Immutable mapping from command kind to template.
pub struct Templates {
    read: Box<dyn Template>,
    read_one: Box<dyn Template>,
    exec: Box<dyn Template>,
}

impl Templates {
    pub fn new(
        read: impl Template + 'static,
        read_one: impl Template + 'static,
        exec: impl Template + 'static,
    ) -> Self {
        Self {
            read: Box::new(read),
            read_one: Box::new(read_one),
            exec: Box::new(exec),
        }
    }

    /// The `database/sql` templates.
    pub fn go() -> Self {
        Self::new(ReadTemplate, ReadOneTemplate, ExecTemplate)
    }

    pub fn get(&self, kind: CommandKind) -> &dyn Template {
        match kind {
            CommandKind::ReadMany => self.read.as_ref(),
            CommandKind::ReadOne => self.read_one.as_ref(),
            CommandKind::Exec => self.exec.as_ref(),
        }
    }
}

impl Default for Templates {
    fn default() -> Self {
        Self::go()
    }
}

/// Turns a scanned file into unformatted Go source.
pub struct Emitter<'t> {
    templates: &'t Templates,
}

impl<'t> Emitter<'t> {
    pub fn new(templates: &'t Templates) -> Self {
        Self { templates }
    }

    /// Render the whole file. Output depends only on `file` and `generated_on`.
    pub fn emit(&self, file: &NormFile, generated_on: DateTime<Utc>) -> NormResult<String> {
        let mut out = String::new();
        header::render(&file.header, generated_on, &mut out).map_err(|source| {
            NormError::TemplateRender {
                command: "header".to_string(),
                source,
            }
        })?;

        for cmd in &file.commands {
            self.templates
                .get(cmd.kind)
                .render(cmd, &mut out)
                .map_err(|source| NormError::TemplateRender {
                    command: cmd.name.clone(),
                    source,
                })?;
            debug!(kind = %cmd.kind, name = %cmd.name, "rendered command");
        }
        Ok(out)
    }
}

/// Render with the default Go templates.
pub fn emit(file: &NormFile, generated_on: DateTime<Utc>) -> NormResult<String> {
    Emitter::new(&Templates::go()).emit(file, generated_on)
}

/// Statement preparation with early return of `fail` on error.
///
/// Generated locals and receivers carry a leading underscore so they never
/// shadow or clash with the command's own parameter names.
fn prepare(out: &mut String, cmd: &Command, fail: &str) -> fmt::Result {
    writeln!(
        out,
        "\t_stmt, _err := _n.db.Prepare({})",
        sig::string_literal(&cmd.sql())
    )?;
    writeln!(out, "\tif _err != nil {{")?;
    writeln!(out, "\t\treturn {}", fail)?;
    writeln!(out, "\t}}")
}

/// `type NameOutput struct` unless the command binds into a model.
fn output_struct(out: &mut String, cmd: &Command) -> fmt::Result {
    if cmd.model.is_some() {
        return Ok(());
    }
    let name = cmd.output_struct();
    writeln!(out)?;
    writeln!(out, "// {} is a row returned by {}.", name, cmd.name)?;
    writeln!(out, "type {} struct {{", name)?;
    sig::struct_fields(out, &cmd.outputs)?;
    writeln!(out, "}}")
}
