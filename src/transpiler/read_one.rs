//! `!read_one` template.

use std::fmt::{self, Write};

use super::sig::{call_args, call_args_with_prefix, doc_comment, params};
use super::{Template, output_struct, prepare};
use crate::ast::Command;

/// `func (_n *Norm) Name(inputs...) (*Row, error)`
///
/// `QueryRow(...).Scan` reports `sql.ErrNoRows` when nothing matched; it is
/// returned unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOneTemplate;

impl Template for ReadOneTemplate {
    fn render(&self, cmd: &Command, out: &mut String) -> fmt::Result {
        output_struct(out, cmd)?;

        let row = cmd.row_type();
        writeln!(out)?;
        doc_comment(out, &cmd.doc)?;
        writeln!(
            out,
            "func (_n *Norm) {}({}) (*{}, error) {{",
            cmd.name,
            params(&cmd.inputs),
            row
        )?;
        prepare(out, cmd, "nil, _err")?;
        writeln!(out, "\tdefer _stmt.Close()")?;
        writeln!(out, "\tvar _row {}", row)?;
        writeln!(
            out,
            "\tif _err := _stmt.QueryRow({}).Scan({}); _err != nil {{",
            call_args(&cmd.inputs),
            call_args_with_prefix(&cmd.outputs, "&_row.")
        )?;
        writeln!(out, "\t\treturn nil, _err")?;
        writeln!(out, "\t}}")?;
        writeln!(out, "\treturn &_row, nil")?;
        writeln!(out, "}}")
    }
}
