//! `!exec` template.

use std::fmt::{self, Write};

use super::sig::{call_args, doc_comment, params};
use super::{Template, prepare};
use crate::ast::Command;

/// `func (_n *Norm) Name(inputs...) error`
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecTemplate;

impl Template for ExecTemplate {
    fn render(&self, cmd: &Command, out: &mut String) -> fmt::Result {
        writeln!(out)?;
        doc_comment(out, &cmd.doc)?;
        writeln!(out, "func (_n *Norm) {}({}) error {{", cmd.name, params(&cmd.inputs))?;
        prepare(out, cmd, "_err")?;
        writeln!(out, "\tdefer _stmt.Close()")?;
        writeln!(out, "\tif _, _err := _stmt.Exec({}); _err != nil {{", call_args(&cmd.inputs))?;
        writeln!(out, "\t\treturn _err")?;
        writeln!(out, "\t}}")?;
        writeln!(out, "\treturn nil")?;
        writeln!(out, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Arg, CommandKind};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_user() {
        let mut cmd = Command::new(CommandKind::Exec, "AddUser", 2);
        cmd.inputs.push(Arg::new("email", "string"));
        cmd.doc.push("AddUser inserts a user.".to_string());
        cmd.body.push("INSERT INTO users (email) VALUES ($1)".to_string());

        let mut out = String::new();
        ExecTemplate.render(&cmd, &mut out).unwrap();
        assert_eq!(
            out,
            "
// AddUser inserts a user.
func (_n *Norm) AddUser(email string) error {
\t_stmt, _err := _n.db.Prepare(`INSERT INTO users (email) VALUES ($1)`)
\tif _err != nil {
\t\treturn _err
\t}
\tdefer _stmt.Close()
\tif _, _err := _stmt.Exec(email); _err != nil {
\t\treturn _err
\t}
\treturn nil
}
"
        );
    }

    #[test]
    fn test_no_inputs() {
        let mut cmd = Command::new(CommandKind::Exec, "DeleteAllUsers", 1);
        cmd.body.push("DELETE FROM users".to_string());

        let mut out = String::new();
        ExecTemplate.render(&cmd, &mut out).unwrap();
        assert!(out.contains("func (_n *Norm) DeleteAllUsers() error {"));
        assert!(out.contains("_stmt.Exec(); _err != nil"));
    }

    #[test]
    fn test_inputs_named_like_locals() {
        let mut cmd = Command::new(CommandKind::Exec, "A", 1);
        cmd.inputs.push(Arg::new("n", "int"));
        cmd.inputs.push(Arg::new("err", "string"));
        cmd.inputs.push(Arg::new("stmt", "string"));

        let mut out = String::new();
        ExecTemplate.render(&cmd, &mut out).unwrap();
        assert!(out.contains("func (_n *Norm) A(n int, err string, stmt string) error {"));
        assert!(out.contains("\tif _, _err := _stmt.Exec(n, err, stmt); _err != nil {"));
    }
}
