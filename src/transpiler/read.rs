//! `!read` template.
//!
//! Emits a cursor type, a low-level `NameScan` accessor returning it, and a
//! `Name` convenience function that drains the cursor into a slice. `Name`
//! only ever goes through `NameScan`.

use std::fmt::{self, Write};

use super::sig::{call_args, call_args_with_prefix, doc_comment, params, pointer_params};
use super::{Template, output_struct, prepare};
use crate::ast::Command;

#[derive(Debug, Clone, Copy, Default)]
pub struct ReadTemplate;

impl Template for ReadTemplate {
    fn render(&self, cmd: &Command, out: &mut String) -> fmt::Result {
        cursor(out, cmd)?;
        scan_accessor(out, cmd)?;
        output_struct(out, cmd)?;
        collect_all(out, cmd)
    }
}

/// `type NameResult` with Next, Scan, Err and Close.
fn cursor(out: &mut String, cmd: &Command) -> fmt::Result {
    let cursor = cmd.cursor_type();

    writeln!(out)?;
    writeln!(out, "// {} is a cursor over the rows of {}.", cursor, cmd.name)?;
    writeln!(out, "type {} struct {{", cursor)?;
    writeln!(out, "\tstmt *sql.Stmt")?;
    writeln!(out, "\trows *sql.Rows")?;
    writeln!(out, "}}")?;

    writeln!(out)?;
    writeln!(out, "func (_res *{}) Next() bool {{", cursor)?;
    writeln!(out, "\treturn _res.rows.Next()")?;
    writeln!(out, "}}")?;

    writeln!(out)?;
    writeln!(
        out,
        "func (_res *{}) Scan({}) error {{",
        cursor,
        pointer_params(&cmd.outputs)
    )?;
    writeln!(out, "\treturn _res.rows.Scan({})", call_args(&cmd.outputs))?;
    writeln!(out, "}}")?;

    writeln!(out)?;
    writeln!(out, "func (_res *{}) Err() error {{", cursor)?;
    writeln!(out, "\treturn _res.rows.Err()")?;
    writeln!(out, "}}")?;

    // Safe to call more than once; each handle is released exactly once.
    writeln!(out)?;
    writeln!(out, "func (_res *{}) Close() error {{", cursor)?;
    writeln!(out, "\tvar _err error")?;
    writeln!(out, "\tif _res.rows != nil {{")?;
    writeln!(out, "\t\t_err = _res.rows.Close()")?;
    writeln!(out, "\t\t_res.rows = nil")?;
    writeln!(out, "\t}}")?;
    writeln!(out, "\tif _res.stmt != nil {{")?;
    writeln!(out, "\t\tif _cerr := _res.stmt.Close(); _err == nil {{")?;
    writeln!(out, "\t\t\t_err = _cerr")?;
    writeln!(out, "\t\t}}")?;
    writeln!(out, "\t\t_res.stmt = nil")?;
    writeln!(out, "\t}}")?;
    writeln!(out, "\treturn _err")?;
    writeln!(out, "}}")
}

/// `func (_n *Norm) NameScan(inputs...) (*NameResult, error)`
fn scan_accessor(out: &mut String, cmd: &Command) -> fmt::Result {
    let cursor = cmd.cursor_type();

    writeln!(out)?;
    writeln!(
        out,
        "// {}Scan runs {} and returns a cursor over its rows. The caller must Close it.",
        cmd.name, cmd.name
    )?;
    writeln!(
        out,
        "func (_n *Norm) {}Scan({}) (*{}, error) {{",
        cmd.name,
        params(&cmd.inputs),
        cursor
    )?;
    prepare(out, cmd, "nil, _err")?;
    writeln!(out, "\t_rows, _err := _stmt.Query({})", call_args(&cmd.inputs))?;
    writeln!(out, "\tif _err != nil {{")?;
    writeln!(out, "\t\t_stmt.Close()")?;
    writeln!(out, "\t\treturn nil, _err")?;
    writeln!(out, "\t}}")?;
    writeln!(out, "\treturn &{}{{stmt: _stmt, rows: _rows}}, nil", cursor)?;
    writeln!(out, "}}")
}

/// `func (_n *Norm) Name(inputs...) ([]Row, error)`
fn collect_all(out: &mut String, cmd: &Command) -> fmt::Result {
    let row = cmd.row_type();

    writeln!(out)?;
    doc_comment(out, &cmd.doc)?;
    writeln!(
        out,
        "func (_n *Norm) {}({}) ([]{}, error) {{",
        cmd.name,
        params(&cmd.inputs),
        row
    )?;
    writeln!(
        out,
        "\t_res, _err := _n.{}Scan({})",
        cmd.name,
        call_args(&cmd.inputs)
    )?;
    writeln!(out, "\tif _err != nil {{")?;
    writeln!(out, "\t\treturn nil, _err")?;
    writeln!(out, "\t}}")?;
    writeln!(out, "\tdefer _res.Close()")?;
    writeln!(out, "\t_ret := []{}{{}}", row)?;
    writeln!(out, "\tfor _res.Next() {{")?;
    writeln!(out, "\t\tvar _row {}", row)?;
    writeln!(
        out,
        "\t\tif _err := _res.Scan({}); _err != nil {{",
        call_args_with_prefix(&cmd.outputs, "&_row.")
    )?;
    writeln!(out, "\t\t\treturn nil, _err")?;
    writeln!(out, "\t\t}}")?;
    writeln!(out, "\t\t_ret = append(_ret, _row)")?;
    writeln!(out, "\t}}")?;
    writeln!(out, "\tif _err := _res.Err(); _err != nil {{")?;
    writeln!(out, "\t\treturn nil, _err")?;
    writeln!(out, "\t}}")?;
    writeln!(out, "\treturn _ret, nil")?;
    writeln!(out, "}}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Arg, CommandKind};
    use pretty_assertions::assert_eq;

    fn get_users() -> Command {
        let mut cmd = Command::new(CommandKind::ReadMany, "GetUsers", 1);
        cmd.inputs.push(Arg::new("limit", "int"));
        cmd.inputs.push(Arg::new("offset", "int"));
        cmd.outputs.push(Arg::new("ID", "int"));
        cmd.outputs.push(Arg::new("Email", "string"));
        cmd.doc.push("GetUsers pages through users.".to_string());
        cmd.body.push("SELECT id, email FROM users LIMIT $1 OFFSET $2".to_string());
        cmd
    }

    fn render(cmd: &Command) -> String {
        let mut out = String::new();
        ReadTemplate.render(cmd, &mut out).unwrap();
        out
    }

    #[test]
    fn test_cursor_binds_outputs_in_order() {
        let out = render(&get_users());
        assert!(out.contains("type GetUsersResult struct {"));
        assert!(out.contains("func (_res *GetUsersResult) Scan(ID *int, Email *string) error {\n\treturn _res.rows.Scan(ID, Email)\n}"));
        assert!(out.contains("func (_res *GetUsersResult) Next() bool {"));
        assert!(out.contains("func (_res *GetUsersResult) Close() error {"));
    }

    #[test]
    fn test_scan_accessor_binds_inputs_in_order() {
        let out = render(&get_users());
        assert!(out.contains(
            "func (_n *Norm) GetUsersScan(limit int, offset int) (*GetUsersResult, error) {"
        ));
        assert!(out.contains("\t_rows, _err := _stmt.Query(limit, offset)\n"));
        assert!(out.contains("\t\t_stmt.Close()\n\t\treturn nil, _err\n"));
    }

    #[test]
    fn test_convenience_uses_accessor() {
        let out = render(&get_users());
        let convenience = out
            .split("// GetUsers pages through users.\n")
            .nth(1)
            .unwrap();
        assert_eq!(
            convenience,
            "func (_n *Norm) GetUsers(limit int, offset int) ([]GetUsersOutput, error) {
\t_res, _err := _n.GetUsersScan(limit, offset)
\tif _err != nil {
\t\treturn nil, _err
\t}
\tdefer _res.Close()
\t_ret := []GetUsersOutput{}
\tfor _res.Next() {
\t\tvar _row GetUsersOutput
\t\tif _err := _res.Scan(&_row.ID, &_row.Email); _err != nil {
\t\t\treturn nil, _err
\t\t}
\t\t_ret = append(_ret, _row)
\t}
\tif _err := _res.Err(); _err != nil {
\t\treturn nil, _err
\t}
\treturn _ret, nil
}
"
        );
        assert_eq!(out.matches("_n.db.Prepare(").count(), 1);
    }

    #[test]
    fn test_output_struct() {
        let out = render(&get_users());
        assert!(out.contains("type GetUsersOutput struct {\n\tID int\n\tEmail string\n}\n"));
    }

    #[test]
    fn test_model_skips_output_struct() {
        let mut cmd = get_users();
        cmd.model = Some("User".to_string());
        let out = render(&cmd);
        assert!(!out.contains("GetUsersOutput"));
        assert!(out.contains("([]User, error) {"));
        assert!(out.contains("\t_ret := []User{}\n"));
    }
}
