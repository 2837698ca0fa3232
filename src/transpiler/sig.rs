//! Go signature and literal fragments shared by the templates.

use std::fmt::{self, Write};

use crate::ast::Arg;

/// `email string, limit int`
pub fn params(args: &[Arg]) -> String {
    args.iter()
        .map(|a| format!("{} {}", a.name, a.typ))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `ID *int, Email *string`
pub fn pointer_params(args: &[Arg]) -> String {
    args.iter()
        .map(|a| format!("{} *{}", a.name, a.typ))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `email, limit`
pub fn call_args(args: &[Arg]) -> String {
    call_args_with_prefix(args, "")
}

/// `&o.ID, &o.Email` for prefix `&o.`
pub fn call_args_with_prefix(args: &[Arg], prefix: &str) -> String {
    args.iter()
        .map(|a| format!("{}{}", prefix, a.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// One `\tName Type` line per field.
pub fn struct_fields(out: &mut String, args: &[Arg]) -> fmt::Result {
    for a in args {
        writeln!(out, "\t{} {}", a.name, a.typ)?;
    }
    Ok(())
}

/// `// line` per documentation line.
pub fn doc_comment(out: &mut String, doc: &[String]) -> fmt::Result {
    for line in doc {
        writeln!(out, "// {}", line)?;
    }
    Ok(())
}

/// A Go string literal holding `sql` unchanged.
///
/// Raw literals cannot contain a backtick and drop carriage returns, so those
/// bodies fall back to an interpreted literal.
pub fn string_literal(sql: &str) -> String {
    if !sql.contains(['`', '\r']) {
        return format!("`{}`", sql);
    }

    let mut lit = String::with_capacity(sql.len() + 2);
    lit.push('"');
    for c in sql.chars() {
        match c {
            '"' => lit.push_str("\\\""),
            '\\' => lit.push_str("\\\\"),
            '\n' => lit.push_str("\\n"),
            '\r' => lit.push_str("\\r"),
            '\t' => lit.push_str("\\t"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                let _ = write!(lit, "\\x{:02x}", c as u32);
            }
            c => lit.push(c),
        }
    }
    lit.push('"');
    lit
}
