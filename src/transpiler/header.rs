//! File preamble: banner, package, imports and the `Norm` handle.

use std::fmt::{self, Write};

use chrono::{DateTime, Utc};

use crate::ast::HeaderConfig;

/// Render the preamble emitted once at the top of the file.
pub fn render(header: &HeaderConfig, generated_on: DateTime<Utc>, out: &mut String) -> fmt::Result {
    writeln!(out, "// Code generated by norm. DO NOT EDIT.")?;
    writeln!(
        out,
        "// Generated on: {}",
        generated_on.format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(out)?;
    writeln!(out, "package {}", header.package)?;
    writeln!(out)?;

    writeln!(out, "import (")?;
    writeln!(out, "\t\"database/sql\"")?;
    writeln!(out)?;
    writeln!(out, "\t_ \"{}\"", header.driver_lib)?;
    for import in &header.imports {
        writeln!(out, "\t{}", import)?;
    }
    writeln!(out, ")")?;

    writeln!(out)?;
    writeln!(out, "// Norm wraps the database handle used by the generated queries.")?;
    writeln!(out, "type Norm struct {{")?;
    writeln!(out, "\tdb *sql.DB")?;
    writeln!(out, "}}")?;

    writeln!(out)?;
    writeln!(
        out,
        "// NewNorm opens a {} connection and verifies it with a ping.",
        header.driver_name
    )?;
    writeln!(out, "func NewNorm(connStr string) (*Norm, error) {{")?;
    writeln!(out, "\tdb, err := sql.Open(\"{}\", connStr)", header.driver_name)?;
    writeln!(out, "\tif err != nil {{")?;
    writeln!(out, "\t\treturn nil, err")?;
    writeln!(out, "\t}}")?;
    writeln!(out, "\tif err := db.Ping(); err != nil {{")?;
    writeln!(out, "\t\tdb.Close()")?;
    writeln!(out, "\t\treturn nil, err")?;
    writeln!(out, "\t}}")?;
    writeln!(out, "\treturn &Norm{{db: db}}, nil")?;
    writeln!(out, "}}")?;

    writeln!(out)?;
    writeln!(out, "// Close releases the underlying connection pool.")?;
    writeln!(out, "func (_n *Norm) Close() error {{")?;
    writeln!(out, "\treturn _n.db.Close()")?;
    writeln!(out, "}}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_header() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let mut out = String::new();
        render(&HeaderConfig::default(), at, &mut out).unwrap();

        let head: Vec<&str> = out.lines().take(9).collect();
        assert_eq!(
            head,
            vec![
                "// Code generated by norm. DO NOT EDIT.",
                "// Generated on: 2024-03-01 12:30:00 UTC",
                "",
                "package db",
                "",
                "import (",
                "\t\"database/sql\"",
                "",
                "\t_ \"github.com/lib/pq\"",
            ]
        );
        assert!(out.contains("sql.Open(\"postgres\", connStr)"));
        assert!(out.contains("if err := db.Ping(); err != nil {\n\t\tdb.Close()\n\t\treturn nil, err"));
        assert!(out.ends_with("func (_n *Norm) Close() error {\n\treturn _n.db.Close()\n}\n"));
    }

    #[test]
    fn test_extra_imports_verbatim() {
        let header = HeaderConfig {
            package: "store".to_string(),
            driver_lib: "github.com/mattn/go-sqlite3".to_string(),
            driver_name: "sqlite3".to_string(),
            imports: vec!["\"time\"".to_string(), "m \"example.com/models\"".to_string()],
            ..HeaderConfig::default()
        };
        let mut out = String::new();
        render(&header, Utc::now(), &mut out).unwrap();
        assert!(out.contains("package store\n"));
        assert!(out.contains(
            "\t_ \"github.com/mattn/go-sqlite3\"\n\t\"time\"\n\tm \"example.com/models\"\n)\n"
        ));
        assert!(out.contains("sql.Open(\"sqlite3\", connStr)"));
    }
}
