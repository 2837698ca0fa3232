//! Parsed representation of a norm file.

use serde::Serialize;
use std::fmt;

/// File-level settings gathered from header directives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderConfig {
    /// Output path for the generated Go file.
    pub output: String,
    /// Go package name.
    pub package: String,
    /// Import path of the `database/sql` driver, imported for side effects.
    pub driver_lib: String,
    /// Driver name passed to `sql.Open`.
    pub driver_name: String,
    /// Extra import lines, emitted verbatim in declaration order.
    pub imports: Vec<String>,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            output: "db.go".to_string(),
            package: "db".to_string(),
            driver_lib: "github.com/lib/pq".to_string(),
            driver_name: "postgres".to_string(),
            imports: Vec::new(),
        }
    }
}

/// The kind of a command block, selected by its start directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    /// `!read`: cursor accessor plus a convenience function returning all rows.
    ReadMany,
    /// `!read_one`: the first row, or the driver's not-found error.
    ReadOne,
    /// `!exec`: executed for side effect only.
    Exec,
}

impl CommandKind {
    /// Whether commands of this kind bind result columns.
    pub fn has_outputs(self) -> bool {
        !matches!(self, CommandKind::Exec)
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandKind::ReadMany => write!(f, "read"),
            CommandKind::ReadOne => write!(f, "read_one"),
            CommandKind::Exec => write!(f, "exec"),
        }
    }
}

/// A named, typed parameter or result column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Arg {
    pub name: String,
    pub typ: String,
}

impl Arg {
    pub fn new(name: impl Into<String>, typ: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            typ: typ.into(),
        }
    }
}

/// One command block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    pub kind: CommandKind,
    /// Base for every generated symbol of this command.
    pub name: String,
    /// Bound to `$1..$N` in order.
    pub inputs: Vec<Arg>,
    /// Scanned in result-column order. Always empty for exec.
    pub outputs: Vec<Arg>,
    /// External struct to bind outputs into, instead of `<Name>Output`.
    pub model: Option<String>,
    pub doc: Vec<String>,
    /// Raw SQL lines.
    pub body: Vec<String>,
    /// Line of the start directive.
    pub line: usize,
}

impl Command {
    pub fn new(kind: CommandKind, name: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            name: name.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            model: None,
            doc: Vec::new(),
            body: Vec::new(),
            line,
        }
    }

    /// The SQL statement, body lines joined with newlines.
    pub fn sql(&self) -> String {
        self.body.join("\n")
    }

    /// Name of the generated output struct.
    pub fn output_struct(&self) -> String {
        format!("{}Output", self.name)
    }

    /// Name of the generated cursor type for read commands.
    pub fn cursor_type(&self) -> String {
        format!("{}Result", self.name)
    }

    /// Go type each row is bound into: the model if declared, the output struct otherwise.
    pub fn row_type(&self) -> String {
        match &self.model {
            Some(model) => model.clone(),
            None => self.output_struct(),
        }
    }
}

/// A fully scanned norm file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormFile {
    pub header: HeaderConfig,
    pub commands: Vec<Command>,
}

impl NormFile {
    /// Find a command by name. Returns the first definition.
    pub fn find_command(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.name == name)
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
