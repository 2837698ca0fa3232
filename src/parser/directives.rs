//! Directive grammar.
//!
//! A directive is a line starting with the escape prefix `-- !`, followed by a
//! keyword and its arguments. Each argument is preceded by exactly one space;
//! nothing may trail the last argument.
//!
//! ```text
//! -- !input  email string
//! ──┬─ ─┬──  ──┬── ──┬───
//!   │   │      │     └── second token
//!   │   │      └── first token
//!   │   └── keyword (looked up in DIRECTIVES)
//!   └── escape prefix
//! ```
//!
//! Tokenizing is stateless; whether a directive is allowed where it appears is
//! decided by the scanner from the directive's [`Scope`].

use nom::{
    IResult,
    bytes::complete::take_while1,
    character::complete::char,
    combinator::{all_consuming, eof, map, rest, verify},
    sequence::{pair, preceded},
};

use crate::ast::{Arg, CommandKind};

/// Required first line of every norm file.
pub const SENTINEL: &str = "-- !norm";

/// Prefix marking a line as a directive.
pub const ESCAPE: &str = "-- !";

/// Directive keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Norm,
    File,
    Package,
    DriverLib,
    DriverName,
    Import,
    Read,
    ReadOne,
    Exec,
    Input,
    Output,
    Model,
    Doc,
}

/// Argument shape of a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// No arguments.
    Zero,
    /// One whitespace-free token.
    One,
    /// Two whitespace-free tokens.
    Two,
    /// Everything after the separating space, non-empty.
    Rest,
}

/// Where a directive may appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// First non-blank line only.
    Sentinel,
    /// Top level, anywhere outside a command block.
    Header,
    /// Top level; opens a command block.
    Start,
    /// Inside a command block.
    Block,
}

/// One row of the directive table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectiveSpec {
    pub keyword: Keyword,
    pub name: &'static str,
    pub arity: Arity,
    pub scope: Scope,
}

const fn spec(keyword: Keyword, name: &'static str, arity: Arity, scope: Scope) -> DirectiveSpec {
    DirectiveSpec {
        keyword,
        name,
        arity,
        scope,
    }
}

/// Every recognized directive.
pub static DIRECTIVES: &[DirectiveSpec] = &[
    spec(Keyword::Norm, "norm", Arity::Zero, Scope::Sentinel),
    spec(Keyword::File, "file", Arity::One, Scope::Header),
    spec(Keyword::Package, "package", Arity::One, Scope::Header),
    spec(Keyword::DriverLib, "driver_lib", Arity::One, Scope::Header),
    spec(Keyword::DriverName, "driver_name", Arity::One, Scope::Header),
    spec(Keyword::Import, "import", Arity::Rest, Scope::Header),
    spec(Keyword::Read, "read", Arity::One, Scope::Start),
    spec(Keyword::ReadOne, "read_one", Arity::One, Scope::Start),
    spec(Keyword::Exec, "exec", Arity::One, Scope::Start),
    spec(Keyword::Input, "input", Arity::Two, Scope::Block),
    spec(Keyword::Output, "output", Arity::Two, Scope::Block),
    spec(Keyword::Model, "model", Arity::One, Scope::Block),
    spec(Keyword::Doc, "doc", Arity::Rest, Scope::Block),
];

/// Look up a directive by keyword text.
pub fn lookup(name: &str) -> Option<&'static DirectiveSpec> {
    DIRECTIVES.iter().find(|d| d.name == name)
}

impl Keyword {
    /// This keyword's row in [`DIRECTIVES`].
    pub fn spec(self) -> &'static DirectiveSpec {
        let row = match self {
            Keyword::Norm => 0,
            Keyword::File => 1,
            Keyword::Package => 2,
            Keyword::DriverLib => 3,
            Keyword::DriverName => 4,
            Keyword::Import => 5,
            Keyword::Read => 6,
            Keyword::ReadOne => 7,
            Keyword::Exec => 8,
            Keyword::Input => 9,
            Keyword::Output => 10,
            Keyword::Model => 11,
            Keyword::Doc => 12,
        };
        &DIRECTIVES[row]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn scope(self) -> Scope {
        self.spec().scope
    }
}

/// A directive with its arguments, borrowed from the source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'a> {
    Sentinel,
    File(&'a str),
    Package(&'a str),
    DriverLib(&'a str),
    DriverName(&'a str),
    Import(&'a str),
    Start { kind: CommandKind, name: &'a str },
    Input { name: &'a str, typ: &'a str },
    Output { name: &'a str, typ: &'a str },
    Model(&'a str),
    Doc(&'a str),
}

impl Directive<'_> {
    pub fn keyword(&self) -> Keyword {
        match self {
            Directive::Sentinel => Keyword::Norm,
            Directive::File(_) => Keyword::File,
            Directive::Package(_) => Keyword::Package,
            Directive::DriverLib(_) => Keyword::DriverLib,
            Directive::DriverName(_) => Keyword::DriverName,
            Directive::Import(_) => Keyword::Import,
            Directive::Start { kind, .. } => match kind {
                CommandKind::ReadMany => Keyword::Read,
                CommandKind::ReadOne => Keyword::ReadOne,
                CommandKind::Exec => Keyword::Exec,
            },
            Directive::Input { .. } => Keyword::Input,
            Directive::Output { .. } => Keyword::Output,
            Directive::Model(_) => Keyword::Model,
            Directive::Doc(_) => Keyword::Doc,
        }
    }

    pub fn scope(&self) -> Scope {
        self.keyword().scope()
    }

    /// Owned argument for input/output directives.
    pub fn arg(&self) -> Option<Arg> {
        match self {
            Directive::Input { name, typ } | Directive::Output { name, typ } => {
                Some(Arg::new(*name, *typ))
            }
            _ => None,
        }
    }
}

/// A classified source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// Empty or whitespace only.
    Blank,
    /// Anything not starting with the escape prefix.
    Text(&'a str),
    Directive(Directive<'a>),
}

/// Why a line starting with the escape prefix was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrammarError {
    /// Known keyword, wrong arguments.
    Malformed,
    /// Keyword not in the table.
    Unknown,
}

/// Classify a single line.
pub fn tokenize(line: &str) -> Result<Line<'_>, GrammarError> {
    if line.trim().is_empty() {
        return Ok(Line::Blank);
    }
    let Some(after) = line.strip_prefix(ESCAPE) else {
        return Ok(Line::Text(line));
    };

    let (args, word) = keyword(after).map_err(|_| GrammarError::Unknown)?;
    let spec = lookup(word).ok_or(GrammarError::Unknown)?;
    let (_, args) = parse_args(spec.arity, args).map_err(|_| GrammarError::Malformed)?;

    let directive = match (spec.keyword, args) {
        (Keyword::Norm, Args::Zero) => Directive::Sentinel,
        (Keyword::File, Args::One(path)) => Directive::File(path),
        (Keyword::Package, Args::One(name)) => Directive::Package(name),
        (Keyword::DriverLib, Args::One(lib)) => Directive::DriverLib(lib),
        (Keyword::DriverName, Args::One(name)) => Directive::DriverName(name),
        (Keyword::Import, Args::Rest(spec)) => Directive::Import(spec),
        (Keyword::Read, Args::One(name)) => Directive::Start {
            kind: CommandKind::ReadMany,
            name,
        },
        (Keyword::ReadOne, Args::One(name)) => Directive::Start {
            kind: CommandKind::ReadOne,
            name,
        },
        (Keyword::Exec, Args::One(name)) => Directive::Start {
            kind: CommandKind::Exec,
            name,
        },
        (Keyword::Input, Args::Two(name, typ)) => Directive::Input { name, typ },
        (Keyword::Output, Args::Two(name, typ)) => Directive::Output { name, typ },
        (Keyword::Model, Args::One(name)) => Directive::Model(name),
        (Keyword::Doc, Args::Rest(text)) => Directive::Doc(text),
        _ => return Err(GrammarError::Malformed),
    };
    Ok(Line::Directive(directive))
}

// =============================================================================
// Parsing Combinators
// =============================================================================

#[derive(Debug, Clone, Copy)]
enum Args<'a> {
    Zero,
    One(&'a str),
    Two(&'a str, &'a str),
    Rest(&'a str),
}

/// A run of non-whitespace characters.
fn token(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace())(input)
}

/// The keyword directly after the escape prefix.
fn keyword(input: &str) -> IResult<&str, &str> {
    token(input)
}

/// ` <token>`
fn spaced_token(input: &str) -> IResult<&str, &str> {
    preceded(char(' '), token)(input)
}

/// ` <anything, non-empty>`
fn spaced_rest(input: &str) -> IResult<&str, &str> {
    preceded(char(' '), verify(rest, |s: &str| !s.is_empty()))(input)
}

fn parse_args(arity: Arity, input: &str) -> IResult<&str, Args<'_>> {
    match arity {
        Arity::Zero => map(eof, |_| Args::Zero)(input),
        Arity::One => map(all_consuming(spaced_token), Args::One)(input),
        Arity::Two => map(all_consuming(pair(spaced_token, spaced_token)), |(a, b)| {
            Args::Two(a, b)
        })(input),
        Arity::Rest => map(spaced_rest, Args::Rest)(input),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_rows_line_up() {
        assert_eq!(DIRECTIVES.len(), 13);
        for row in DIRECTIVES {
            assert_eq!(row.keyword.spec(), row, "{}", row.name);
            assert_eq!(lookup(row.name).map(|d| d.keyword), Some(row.keyword));
        }
    }

    #[test]
    fn test_table_names_unique() {
        for (i, a) in DIRECTIVES.iter().enumerate() {
            for b in &DIRECTIVES[i + 1..] {
                assert_ne!(a.name, b.name);
                assert_ne!(a.keyword, b.keyword);
            }
        }
    }

    #[test]
    fn test_keyword_spec_roundtrip() {
        for d in DIRECTIVES {
            assert_eq!(d.keyword.spec(), d);
            assert_eq!(lookup(d.name), Some(d));
        }
    }

    #[test]
    fn test_read_vs_read_one() {
        assert_eq!(
            tokenize("-- !read GetUsers"),
            Ok(Line::Directive(Directive::Start {
                kind: CommandKind::ReadMany,
                name: "GetUsers"
            }))
        );
        assert_eq!(
            tokenize("-- !read_one FindUser"),
            Ok(Line::Directive(Directive::Start {
                kind: CommandKind::ReadOne,
                name: "FindUser"
            }))
        );
    }

    #[test]
    fn test_rest_of_line_keeps_spaces() {
        assert_eq!(
            tokenize("-- !doc Finds a user by  email."),
            Ok(Line::Directive(Directive::Doc("Finds a user by  email.")))
        );
        assert_eq!(
            tokenize("-- !import t \"time\""),
            Ok(Line::Directive(Directive::Import("t \"time\"")))
        );
    }

    #[test]
    fn test_text_and_blank() {
        assert_eq!(tokenize("   \t"), Ok(Line::Blank));
        assert_eq!(tokenize("SELECT 1"), Ok(Line::Text("SELECT 1")));
        assert_eq!(tokenize("  -- !input a b"), Ok(Line::Text("  -- !input a b")));
        assert_eq!(tokenize("-- plain comment"), Ok(Line::Text("-- plain comment")));
    }

    #[test]
    fn test_rejections() {
        assert_eq!(tokenize("-- !input email"), Err(GrammarError::Malformed));
        assert_eq!(tokenize("-- !input email string "), Err(GrammarError::Malformed));
        assert_eq!(tokenize("-- !input  email string"), Err(GrammarError::Malformed));
        assert_eq!(tokenize("-- !doc"), Err(GrammarError::Malformed));
        assert_eq!(tokenize("-- !foo x"), Err(GrammarError::Unknown));
        assert_eq!(tokenize("-- !"), Err(GrammarError::Unknown));
        assert_eq!(tokenize("-- ! read X"), Err(GrammarError::Unknown));
    }
}
