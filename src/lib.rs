//! # norm
//!
//! Generates typed Go data-access code from annotated SQL.
//!
//! A norm file is plain SQL with directive comments:
//!
//! ```sql
//! -- !norm
//! -- !package store
//!
//! -- !read GetUsers
//! -- !input limit int
//! -- !output ID int
//! -- !output Email string
//! SELECT id, email FROM users LIMIT $1
//! ```
//!
//! ## Quick Example
//!
//! ```
//! let file = norm::parse("-- !norm\n\n-- !exec Ping\nSELECT 1\n").unwrap();
//! assert_eq!(file.commands[0].name, "Ping");
//! ```
//!
//! ## Directives
//!
//! | Directive         | Where        | Effect                          |
//! |-------------------|--------------|---------------------------------|
//! | `!norm`           | first line   | Marks a norm file               |
//! | `!file`           | header       | Output path                     |
//! | `!package`        | header       | Go package name                 |
//! | `!driver_lib`     | header       | Driver import path              |
//! | `!driver_name`    | header       | Driver name for `sql.Open`      |
//! | `!import`         | header       | Extra import line               |
//! | `!read`           | starts block | Many-row query                  |
//! | `!read_one`       | starts block | Single-row query                |
//! | `!exec`           | starts block | Statement without rows          |
//! | `!input`          | block        | Bound parameter                 |
//! | `!output`         | block        | Result column                   |
//! | `!model`          | block        | Bind rows into an existing type |
//! | `!doc`            | block        | Doc comment line                |

pub mod ast;
pub mod config;
pub mod engine;
pub mod error;
pub mod fmt;
pub mod parser;
pub mod transpiler;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::config::NormConfig;
    pub use crate::engine::{Engine, Generated};
    pub use crate::error::*;
    pub use crate::fmt::{ExternalFormatter, Passthrough, SourceFormatter};
    pub use crate::parser::{parse, parse_with};
    pub use crate::transpiler::{Emitter, Template, Templates};
}

/// Parse a norm file into its header and command list.
///
/// # Example
///
/// ```
/// use norm::parse;
///
/// let file = parse("-- !norm\n-- !package store\n").unwrap();
/// assert_eq!(file.header.package, "store");
/// ```
pub fn parse(source: &str) -> error::NormResult<ast::NormFile> {
    parser::parse(source)
}
