//! Generation pipeline: read, scan, emit, format, write.
//!
//! ```rust,ignore
//! let engine = Engine::new(NormConfig::discover(path)?);
//! let written = engine.run(path)?;
//! println!("{} commands -> {}", written.commands, written.path.display());
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;
use tracing::{debug, info, trace};

use crate::config::NormConfig;
use crate::error::{NormError, NormResult};
use crate::fmt::SourceFormatter;
use crate::parser;
use crate::transpiler::{Emitter, Templates};

/// Result of one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    /// Output path from the header, relative to the working directory unless absolute.
    pub path: PathBuf,
    /// Formatted Go source.
    pub source: String,
    /// Number of commands emitted.
    pub commands: usize,
}

/// Owns everything a run needs. Build once, use for any number of inputs.
pub struct Engine {
    config: NormConfig,
    templates: Templates,
    formatter: Box<dyn SourceFormatter>,
}

impl Engine {
    /// Engine with the Go templates and the formatter named by `config`.
    pub fn new(config: NormConfig) -> Self {
        let formatter = config.formatter();
        Self {
            config,
            templates: Templates::go(),
            formatter,
        }
    }

    pub fn with_formatter(mut self, formatter: impl SourceFormatter + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    pub fn with_templates(mut self, templates: Templates) -> Self {
        self.templates = templates;
        self
    }

    /// Scan, emit and format in memory. Nothing touches the filesystem.
    pub fn generate(&self, source: &str, generated_on: DateTime<Utc>) -> NormResult<Generated> {
        let file = parser::parse_with(source, self.config.header())?;
        debug!(
            commands = file.commands.len(),
            output = %file.header.output,
            "scanned input"
        );
        if let Ok(json) = file.to_json() {
            trace!(%json, "command model");
        }

        let raw = Emitter::new(&self.templates).emit(&file, generated_on)?;
        debug!(bytes = raw.len(), formatter = self.formatter.name(), "emitted source");
        let source = self.formatter.format(&raw)?;

        Ok(Generated {
            path: PathBuf::from(&file.header.output),
            source,
            commands: file.commands.len(),
        })
    }

    /// Generate from `input` and write the output file.
    ///
    /// The file is only replaced once generation and formatting have
    /// succeeded; a failed run leaves any previous output untouched.
    pub fn run(&self, input: &Path) -> NormResult<Generated> {
        let source = fs::read_to_string(input).map_err(|e| NormError::io(input, e))?;
        let generated = self.generate(&source, Utc::now())?;
        write_atomic(&generated.path, &generated.source)?;
        info!(
            input = %input.display(),
            output = %generated.path.display(),
            commands = generated.commands,
            "wrote generated code"
        );
        Ok(generated)
    }
}

/// Write through a temp file in the destination directory, then rename.
fn write_atomic(path: &Path, contents: &str) -> NormResult<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| NormError::io(dir, e))?;
    tmp.write_all(contents.as_bytes())
        .map_err(|e| NormError::io(tmp.path(), e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(tmp.path(), fs::Permissions::from_mode(0o644))
            .map_err(|e| NormError::io(tmp.path(), e))?;
    }

    tmp.persist(path).map_err(|e| NormError::io(path, e.error))?;
    Ok(())
}
