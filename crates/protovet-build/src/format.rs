use std::{
    io::{self, Write},
    process::{Command, Stdio},
};
use thiserror::Error as ThisError;

///
/// FormatError
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum FormatError {
    #[error("`{program}` exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("formatter output is not utf-8")]
    InvalidOutput,

    #[error("cannot run `{program}`: {source}")]
    Spawn { program: String, source: io::Error },
}

///
/// Formatter
/// a source formatter for one target language
///

pub trait Formatter {
    fn format(&self, source: &str) -> Result<String, FormatError>;
}

///
/// Rustfmt
/// pipes generated code through the `rustfmt` binary
///

#[derive(Clone, Debug)]
pub struct Rustfmt {
    program: String,
    edition: &'static str,
}

impl Rustfmt {
    #[must_use]
    pub fn with_program(program: &str) -> Self {
        Self {
            program: program.to_string(),
            ..Self::default()
        }
    }
}

impl Default for Rustfmt {
    fn default() -> Self {
        Self {
            program: "rustfmt".to_string(),
            edition: "2024",
        }
    }
}

impl Formatter for Rustfmt {
    fn format(&self, source: &str) -> Result<String, FormatError> {
        let spawn = |source: io::Error| FormatError::Spawn {
            program: self.program.clone(),
            source,
        };

        let mut child = Command::new(&self.program)
            .args(["--edition", self.edition, "--emit", "stdout", "--quiet"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn)?;

        // rustfmt reads all of stdin before writing, so the pipe cannot stall;
        // stdin is closed and the child reaped even when the write fails
        let written = child
            .stdin
            .take()
            .map_or(Ok(()), |mut stdin| stdin.write_all(source.as_bytes()));
        let output = child.wait_with_output().map_err(spawn)?;

        if !output.status.success() {
            return Err(FormatError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        written.map_err(spawn)?;

        String::from_utf8(output.stdout).map_err(|_| FormatError::InvalidOutput)
    }
}

// emit
// formatting is best-effort: on failure the unformatted text is kept
#[must_use]
pub fn emit(formatter: Option<&dyn Formatter>, path: &str, raw: String) -> String {
    let Some(formatter) = formatter else {
        tracing::debug!(path, "no formatter for target, emitting as rendered");
        return raw;
    };

    match formatter.format(&raw) {
        Ok(formatted) => formatted,
        Err(err) => {
            tracing::warn!(path, error = %err, "formatting failed, emitting unformatted output");
            raw
        }
    }
}

///
/// TESTS
///
