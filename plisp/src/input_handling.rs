// Input handling for the plisp binary: where program text comes from

use clap::ValueEnum;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Input source types supported by the plisp binary
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputSource {
    /// Execute a string directly
    String,
    /// Execute a file
    File,
    /// Read the program from stdin
    Pipe,
}

/// Configuration for input handling
#[derive(Debug, Clone)]
pub struct InputConfig {
    pub source: InputSource,
    pub file_path: Option<PathBuf>,
    pub string_content: Option<String>,
}

impl InputConfig {
    /// Create a new input config for file input
    pub fn from_file(file_path: PathBuf) -> Self {
        Self {
            source: InputSource::File,
            file_path: Some(file_path),
            string_content: None,
        }
    }

    /// Create a new input config for string input
    pub fn from_string(content: String) -> Self {
        Self {
            source: InputSource::String,
            file_path: None,
            string_content: Some(content),
        }
    }

    /// Create a new input config for pipe input
    pub fn from_pipe() -> Self {
        Self {
            source: InputSource::Pipe,
            file_path: None,
            string_content: None,
        }
    }

    /// Builds the config for `source` from whichever arguments it needs.
    pub fn for_source(
        source: InputSource,
        file_path: Option<PathBuf>,
        string_content: Option<String>,
    ) -> Result<Self, InputError> {
        match source {
            InputSource::File => file_path
                .map(Self::from_file)
                .ok_or(InputError::MissingFileArgument),
            InputSource::String => string_content
                .map(Self::from_string)
                .ok_or(InputError::MissingStringArgument),
            InputSource::Pipe => Ok(Self::from_pipe()),
        }
    }
}

/// Result of reading input content
#[derive(Debug)]
pub struct InputContent {
    pub content: String,
    pub source_name: String,
}

/// Errors that can occur during input handling
#[derive(Debug, Error)]
pub enum InputError {
    #[error("--file (or a positional FILE) is required when using --input file")]
    MissingFileArgument,

    #[error("--string is required when using --input string")]
    MissingStringArgument,

    #[error("error reading file '{}': {error}", .path.display())]
    FileReadError {
        path: PathBuf,
        #[source]
        error: io::Error,
    },

    #[error("error reading from stdin: {0}")]
    StdinReadError(#[source] io::Error),

    #[error("multiple input sources specified; use only one of: file, string, or pipe")]
    MultipleInputSources,
}

/// Read input content based on the configuration
pub fn read_input_content(config: &InputConfig) -> Result<InputContent, InputError> {
    match config.source {
        InputSource::File => {
            let file_path = config
                .file_path
                .as_ref()
                .ok_or(InputError::MissingFileArgument)?;
            debug!(path = %file_path.display(), "reading program file");

            let content = fs::read_to_string(file_path).map_err(|error| InputError::FileReadError {
                path: file_path.clone(),
                error,
            })?;

            Ok(InputContent {
                content,
                source_name: file_path.to_string_lossy().to_string(),
            })
        }

        InputSource::String => {
            let content = config
                .string_content
                .clone()
                .ok_or(InputError::MissingStringArgument)?;
            debug!(bytes = content.len(), "using program string");

            Ok(InputContent {
                content,
                source_name: "<string>".to_string(),
            })
        }

        InputSource::Pipe => {
            debug!("reading program from stdin");
            let mut content = String::new();
            io::stdin()
                .read_to_string(&mut content)
                .map_err(InputError::StdinReadError)?;

            Ok(InputContent {
                content,
                source_name: "<stdin>".to_string(),
            })
        }
    }
}

/// Validate input arguments for a given source type
pub fn validate_input_args(
    source: InputSource,
    file_path: &Option<PathBuf>,
    string_content: &Option<String>,
) -> Result<(), InputError> {
    match source {
        InputSource::File if file_path.is_none() => Err(InputError::MissingFileArgument),
        InputSource::String if string_content.is_none() => Err(InputError::MissingStringArgument),
        _ => Ok(()),
    }
}

/// Picks the source implied by the arguments when none was given explicitly:
/// a file, else a string, else stdin.
pub fn detect_input_source(
    file_path: &Option<PathBuf>,
    string_content: &Option<String>,
) -> Result<InputSource, InputError> {
    match (file_path.is_some(), string_content.is_some()) {
        (true, true) => Err(InputError::MultipleInputSources),
        (true, false) => Ok(InputSource::File),
        (false, true) => Ok(InputSource::String),
        (false, false) => Ok(InputSource::Pipe),
    }
}
