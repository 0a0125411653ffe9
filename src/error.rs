//! Rich diagnostic error types for the LOCC sampler.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text so callers know exactly what went wrong
//! and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the sampler.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum SamplerError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Label(#[from] LabelError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Label errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum LabelError {
    #[error("cannot parse \"{text}\" as a numeric range")]
    #[diagnostic(
        code(locc::label::range_parse),
        help(
            "The numeric part of a category must look like `359`, `43.23` or \
             `1-278.5`, with the lower bound first."
        )
    )]
    RangeParse { text: String },

    #[error("malformed category string: \"{category}\"")]
    #[diagnostic(
        code(locc::label::malformed),
        help(
            "A category is one or more uppercase letters followed by a number, \
             optionally with a decimal part and an optional `-number` upper bound \
             (e.g. `QH366`, `QH1-278.5`)."
        )
    )]
    MalformedCategory { category: String },

    #[error("\"{label}\" does not start with the enclosing prefix \"{prefix}\"")]
    #[diagnostic(
        code(locc::label::prefix_mismatch),
        help("A label can only be resolved below a node whose letter prefix it shares.")
    )]
    PrefixMismatch { label: String, prefix: String },

    #[error("\"{label}\" has nothing left to resolve below \"{prefix}\"")]
    #[diagnostic(
        code(locc::label::empty_step),
        help("The label names the node itself; look it up from an ancestor instead.")
    )]
    EmptyStep { label: String, prefix: String },
}

pub type LabelResult<T> = std::result::Result<T, LabelError>;

// ---------------------------------------------------------------------------
// Tree errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum TreeError {
    #[error("category not found: \"{category}\"")]
    #[diagnostic(
        code(locc::tree::not_found),
        help(
            "The category lies outside the loaded outline. Check the spelling, \
             or resolve it with `locc-sampler find {category}` to see the nearest match."
        )
    )]
    CategoryNotFound { category: String },

    #[error("sample size {requested} is larger than the {available} volumes available")]
    #[diagnostic(
        code(locc::tree::sample_too_large),
        help(
            "Request at most {available} volumes, or choose a broader category \
             with more volumes under it."
        )
    )]
    SampleTooLarge { requested: usize, available: usize },
}

pub type TreeResult<T> = std::result::Result<T, TreeError>;

// ---------------------------------------------------------------------------
// Source errors (outline and volume providers)
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum SourceError {
    #[error("failed to read {kind} file: {path}")]
    #[diagnostic(
        code(locc::source::read),
        help("Ensure the file exists and is readable.")
    )]
    Read {
        kind: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{kind} file {path} contains no usable entries")]
    #[diagnostic(
        code(locc::source::empty),
        help("The file is empty or every line is a comment.")
    )]
    Empty { kind: &'static str, path: String },
}

pub type SourceResult<T> = std::result::Result<T, SourceError>;

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read sampler config: {path}")]
    #[diagnostic(
        code(locc::config::read),
        help("Ensure the config file exists and is valid TOML.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse sampler config: {path}")]
    #[diagnostic(
        code(locc::config::parse),
        help("Check the TOML syntax in the config file: {message}")
    )]
    Parse { path: String, message: String },

    #[error("failed to write sampler config: {path}")]
    #[diagnostic(
        code(locc::config::write),
        help("Ensure you have write permissions to the config directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Convenience alias for sampler-level results.
pub type SamplerResult<T> = std::result::Result<T, SamplerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_errors_convert_to_top_level() {
        let err: SamplerError = TreeError::SampleTooLarge {
            requested: 41,
            available: 40,
        }
        .into();
        assert!(matches!(
            err,
            SamplerError::Tree(TreeError::SampleTooLarge { requested: 41, .. })
        ));
        assert_eq!(
            err.to_string(),
            "sample size 41 is larger than the 40 volumes available"
        );
    }

    #[test]
    fn label_error_codes_are_namespaced() {
        let err = LabelError::RangeParse { text: "abc".into() };
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("locc::label::range_parse"));
    }
}
