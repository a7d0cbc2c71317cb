//! lrtree Error Handling
//!
//! Every failure mode of the crate is a variant of [`TreeError`]. The variants fall
//! into a small number of categories (see [`ErrorCategory`]) that callers use to
//! tell a misused API apart from a broken driver and from a bad input program:
//!
//! - **Usage**: a node accessor was called on the wrong kind of node.
//! - **Internal**: the builder's stack invariants were violated. This is a
//!   driver/generator contract mismatch, never a problem with the parsed source.
//! - **Grammar**: symbol numbering or rule metadata is inconsistent.
//! - **Syntax**: the automaton found no action for the current token.
//! - **Input**: a trace script or tree description could not be read.
//!
//! All variants are `miette` diagnostics with a stable `lrtree::<category>::<kind>` code.

use std::sync::Arc;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::grammar::SymbolIndex;
use crate::tree::NodeId;

// ============================================================================
// ERROR CLASSIFICATION
// ============================================================================

/// Coarse classification of a [`TreeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Wrong accessor for the node kind, or a node attached twice.
    Usage,
    /// Builder invariant violation (driver/generator mismatch).
    Internal,
    /// Inconsistent symbol table or production metadata.
    Grammar,
    /// No valid automaton action for the current token.
    Syntax,
    /// Unreadable or malformed external input (scripts, descriptions, files).
    Input,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Usage => "usage",
            ErrorCategory::Internal => "internal",
            ErrorCategory::Grammar => "grammar",
            ErrorCategory::Syntax => "syntax",
            ErrorCategory::Input => "input",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which variant of a parse node an operation was attempted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKindName {
    Token,
    Interior,
}

impl std::fmt::Display for NodeKindName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKindName::Token => write!(f, "token"),
            NodeKindName::Interior => write!(f, "interior"),
        }
    }
}

// ============================================================================
// THE ERROR TYPE
// ============================================================================

/// Unified error type for tree construction, navigation and the surrounding tooling.
#[derive(Debug, Error, Diagnostic)]
pub enum TreeError {
    // ------------------------------------------------------------------------
    // Usage errors
    // ------------------------------------------------------------------------
    #[error("operation `{operation}` is not supported on {kind} node `{name}`")]
    #[diagnostic(
        code(lrtree::usage::unsupported_operation),
        help("check `is_token()` before calling kind-specific accessors")
    )]
    UnsupportedOperation {
        operation: &'static str,
        kind: NodeKindName,
        name: String,
    },

    #[error("child index {index} is out of range for node `{name}` with {len} children")]
    #[diagnostic(code(lrtree::usage::child_out_of_range))]
    ChildOutOfRange {
        index: usize,
        len: usize,
        name: String,
    },

    #[error("node #{child} already has a parent and cannot be attached again")]
    #[diagnostic(code(lrtree::usage::already_attached))]
    AlreadyAttached { child: NodeId },

    #[error("no node with index {index} exists in this tree")]
    #[diagnostic(code(lrtree::usage::dangling_index))]
    DanglingIndex { index: usize },

    // ------------------------------------------------------------------------
    // Internal (builder invariant) errors
    // ------------------------------------------------------------------------
    #[error(
        "reduce by `{lhs}` needs {needed} stack entries but only {available} are available"
    )]
    #[diagnostic(
        code(lrtree::internal::stack_underflow),
        help("the driver and the generated tables disagree; this is a bug in the parser backend, not in the parsed source")
    )]
    StackUnderflow {
        lhs: String,
        needed: usize,
        available: usize,
    },

    #[error("accept expects exactly one entry on the results stack, found {count}")]
    #[diagnostic(
        code(lrtree::internal::accept_count),
        help("the driver and the generated tables disagree; this is a bug in the parser backend, not in the parsed source")
    )]
    AcceptCount { count: usize },

    #[error("parse table has no goto from state {state} on symbol {symbol}")]
    #[diagnostic(
        code(lrtree::internal::missing_goto),
        help("the parse table is inconsistent with the grammar's productions")
    )]
    MissingGoto { state: usize, symbol: SymbolIndex },

    #[error("tree builder received `{event}` after accept")]
    #[diagnostic(code(lrtree::internal::finished))]
    BuilderFinished { event: &'static str },

    // ------------------------------------------------------------------------
    // Grammar metadata errors
    // ------------------------------------------------------------------------
    #[error("symbol index {index} is already registered as `{existing}`")]
    #[diagnostic(
        code(lrtree::grammar::duplicate_index),
        help("terminals and nonterminals share one numbering space")
    )]
    DuplicateIndex { index: SymbolIndex, existing: String },

    #[error("symbol name `{name}` is already registered with index {existing}")]
    #[diagnostic(code(lrtree::grammar::duplicate_name))]
    DuplicateName { name: String, existing: SymbolIndex },

    #[error("unknown symbol `{name}`")]
    #[diagnostic(code(lrtree::grammar::unknown_symbol))]
    UnknownSymbol { name: String },

    #[error("symbol `{name}` is not a {expected}")]
    #[diagnostic(code(lrtree::grammar::wrong_symbol_kind))]
    WrongSymbolKind { name: String, expected: &'static str },

    #[error("unknown production {rule}")]
    #[diagnostic(code(lrtree::grammar::unknown_production))]
    UnknownProduction { rule: usize },

    // ------------------------------------------------------------------------
    // Syntax errors
    // ------------------------------------------------------------------------
    #[error("{location}: syntax error at `{found}`")]
    #[diagnostic(code(lrtree::syntax::unexpected_token))]
    Syntax { location: String, found: String },

    #[error("{file}: unexpected end of input")]
    #[diagnostic(code(lrtree::syntax::unexpected_eof))]
    UnexpectedEof { file: String },

    // ------------------------------------------------------------------------
    // Input errors
    // ------------------------------------------------------------------------
    #[error("invalid trace script: {message}")]
    #[diagnostic(code(lrtree::input::script))]
    Script {
        message: String,
        #[source_code]
        src: Arc<NamedSource<String>>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("trace script ended without an `accept` event")]
    #[diagnostic(
        code(lrtree::input::no_accept),
        help("a complete trace finishes with `accept`")
    )]
    MissingAccept,

    #[error("invalid tree description: {message}")]
    #[diagnostic(
        code(lrtree::input::description),
        help("descriptions list nodes in pre-order; each interior entry is followed by its `children` subtrees")
    )]
    MalformedDescription { message: String },

    #[error("unsupported script format `{extension}`")]
    #[diagnostic(
        code(lrtree::input::format),
        help("use .trace, .json, .yaml or .yml")
    )]
    UnsupportedFormat { extension: String },

    #[error(transparent)]
    #[diagnostic(code(lrtree::input::io))]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(code(lrtree::input::json))]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    #[diagnostic(code(lrtree::input::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl TreeError {
    /// Returns the coarse category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnsupportedOperation { .. }
            | Self::ChildOutOfRange { .. }
            | Self::AlreadyAttached { .. }
            | Self::DanglingIndex { .. } => ErrorCategory::Usage,

            Self::StackUnderflow { .. }
            | Self::AcceptCount { .. }
            | Self::MissingGoto { .. }
            | Self::BuilderFinished { .. } => ErrorCategory::Internal,

            Self::DuplicateIndex { .. }
            | Self::DuplicateName { .. }
            | Self::UnknownSymbol { .. }
            | Self::WrongSymbolKind { .. }
            | Self::UnknownProduction { .. } => ErrorCategory::Grammar,

            Self::Syntax { .. } | Self::UnexpectedEof { .. } => ErrorCategory::Syntax,

            Self::Script { .. }
            | Self::MissingAccept
            | Self::MalformedDescription { .. }
            | Self::UnsupportedFormat { .. }
            | Self::Io(_)
            | Self::Json(_)
            | Self::Yaml(_) => ErrorCategory::Input,
        }
    }

    /// True for builder invariant violations, which signal a driver bug rather
    /// than a malformed source program.
    pub fn is_internal(&self) -> bool {
        self.category() == ErrorCategory::Internal
    }

    pub(crate) fn unsupported(
        operation: &'static str,
        kind: NodeKindName,
        name: impl Into<String>,
    ) -> Self {
        Self::UnsupportedOperation {
            operation,
            kind,
            name: name.into(),
        }
    }
}

/// Builds a script diagnostic pointing at `span` inside `source`.
pub(crate) fn script_error(
    message: impl Into<String>,
    source_name: &str,
    source: &str,
    span: std::ops::Range<usize>,
) -> TreeError {
    TreeError::Script {
        message: message.into(),
        src: Arc::new(NamedSource::new(source_name, source.to_string())),
        span: span.into(),
    }
}

// ============================================================================
// ERROR FORMATTING UTILITIES
// ============================================================================

/// Prints a [`TreeError`] with full miette diagnostics to stderr.
pub fn print_error(error: TreeError) {
    let report = miette::Report::new(error);
    eprintln!("{report:?}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_separate_internal_from_syntax() {
        let underflow = TreeError::StackUnderflow {
            lhs: "E".into(),
            needed: 3,
            available: 1,
        };
        let syntax = TreeError::Syntax {
            location: "a.php:3".into(),
            found: ";".into(),
        };

        assert!(underflow.is_internal());
        assert!(!syntax.is_internal());
        assert_eq!(syntax.category(), ErrorCategory::Syntax);
    }

    #[test]
    fn unsupported_operation_names_the_node() {
        let error = TreeError::unsupported("lexeme", NodeKindName::Interior, "expr");
        assert_eq!(
            error.to_string(),
            "operation `lexeme` is not supported on interior node `expr`"
        );
        assert_eq!(error.category(), ErrorCategory::Usage);
    }

    #[test]
    fn diagnostic_codes_follow_category() {
        let error = TreeError::AcceptCount { count: 2 };
        let code = error.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("lrtree::internal::accept_count"));
    }
}
