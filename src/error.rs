use thiserror::Error;

use crate::reflection::{ArgumentKind, FunctionStage};

/// Failures surfaced while building a path index or binding through it.
///
/// Reflection shapes the resolver cannot handle are configuration errors and abort
/// index construction. Everything else is a caller mistake and leaves the resolver
/// and any binder state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error("argument '{argument}' has unsupported kind {kind:?}")]
    UnsupportedArgument { argument: String, kind: ArgumentKind },

    #[error("buffer argument '{0}' has no pointer type")]
    MissingPointerType(String),

    #[error("no binding category matches '{path}' at node {position} (after {previous})")]
    Unclassified {
        path: String,
        position: usize,
        previous: String,
    },

    #[error("no argument named '{0}'")]
    UnknownArgument(String),

    #[error("path '{0}' does not exist")]
    UnknownPath(String),

    #[error("index {index} at path position {position} is out of bounds for length {length}")]
    IndexOutOfBounds {
        position: usize,
        index: usize,
        length: usize,
    },

    #[error("path '{0}' reaches more than one nested buffer or table")]
    BoundaryViolation(String),

    #[error("path '{0}' lies behind a nested buffer or table, open a child binder for it")]
    CrossesBoundary(String),

    #[error("path '{0}' does not lead to a nested buffer or table")]
    InvalidChildPath(String),

    #[error("expected {expected} at '{path}', found {found}")]
    UnexpectedCategory {
        path: String,
        expected: &'static str,
        found: String,
    },

    #[error("{operation} is not supported by {binder} binders")]
    UnsupportedOperation {
        operation: &'static str,
        binder: &'static str,
    },

    #[error("argument '{0}' is an array, bind it through an explicit element path")]
    RequiresArrayReference(String),

    #[error("{count} elements from index {start} overrun array of length {length}")]
    ArrayOutOfBounds {
        start: usize,
        count: usize,
        length: usize,
    },

    #[error("{expected} values expected, got {found}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("no backing buffer is attached")]
    NoBackingBuffer,

    #[error("a backing buffer is already attached")]
    BufferAlreadyAttached,

    #[error("bytes were already copied directly into argument '{0}'")]
    OverridesDirectBytes(String),

    #[error("copying bytes into argument '{0}' would discard its attached buffer")]
    OverridesAttachedBuffer(String),

    #[error("buffer of {available} bytes is too short, {required} required")]
    BufferTooShort { required: usize, available: usize },

    #[error("{bound} of {expected} texture slots are bound")]
    MissingTextureBindings { expected: usize, bound: usize },

    #[error("{bound} of {expected} sampler slots are bound")]
    MissingSamplerBindings { expected: usize, bound: usize },

    #[error("pipeline has no {0:?} function")]
    NoFunctionForStage(FunctionStage),

    #[error("function '{function}' is a {found:?} function, {expected:?} required")]
    WrongStage {
        function: String,
        expected: FunctionStage,
        found: FunctionStage,
    },
}
