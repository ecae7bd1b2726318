// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use common::context::ContextError;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Raised while building the schema. Any of these aborts the schema build.
#[derive(Error, Debug, PartialEq)]
pub enum DeclarationError {
    #[error("Invalid name '{0}': names must match /[_A-Za-z][_0-9A-Za-z]*/")]
    InvalidName(String),

    #[error("Invalid name '{0}': names starting with '__' are reserved for introspection")]
    IntrospectionName(String),

    #[error("Argument name '{0}' is reserved for the execution context")]
    ReservedName(String),

    #[error("Argument '{0}' is already declared")]
    DuplicateArgument(String),

    #[error("Default value of argument '{0}' does not match its type")]
    InvalidDefault(String),

    #[error("Invalid type '{0}'")]
    InvalidType(String),

    #[error("No resolver registered for field '{0}'")]
    MissingResolver(String),
}

/// Raised when a resolver reads one of its arguments.
#[derive(Error, Debug, PartialEq)]
pub enum ArgumentError {
    #[error("Argument '{0}' is not declared")]
    UnknownArgument(String),

    #[error("Argument '{name}' is null, but is used as the non-nullable '{expected}'")]
    NullabilityViolation { name: String, expected: String },

    #[error("Argument '{name}' of type '{actual}' is used as '{expected}'")]
    TypeMismatch {
        name: String,
        expected: String,
        actual: String,
    },
}

/// The engine handed the adapter an argument vector of the wrong shape.
#[derive(Error, Debug, PartialEq)]
pub enum InvocationError {
    #[error("Receiver is not a '{expected}'")]
    ReceiverType { expected: &'static str },

    #[error("Expected the execution context at position 1")]
    MissingContext,

    #[error("Unexpected value kind at position {position}")]
    UnexpectedSlot { position: usize },
}

/// An entry point of the engine contract that the adapter does not service.
#[derive(Error, Debug, PartialEq)]
#[error("Not implemented: {0}")]
pub struct UnsupportedOperation(pub &'static str);

/// The failure of a single field resolution.
///
/// Resolver functions return this, so `?` on argument or context access works inside them.
/// The adapter never rewrites it: whatever the resolver returns reaches the engine unchanged.
#[derive(Error, Debug)]
pub enum FieldError {
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    Invocation(#[from] InvocationError),

    #[error(transparent)]
    Unsupported(#[from] UnsupportedOperation),

    #[error("{0}")]
    Resolver(#[source] BoxError),
}

impl FieldError {
    /// Wrap an error raised by resolver code.
    pub fn resolver(error: impl Into<BoxError>) -> Self {
        FieldError::Resolver(error.into())
    }

    /// The message to show to the client, or `None` for failures that only make sense to the
    /// developer wiring the engine (those should be replaced by a generic message).
    pub fn user_error_message(&self) -> Option<String> {
        match self {
            FieldError::Argument(_) | FieldError::Context(_) | FieldError::Resolver(_) => {
                Some(self.to_string())
            }
            FieldError::Invocation(_) | FieldError::Unsupported(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_visible_messages() {
        let error = FieldError::resolver("boom");
        assert_eq!(error.user_error_message().as_deref(), Some("boom"));

        let error: FieldError = ArgumentError::UnknownArgument("limit".into()).into();
        assert_eq!(
            error.user_error_message().as_deref(),
            Some("Argument 'limit' is not declared")
        );

        let error: FieldError = UnsupportedOperation("arity").into();
        assert_eq!(error.user_error_message(), None);

        let error: FieldError = InvocationError::MissingContext.into();
        assert_eq!(error.user_error_message(), None);
    }

    #[test]
    fn resolver_error_keeps_its_source() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "database timed out");
        let error = FieldError::resolver(io);

        let source = std::error::Error::source(&error).unwrap();
        assert_eq!(
            source.downcast_ref::<std::io::Error>().map(|e| e.kind()),
            Some(std::io::ErrorKind::TimedOut)
        );
    }
}
