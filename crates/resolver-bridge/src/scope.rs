// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use common::{context::Context, value::Val};
use indexmap::IndexMap;

use crate::{Arg, ArgumentError, FromArgument, TypeDescriptor};

/// A value supplied for an argument, tagged with the argument's declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundArgument {
    declared: TypeDescriptor,
    value: Val,
}

impl BoundArgument {
    pub fn new(declared: TypeDescriptor, value: Val) -> Self {
        Self { declared, value }
    }

    pub fn declared(&self) -> &TypeDescriptor {
        &self.declared
    }

    pub fn value(&self) -> &Val {
        &self.value
    }
}

/// What a resolver sees of one invocation: the execution context and its named arguments.
///
/// Every key corresponds to exactly one declared argument of the field.
#[derive(Debug)]
pub struct ResolveScope {
    context: Arc<Context>,
    arguments: IndexMap<String, BoundArgument>,
}

impl ResolveScope {
    pub fn new(context: Arc<Context>, arguments: IndexMap<String, BoundArgument>) -> Self {
        Self { context, arguments }
    }

    pub fn context(&self) -> &Arc<Context> {
        &self.context
    }

    /// Read argument `name` as a `T`.
    pub fn get<T: FromArgument>(&self, name: &str) -> Result<T, ArgumentError> {
        let argument = self
            .arguments
            .get(name)
            .ok_or_else(|| ArgumentError::UnknownArgument(name.to_string()))?;

        if !T::compatible_with(&argument.declared) {
            return Err(ArgumentError::TypeMismatch {
                name: name.to_string(),
                expected: T::type_name(),
                actual: argument.declared.to_string(),
            });
        }

        if argument.value.is_null() && !(argument.declared.nullable() && T::nullable()) {
            return Err(ArgumentError::NullabilityViolation {
                name: name.to_string(),
                expected: T::type_name(),
            });
        }

        T::from_val(&argument.value).ok_or_else(|| ArgumentError::TypeMismatch {
            name: name.to_string(),
            expected: T::type_name(),
            actual: argument.value.kind_name().to_string(),
        })
    }

    /// Read the argument behind a handle obtained when declaring it.
    pub fn arg<T: FromArgument>(&self, arg: &Arg<T>) -> Result<T, ArgumentError> {
        self.get(arg.name())
    }

    pub fn raw(&self, name: &str) -> Option<&Val> {
        self.arguments.get(name).map(BoundArgument::value)
    }

    pub fn arguments(&self) -> impl Iterator<Item = (&str, &Val)> {
        self.arguments
            .iter()
            .map(|(name, argument)| (name.as_str(), &argument.value))
    }

    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }
}
