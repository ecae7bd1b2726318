// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{marker::PhantomData, sync::LazyLock};

use common::value::Val;
use indexmap::IndexMap;
use regex::Regex;

use crate::{
    ArgumentError, BoundArgument, DeclarationError, InputType, TypeDescriptor,
    function_wrapper::{CONTEXT_SLOT, CONTEXT_TYPE},
};

static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[_A-Za-z][_0-9A-Za-z]*$").expect("valid name regex"));

pub(crate) fn is_valid_name(name: &str) -> bool {
    NAME_REGEX.is_match(name)
}

/// Check a field or argument name against the GraphQL name rules.
pub fn validate_name(name: &str) -> Result<(), DeclarationError> {
    if !is_valid_name(name) {
        Err(DeclarationError::InvalidName(name.to_string()))
    } else if name.starts_with("__") {
        Err(DeclarationError::IntrospectionName(name.to_string()))
    } else {
        Ok(())
    }
}

/// One argument a field accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentDeclaration {
    name: String,
    ty: TypeDescriptor,
    description: Option<String>,
    default_value: Option<Val>,
}

impl ArgumentDeclaration {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &TypeDescriptor {
        &self.ty
    }

    pub fn nullable(&self) -> bool {
        self.ty.nullable()
    }

    pub fn get_description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn get_default_value(&self) -> Option<&Val> {
        self.default_value.as_ref()
    }

    pub fn description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    /// Used in place of a null supplied by the engine.
    pub fn default_value(&mut self, value: impl Into<Val>) -> &mut Self {
        self.default_value = Some(value.into());
        self
    }

    /// Fails if the default value could never be bound to the declared type.
    pub fn validate_default(&self) -> Result<(), DeclarationError> {
        match &self.default_value {
            Some(Val::Null) if !self.ty.nullable() => {
                Err(DeclarationError::InvalidDefault(self.name.clone()))
            }
            Some(value) if !self.ty.accepts(value) => {
                Err(DeclarationError::InvalidDefault(self.name.clone()))
            }
            _ => Ok(()),
        }
    }

    /// Attach the declared type to a value supplied by the engine, checking its runtime kind.
    pub(crate) fn bind(&self, value: Val) -> Result<BoundArgument, ArgumentError> {
        let value = match (value, &self.default_value) {
            (Val::Null, Some(default_value)) => default_value.clone(),
            (value, _) => value,
        };

        if self.ty.accepts(&value) {
            Ok(BoundArgument::new(self.ty.clone(), value))
        } else {
            Err(ArgumentError::TypeMismatch {
                name: self.name.clone(),
                expected: self.ty.to_string(),
                actual: self.ty.rejected_kind(&value),
            })
        }
    }
}

/// A typed handle to a declared argument, returned when declaring it from a Rust type.
#[derive(Debug)]
pub struct Arg<T> {
    name: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Arg<T> {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T> Clone for Arg<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            _marker: PhantomData,
        }
    }
}

/// The ordered arguments of one field.
///
/// The order of declaration is the order in which the engine supplies values, so it is fixed
/// once declared: declarations can only be appended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgumentDeclarations {
    declarations: Vec<ArgumentDeclaration>,
}

impl ArgumentDeclarations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an argument from its SDL type. `nullable` overrides the nullability written in
    /// `ty`.
    pub fn declare_argument(
        &mut self,
        name: &str,
        ty: &str,
        nullable: bool,
    ) -> Result<&mut ArgumentDeclaration, DeclarationError> {
        let ty = TypeDescriptor::parse(ty)?;
        self.declare(name, ty.with_nullable(nullable))
    }

    /// Declare an argument whose type is taken from `ty` as is.
    pub fn declare(
        &mut self,
        name: &str,
        ty: TypeDescriptor,
    ) -> Result<&mut ArgumentDeclaration, DeclarationError> {
        validate_name(name)?;
        if name == CONTEXT_SLOT {
            return Err(DeclarationError::ReservedName(name.to_string()));
        }
        if self.get(name).is_some() {
            return Err(DeclarationError::DuplicateArgument(name.to_string()));
        }

        self.declarations.push(ArgumentDeclaration {
            name: name.to_string(),
            ty,
            description: None,
            default_value: None,
        });
        let index = self.declarations.len() - 1;
        Ok(&mut self.declarations[index])
    }

    /// Declare an argument typed after `T`, returning a handle to read it back with.
    pub fn arg<T: InputType>(&mut self, name: &str) -> Result<Arg<T>, DeclarationError> {
        self.arg_with::<T>(name, |_| {})
    }

    /// Like [ArgumentDeclarations::arg], with a block to complete the declaration.
    pub fn arg_with<T: InputType>(
        &mut self,
        name: &str,
        block: impl FnOnce(&mut ArgumentDeclaration),
    ) -> Result<Arg<T>, DeclarationError> {
        let declaration = self.declare(name, T::type_descriptor())?;
        block(&mut *declaration);
        if let Err(e) = declaration.validate_default() {
            self.declarations.pop();
            return Err(e);
        }

        Ok(Arg {
            name: name.to_string(),
            _marker: PhantomData,
        })
    }

    /// Check every default value. Declarations completed through the `&mut` returned by
    /// [ArgumentDeclarations::declare] are only checked here.
    pub fn validate(&self) -> Result<(), DeclarationError> {
        self.declarations
            .iter()
            .try_for_each(ArgumentDeclaration::validate_default)
    }

    pub fn get(&self, name: &str) -> Option<&ArgumentDeclaration> {
        self.declarations.iter().find(|d| d.name == name)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &ArgumentDeclaration> {
        self.declarations.iter()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Name to type, as the engine sees it: the reserved context slot first, then every
    /// declared argument in declaration order.
    pub fn descriptor(&self) -> IndexMap<String, TypeDescriptor> {
        std::iter::once((
            CONTEXT_SLOT.to_string(),
            TypeDescriptor::named(CONTEXT_TYPE, false),
        ))
        .chain(
            self.declarations
                .iter()
                .map(|d| (d.name.clone(), d.ty.clone())),
        )
        .collect()
    }
}
