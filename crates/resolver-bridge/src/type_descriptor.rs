// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::Display;

use async_graphql_parser::types::{BaseType, Type};
use async_graphql_value::Name;
use common::value::Val;

use crate::{DeclarationError, declaration::is_valid_name};

pub(crate) const INT: &str = "Int";
pub(crate) const FLOAT: &str = "Float";
pub(crate) const STRING: &str = "String";
pub(crate) const BOOLEAN: &str = "Boolean";
pub(crate) const ID: &str = "ID";

/// The declared GraphQL type of an argument (or of a field's return value).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor(Type);

impl TypeDescriptor {
    /// Parse SDL notation such as `Int!` or `[String!]`.
    pub fn parse(sdl: &str) -> Result<Self, DeclarationError> {
        Type::new(sdl)
            .map(TypeDescriptor)
            .filter(|ty| is_valid_name(ty.underlying()))
            .ok_or_else(|| DeclarationError::InvalidType(sdl.to_string()))
    }

    pub fn named(name: &str, nullable: bool) -> Self {
        TypeDescriptor(Type {
            base: BaseType::Named(Name::new(name)),
            nullable,
        })
    }

    pub fn list(element: TypeDescriptor, nullable: bool) -> Self {
        TypeDescriptor(Type {
            base: BaseType::List(Box::new(element.0)),
            nullable,
        })
    }

    pub fn nullable(&self) -> bool {
        self.0.nullable
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.0.nullable = nullable;
        self
    }

    /// The type name, unless this is a list type.
    pub fn named_type(&self) -> Option<&str> {
        match &self.0.base {
            BaseType::Named(name) => Some(name.as_str()),
            BaseType::List(_) => None,
        }
    }

    pub fn list_element(&self) -> Option<TypeDescriptor> {
        match &self.0.base {
            BaseType::Named(_) => None,
            BaseType::List(element) => Some(TypeDescriptor(element.as_ref().clone())),
        }
    }

    /// The innermost named type (`Int` for `[[Int!]]`).
    pub fn underlying(&self) -> &str {
        fn underlying(ty: &Type) -> &str {
            match &ty.base {
                BaseType::Named(name) => name.as_str(),
                BaseType::List(element) => underlying(element),
            }
        }
        underlying(&self.0)
    }

    pub fn as_type(&self) -> &Type {
        &self.0
    }

    /// Whether the runtime kind of `val` fits this type.
    ///
    /// A top-level null is always accepted: nullability is enforced when the argument is read.
    /// Inside a list, null is accepted only if the element type is nullable.
    pub fn accepts(&self, val: &Val) -> bool {
        val.is_null() || accepts(&self.0, val)
    }

    /// How to report the kind of a value this type does not accept.
    pub(crate) fn rejected_kind(&self, val: &Val) -> String {
        match val {
            Val::Number(n) if self.named_type() == Some(INT) && n.is_integral() => {
                "Int(out of range)".to_string()
            }
            _ => val.kind_name().to_string(),
        }
    }
}

fn accepts(ty: &Type, val: &Val) -> bool {
    match (&ty.base, val) {
        (BaseType::List(element), Val::List(items)) => items.iter().all(|item| {
            if item.is_null() {
                element.nullable
            } else {
                accepts(element, item)
            }
        }),
        (BaseType::List(_), _) => false,
        (BaseType::Named(name), val) => match name.as_str() {
            INT => matches!(
                val,
                Val::Number(n) if n.as_i64().is_some_and(|n| i32::try_from(n).is_ok())
            ),
            FLOAT => matches!(val, Val::Number(_)),
            STRING => matches!(val, Val::String(_)),
            BOOLEAN => matches!(val, Val::Bool(_)),
            ID => matches!(val, Val::String(_)) || matches!(val, Val::Number(n) if n.is_integral()),
            // Custom scalars, enums and input objects: the engine has checked the shape against
            // the schema already
            _ => !matches!(val, Val::List(_)),
        },
    }
}

impl Display for TypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl From<Type> for TypeDescriptor {
    fn from(ty: Type) -> Self {
        TypeDescriptor(ty)
    }
}
