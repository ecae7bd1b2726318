// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use common::value::Val;

use crate::{
    TypeDescriptor,
    type_descriptor::{BOOLEAN, FLOAT, INT, STRING},
};

/// A Rust type a resolver can read an argument as.
pub trait FromArgument: Sized {
    /// The name reported as "expected" in type mismatch errors.
    fn type_name() -> String;

    /// Whether null can be represented (`Option<T>`, or a raw value type).
    fn nullable() -> bool {
        false
    }

    /// Whether an argument declared as `declared` may be read as this type. Nullability of
    /// `declared` is not considered here.
    fn compatible_with(declared: &TypeDescriptor) -> bool;

    /// `None` if the runtime kind of `val` does not convert.
    fn from_val(val: &Val) -> Option<Self>;
}

/// A [FromArgument] type that also determines the type to declare, so that an argument can be
/// declared from the Rust type alone.
pub trait InputType: FromArgument {
    fn type_descriptor() -> TypeDescriptor;
}

macro_rules! scalar_argument {
    ($ty:ty, $graphql:expr, |$declared:ident| $compatible:expr, |$val:ident| $convert:expr) => {
        impl FromArgument for $ty {
            fn type_name() -> String {
                Self::type_descriptor().to_string()
            }

            fn compatible_with($declared: &TypeDescriptor) -> bool {
                $compatible
            }

            fn from_val($val: &Val) -> Option<Self> {
                $convert
            }
        }

        impl InputType for $ty {
            fn type_descriptor() -> TypeDescriptor {
                TypeDescriptor::named($graphql, false)
            }
        }
    };
}

scalar_argument!(
    bool,
    BOOLEAN,
    |declared| declared.named_type() == Some(BOOLEAN),
    |val| match val {
        Val::Bool(b) => Some(*b),
        _ => None,
    }
);

scalar_argument!(
    i32,
    INT,
    |declared| declared.named_type() == Some(INT),
    |val| match val {
        Val::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        _ => None,
    }
);

scalar_argument!(
    i64,
    INT,
    |declared| declared.named_type() == Some(INT),
    |val| match val {
        Val::Number(n) => n.as_i64(),
        _ => None,
    }
);

scalar_argument!(
    f64,
    FLOAT,
    |declared| matches!(declared.named_type(), Some(FLOAT | INT)),
    |val| match val {
        Val::Number(n) => Some(n.as_f64()),
        _ => None,
    }
);

// Strings also carry IDs, enum values and custom scalars
scalar_argument!(
    String,
    STRING,
    |declared| declared
        .named_type()
        .is_some_and(|name| !matches!(name, INT | FLOAT | BOOLEAN)),
    |val| match val {
        Val::String(s) | Val::Enum(s) => Some(s.clone()),
        Val::Number(n) if n.is_integral() => Some(n.to_string()),
        _ => None,
    }
);

impl<T: FromArgument> FromArgument for Option<T> {
    fn type_name() -> String {
        T::type_name().trim_end_matches('!').to_string()
    }

    fn nullable() -> bool {
        true
    }

    fn compatible_with(declared: &TypeDescriptor) -> bool {
        T::compatible_with(declared)
    }

    fn from_val(val: &Val) -> Option<Self> {
        match val {
            Val::Null => Some(None),
            val => T::from_val(val).map(Some),
        }
    }
}

impl<T: InputType> InputType for Option<T> {
    fn type_descriptor() -> TypeDescriptor {
        T::type_descriptor().with_nullable(true)
    }
}

impl<T: FromArgument> FromArgument for Vec<T> {
    fn type_name() -> String {
        format!("[{}]!", T::type_name())
    }

    fn compatible_with(declared: &TypeDescriptor) -> bool {
        declared
            .list_element()
            .is_some_and(|element| T::compatible_with(&element))
    }

    fn from_val(val: &Val) -> Option<Self> {
        match val {
            Val::List(items) => items.iter().map(T::from_val).collect(),
            _ => None,
        }
    }
}

impl<T: InputType> InputType for Vec<T> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::list(T::type_descriptor(), false)
    }
}

/// The raw value, whatever its declared type.
impl FromArgument for Val {
    fn type_name() -> String {
        "Any".to_string()
    }

    fn nullable() -> bool {
        true
    }

    fn compatible_with(_declared: &TypeDescriptor) -> bool {
        true
    }

    fn from_val(val: &Val) -> Option<Self> {
        Some(val.clone())
    }
}

impl FromArgument for serde_json::Value {
    fn type_name() -> String {
        "Any".to_string()
    }

    fn nullable() -> bool {
        true
    }

    fn compatible_with(_declared: &TypeDescriptor) -> bool {
        true
    }

    fn from_val(val: &Val) -> Option<Self> {
        val.clone().try_into().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(sdl: &str) -> TypeDescriptor {
        TypeDescriptor::parse(sdl).unwrap()
    }

    #[test]
    fn declared_types() {
        assert_eq!(i32::type_descriptor().to_string(), "Int!");
        assert_eq!(Option::<bool>::type_descriptor().to_string(), "Boolean");
        assert_eq!(Vec::<String>::type_descriptor().to_string(), "[String!]!");
        assert_eq!(
            Option::<Vec<Option<f64>>>::type_descriptor().to_string(),
            "[Float]"
        );
    }

    #[test]
    fn type_names() {
        assert_eq!(i64::type_name(), "Int!");
        assert_eq!(Option::<i64>::type_name(), "Int");
        assert_eq!(Vec::<Option<String>>::type_name(), "[String]!");
        assert_eq!(Val::type_name(), "Any");
    }

    #[test]
    fn compatibility() {
        assert!(i32::compatible_with(&ty("Int")));
        assert!(!i32::compatible_with(&ty("Boolean!")));
        assert!(f64::compatible_with(&ty("Int!")));
        assert!(String::compatible_with(&ty("ID")));
        assert!(String::compatible_with(&ty("Status")));
        assert!(!String::compatible_with(&ty("Float")));
        assert!(!String::compatible_with(&ty("[String]")));
        assert!(Vec::<i32>::compatible_with(&ty("[Int!]")));
        assert!(!Vec::<i32>::compatible_with(&ty("Int")));
        assert!(Option::<bool>::compatible_with(&ty("Boolean!")));
        assert!(Val::compatible_with(&ty("[[Anything]]")));
    }

    #[test]
    fn conversions() {
        assert_eq!(i32::from_val(&Val::from(42)), Some(42));
        assert_eq!(i32::from_val(&Val::from(i64::MAX)), None);
        assert_eq!(i64::from_val(&Val::from(i64::MAX)), Some(i64::MAX));
        assert_eq!(f64::from_val(&Val::from(2)), Some(2.0));
        assert_eq!(String::from_val(&Val::Enum("DRAFT".into())).as_deref(), Some("DRAFT"));
        assert_eq!(String::from_val(&Val::from(12)).as_deref(), Some("12"));
        assert_eq!(bool::from_val(&Val::Null), None);
        assert_eq!(Option::<bool>::from_val(&Val::Null), Some(None));
        assert_eq!(
            Vec::<Option<i32>>::from_val(&Val::from(vec![Some(1), None])),
            Some(vec![Some(1), None])
        );
        assert_eq!(Vec::<i32>::from_val(&Val::from(vec![Some(1), None])), None);
        assert_eq!(
            serde_json::Value::from_val(&Val::from(vec!["a"])),
            Some(serde_json::json!(["a"]))
        );
    }
}
