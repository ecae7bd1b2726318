// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Bridges strongly-typed field resolvers to the dynamic invocation contract of a GraphQL
//! execution engine.
//!
//! A field registers its arguments ([ArgumentDeclarations]) and a resolver through a
//! [PropertyBuilder]. The result is an [InvocationAdapter] exposed to the engine as a
//! [FunctionWrapper]: the engine reads the argument descriptor to validate incoming queries, then
//! calls [FunctionWrapper::invoke] with a positional argument vector (receiver, context, then one
//! value per declared argument). The adapter maps that vector back to names and hands the
//! resolver a [ResolveScope] with typed access to its arguments.

mod adapter;
mod argument_type;
mod declaration;
mod error;
mod function_wrapper;
mod property;
mod scope;
mod type_descriptor;

pub use adapter::InvocationAdapter;
pub use argument_type::{FromArgument, InputType};
pub use declaration::{Arg, ArgumentDeclaration, ArgumentDeclarations, validate_name};
pub use error::{
    ArgumentError, BoxError, DeclarationError, FieldError, InvocationError, UnsupportedOperation,
};
pub use function_wrapper::{
    CONTEXT_SLOT, CONTEXT_TYPE, FunctionSignature, FunctionWrapper, InvocationArg, Subscriber,
};
pub use property::{PropertyBuilder, PropertyDefinition};
pub use scope::{BoundArgument, ResolveScope};
pub use type_descriptor::TypeDescriptor;
