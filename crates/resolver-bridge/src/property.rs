// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{any::Any, future::Future, marker::PhantomData, sync::Arc};

use common::context::Context;
use indexmap::IndexMap;

use crate::{
    Arg, ArgumentDeclaration, ArgumentDeclarations, DeclarationError, FieldError,
    FunctionWrapper, InputType, InvocationAdapter, ResolveScope, TypeDescriptor, validate_name,
};

type AdapterFactory<R> = Box<
    dyn FnOnce(String, ArgumentDeclarations, TypeDescriptor) -> Arc<dyn FunctionWrapper<R>> + Send,
>;

/// Collects everything needed to expose one field of `O` that resolves to `R`.
///
/// The adapter is created in [PropertyBuilder::build], so arguments may be declared before or
/// after the resolver is set.
pub struct PropertyBuilder<O, R: Send> {
    name: String,
    description: Option<String>,
    return_type: TypeDescriptor,
    declarations: ArgumentDeclarations,
    factory: Option<AdapterFactory<R>>,
    phantom: PhantomData<fn(Arc<O>)>,
}

impl<O, R> PropertyBuilder<O, R>
where
    O: Any + Send + Sync,
    R: Send + 'static,
{
    pub fn new(name: &str, return_type: TypeDescriptor) -> Result<Self, DeclarationError> {
        validate_name(name)?;

        Ok(Self {
            name: name.to_string(),
            description: None,
            return_type,
            declarations: ArgumentDeclarations::new(),
            factory: None,
            phantom: PhantomData,
        })
    }

    /// A field whose return type is derived from `R`.
    pub fn typed(name: &str) -> Result<Self, DeclarationError>
    where
        R: InputType,
    {
        Self::new(name, R::type_descriptor())
    }

    pub fn description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    pub fn arg<T: InputType>(&mut self, name: &str) -> Result<Arg<T>, DeclarationError> {
        self.declarations.arg(name)
    }

    pub fn arg_with<T: InputType>(
        &mut self,
        name: &str,
        block: impl FnOnce(&mut ArgumentDeclaration),
    ) -> Result<Arg<T>, DeclarationError> {
        self.declarations.arg_with(name, block)
    }

    pub fn declare_argument(
        &mut self,
        name: &str,
        ty: &str,
        nullable: bool,
    ) -> Result<&mut ArgumentDeclaration, DeclarationError> {
        self.declarations.declare_argument(name, ty, nullable)
    }

    /// Resolve with access to the declared arguments.
    pub fn resolve<F, Fut>(&mut self, resolver: F) -> &mut Self
    where
        F: Fn(ResolveScope, Arc<O>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, FieldError>> + Send + 'static,
    {
        self.factory = Some(Box::new(
            move |name: String,
                  declarations: ArgumentDeclarations,
                  return_type: TypeDescriptor|
                  -> Arc<dyn FunctionWrapper<R>> {
                Arc::new(InvocationAdapter::new(
                    name,
                    declarations,
                    return_type,
                    resolver,
                ))
            },
        ));
        self
    }

    pub fn resolve_with_context<F, Fut>(&mut self, resolver: F) -> &mut Self
    where
        F: Fn(Arc<Context>, Arc<O>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, FieldError>> + Send + 'static,
    {
        self.resolve(move |scope: ResolveScope, receiver: Arc<O>| {
            resolver(scope.context().clone(), receiver)
        })
    }

    pub fn resolve_value<F, Fut>(&mut self, resolver: F) -> &mut Self
    where
        F: Fn(Arc<O>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, FieldError>> + Send + 'static,
    {
        self.resolve(move |_scope: ResolveScope, receiver: Arc<O>| resolver(receiver))
    }

    pub fn build(self) -> Result<PropertyDefinition<R>, DeclarationError> {
        self.declarations.validate()?;

        let factory = self
            .factory
            .ok_or_else(|| DeclarationError::MissingResolver(self.name.clone()))?;

        Ok(PropertyDefinition {
            wrapper: factory(self.name.clone(), self.declarations, self.return_type.clone()),
            name: self.name,
            description: self.description,
            return_type: self.return_type,
        })
    }
}

/// A field ready to be handed to the engine.
pub struct PropertyDefinition<R: Send> {
    name: String,
    description: Option<String>,
    return_type: TypeDescriptor,
    wrapper: Arc<dyn FunctionWrapper<R>>,
}

impl<R: Send> PropertyDefinition<R> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn return_type(&self) -> &TypeDescriptor {
        &self.return_type
    }

    pub fn arguments_descriptor(&self) -> &IndexMap<String, TypeDescriptor> {
        self.wrapper.arguments_descriptor()
    }

    pub fn wrapper(&self) -> &Arc<dyn FunctionWrapper<R>> {
        &self.wrapper
    }
}
