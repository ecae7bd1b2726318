// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The execution context handed to every resolver invocation.
//!
//! Its shape is decided by the application (through the context builder configured on the
//! endpoint), so it is a type map rather than a fixed struct.

use std::{
    any::{Any, TypeId, type_name},
    collections::HashMap,
    fmt::Debug,
};

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContextError {
    #[error("No context value of type '{0}'")]
    Missing(&'static str),
}

#[derive(Default)]
pub struct Context {
    data: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Context {
    pub fn builder() -> ContextBuilder {
        ContextBuilder::default()
    }

    pub fn get<D: Any + Send + Sync>(&self) -> Option<&D> {
        self.data
            .get(&TypeId::of::<D>())
            .and_then(|value| value.downcast_ref::<D>())
    }

    /// Like [Context::get], but reports which type was missing.
    pub fn data<D: Any + Send + Sync>(&self) -> Result<&D, ContextError> {
        self.get::<D>()
            .ok_or_else(|| ContextError::Missing(type_name::<D>()))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("entries", &self.data.len())
            .finish()
    }
}

#[derive(Default)]
pub struct ContextBuilder {
    data: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl ContextBuilder {
    /// Add a value, replacing any earlier value of the same type.
    pub fn insert<D: Any + Send + Sync>(&mut self, value: D) -> &mut Self {
        self.data.insert(TypeId::of::<D>(), Box::new(value));
        self
    }

    pub fn build(self) -> Context {
        Context { data: self.data }
    }
}
