// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{any::Any, fmt::Debug, io::Write, sync::Arc};

use async_trait::async_trait;
use common::{context::Context, value::Val};
use indexmap::IndexMap;

use crate::{FieldError, TypeDescriptor, UnsupportedOperation};

/// Name of the descriptor entry standing for the execution context. Not a user argument.
pub const CONTEXT_SLOT: &str = "_ctx_";
pub const CONTEXT_TYPE: &str = "Context";

/// One slot of the positional argument vector supplied by the engine.
pub enum InvocationArg {
    /// The parent object of the field being resolved (always position 0).
    Receiver(Arc<dyn Any + Send + Sync>),
    /// The execution context (always position 1).
    Context(Arc<Context>),
    /// An argument value, in declaration order.
    Value(Val),
}

impl InvocationArg {
    pub fn receiver<O: Any + Send + Sync>(receiver: O) -> Self {
        InvocationArg::Receiver(Arc::new(receiver))
    }
}

impl From<Val> for InvocationArg {
    fn from(value: Val) -> Self {
        InvocationArg::Value(value)
    }
}

impl Debug for InvocationArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvocationArg::Receiver(_) => write!(f, "Receiver"),
            InvocationArg::Context(context) => write!(f, "{context:?}"),
            InvocationArg::Value(value) => write!(f, "Value({value})"),
        }
    }
}

/// What the engine learns about a resolver's callable shape.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    pub receiver_type: &'static str,
    /// Declared by the registering code; never inferred.
    pub return_type: TypeDescriptor,
}

/// A push-style consumer of subscription events.
pub trait Subscriber: Send + Sync {
    fn on_next(&self, value: Val);
    fn on_error(&self, error: FieldError);
    fn on_complete(&self);
}

/// The contract an execution engine requires of every field resolver.
#[async_trait]
pub trait FunctionWrapper<T: Send>: Send + Sync {
    /// Whether position 0 of the argument vector carries the parent object.
    fn has_receiver(&self) -> bool;

    /// Name to type for every slot after the receiver, in the order values are expected.
    fn arguments_descriptor(&self) -> &IndexMap<String, TypeDescriptor>;

    fn signature(&self) -> &FunctionSignature;

    fn has_return_type(&self) -> bool;

    fn arity(&self) -> Result<usize, UnsupportedOperation>;

    async fn invoke(&self, args: Vec<InvocationArg>) -> Result<T, FieldError>;

    /// Invocation variant used when the engine serializes subscription output itself.
    async fn invoke_serialized(
        &self,
        args: Vec<InvocationArg>,
        subscription_args: &[String],
        writer: &mut (dyn Write + Send),
    ) -> Result<T, FieldError>;

    fn subscribe(
        &self,
        subscription: &str,
        subscriber: Arc<dyn Subscriber>,
    ) -> Result<(), UnsupportedOperation>;

    fn unsubscribe(&self, subscription: &str) -> Result<(), UnsupportedOperation>;
}
