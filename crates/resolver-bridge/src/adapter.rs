// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{
    any::{Any, type_name},
    future::Future,
    io::Write,
    marker::PhantomData,
    sync::{Arc, OnceLock},
};

use async_trait::async_trait;
use common::context::Context;
use indexmap::IndexMap;
use tracing::{debug, error, instrument};

use crate::{
    ArgumentDeclarations, FieldError, FunctionSignature, FunctionWrapper, InvocationArg,
    InvocationError, ResolveScope, Subscriber, TypeDescriptor, UnsupportedOperation,
};

/// Adapts a resolver taking `(ResolveScope, Arc<O>)` to the positional [FunctionWrapper]
/// contract.
///
/// The engine supplies `[receiver, context, value_0, ..., value_n-1]` where `value_i` belongs to
/// the i-th declared argument. The adapter keeps no per-call state, so one instance serves
/// concurrent invocations.
pub struct InvocationAdapter<O, R, F> {
    field_name: String,
    declarations: ArgumentDeclarations,
    signature: FunctionSignature,
    descriptor: OnceLock<IndexMap<String, TypeDescriptor>>,
    resolver: F,
    phantom: PhantomData<fn(Arc<O>) -> R>,
}

impl<O, R, F, Fut> InvocationAdapter<O, R, F>
where
    O: Any + Send + Sync,
    R: Send,
    F: Fn(ResolveScope, Arc<O>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<R, FieldError>> + Send,
{
    pub fn new(
        field_name: impl Into<String>,
        declarations: ArgumentDeclarations,
        return_type: TypeDescriptor,
        resolver: F,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            declarations,
            signature: FunctionSignature {
                receiver_type: type_name::<O>(),
                return_type,
            },
            descriptor: OnceLock::new(),
            resolver,
            phantom: PhantomData,
        }
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn declarations(&self) -> &ArgumentDeclarations {
        &self.declarations
    }

    /// Map the positional argument vector back to the declared names.
    ///
    /// # Panics
    /// If the vector does not hold exactly two slots more than there are declared arguments.
    /// The engine and the declarations then disagree on the argument list, and no positional
    /// mapping can be trusted.
    fn bind(&self, args: Vec<InvocationArg>) -> Result<(ResolveScope, Arc<O>), FieldError> {
        assert_eq!(
            args.len(),
            self.declarations.len() + 2,
            "Argument vector for '{}' does not match its declared arguments",
            self.field_name
        );

        let mut args = args.into_iter();

        let receiver = match args.next() {
            Some(InvocationArg::Receiver(receiver)) => {
                receiver
                    .downcast::<O>()
                    .map_err(|_| InvocationError::ReceiverType {
                        expected: type_name::<O>(),
                    })?
            }
            _ => return Err(InvocationError::UnexpectedSlot { position: 0 }.into()),
        };

        let context: Arc<Context> = match args.next() {
            Some(InvocationArg::Context(context)) => context,
            _ => return Err(InvocationError::MissingContext.into()),
        };

        let arguments = self
            .declarations
            .iter()
            .zip(args)
            .enumerate()
            .map(|(index, (declaration, arg))| match arg {
                InvocationArg::Value(value) => Ok((
                    declaration.name().to_string(),
                    declaration.bind(value)?,
                )),
                _ => Err(FieldError::from(InvocationError::UnexpectedSlot {
                    position: index + 2,
                })),
            })
            .collect::<Result<IndexMap<_, _>, FieldError>>()?;

        debug!(field = %self.field_name, arguments = arguments.len(), "Bound arguments");

        Ok((ResolveScope::new(context, arguments), receiver))
    }
}

#[async_trait]
impl<O, R, F, Fut> FunctionWrapper<R> for InvocationAdapter<O, R, F>
where
    O: Any + Send + Sync,
    R: Send,
    F: Fn(ResolveScope, Arc<O>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<R, FieldError>> + Send,
{
    fn has_receiver(&self) -> bool {
        true
    }

    fn arguments_descriptor(&self) -> &IndexMap<String, TypeDescriptor> {
        self.descriptor
            .get_or_init(|| self.declarations.descriptor())
    }

    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn has_return_type(&self) -> bool {
        true
    }

    fn arity(&self) -> Result<usize, UnsupportedOperation> {
        error!(field = %self.field_name, "Arity requested for an argument-bound resolver");
        Err(UnsupportedOperation("arity"))
    }

    #[instrument(name = "InvocationAdapter::invoke", skip(self, args), fields(field = %self.field_name))]
    async fn invoke(&self, args: Vec<InvocationArg>) -> Result<R, FieldError> {
        let (scope, receiver) = self.bind(args)?;
        (self.resolver)(scope, receiver).await
    }

    async fn invoke_serialized(
        &self,
        _args: Vec<InvocationArg>,
        _subscription_args: &[String],
        _writer: &mut (dyn Write + Send),
    ) -> Result<R, FieldError> {
        error!(field = %self.field_name, "Serialized invocation is not supported");
        Err(UnsupportedOperation("invoke_serialized").into())
    }

    fn subscribe(
        &self,
        subscription: &str,
        _subscriber: Arc<dyn Subscriber>,
    ) -> Result<(), UnsupportedOperation> {
        error!(field = %self.field_name, subscription, "Subscriptions are not supported");
        Err(UnsupportedOperation("subscribe"))
    }

    fn unsubscribe(&self, subscription: &str) -> Result<(), UnsupportedOperation> {
        error!(field = %self.field_name, subscription, "Subscriptions are not supported");
        Err(UnsupportedOperation("unsubscribe"))
    }
}

#[cfg(test)]
mod tests {
    use common::value::Val;

    use super::*;
    use crate::ArgumentError;

    struct Post {
        id: i32,
    }

    fn adapter() -> impl FunctionWrapper<String> {
        let mut declarations = ArgumentDeclarations::new();
        declarations.declare_argument("prefix", "String", false).unwrap();
        declarations.declare_argument("count", "Int", true).unwrap();

        InvocationAdapter::new(
            "label",
            declarations,
            TypeDescriptor::named("String", false),
            |scope: ResolveScope, post: Arc<Post>| async move {
                let prefix: String = scope.get("prefix")?;
                let count: Option<i32> = scope.get("count")?;
                Ok::<_, FieldError>(format!("{prefix}-{}-{}", post.id, count.unwrap_or(1)))
            },
        )
    }

    fn args(values: Vec<Val>) -> Vec<InvocationArg> {
        [
            InvocationArg::receiver(Post { id: 9 }),
            InvocationArg::Context(Arc::new(Context::default())),
        ]
        .into_iter()
        .chain(values.into_iter().map(InvocationArg::Value))
        .collect()
    }

    #[tokio::test]
    async fn invokes_with_named_arguments() {
        let adapter = adapter();

        assert_eq!(
            adapter
                .invoke(args(vec![Val::from("post"), Val::from(3)]))
                .await
                .unwrap(),
            "post-9-3"
        );
        assert_eq!(
            adapter
                .invoke(args(vec![Val::from("post"), Val::Null]))
                .await
                .unwrap(),
            "post-9-1"
        );
    }

    #[tokio::test]
    async fn descriptor_and_metadata() {
        let adapter = adapter();

        let descriptor = adapter.arguments_descriptor();
        assert_eq!(
            descriptor
                .iter()
                .map(|(name, ty)| format!("{name}: {ty}"))
                .collect::<Vec<_>>(),
            vec!["_ctx_: Context!", "prefix: String!", "count: Int"]
        );
        assert!(adapter.has_receiver());
        assert!(adapter.has_return_type());
        assert_eq!(adapter.signature().return_type.to_string(), "String!");
        assert!(adapter.signature().receiver_type.ends_with("Post"));
    }

    #[tokio::test]
    async fn wrong_slot_kinds() {
        let adapter = adapter();

        let mut wrong_receiver = args(vec![Val::from("post"), Val::Null]);
        wrong_receiver[0] = InvocationArg::receiver("not a post");
        assert!(matches!(
            adapter.invoke(wrong_receiver).await,
            Err(FieldError::Invocation(InvocationError::ReceiverType { .. }))
        ));

        let mut missing_context = args(vec![Val::from("post"), Val::Null]);
        missing_context[1] = InvocationArg::Value(Val::Null);
        assert!(matches!(
            adapter.invoke(missing_context).await,
            Err(FieldError::Invocation(InvocationError::MissingContext))
        ));

        let mut misplaced_context = args(vec![Val::from("post"), Val::Null]);
        misplaced_context[3] = InvocationArg::Context(Arc::new(Context::default()));
        assert!(matches!(
            adapter.invoke(misplaced_context).await,
            Err(FieldError::Invocation(InvocationError::UnexpectedSlot { position: 3 }))
        ));
    }

    #[tokio::test]
    async fn value_kind_is_checked_when_binding() {
        let adapter = adapter();

        let result = adapter.invoke(args(vec![Val::from(5), Val::Null])).await;
        assert!(matches!(
            result,
            Err(FieldError::Argument(ArgumentError::TypeMismatch { ref name, .. })) if name == "prefix"
        ));
    }

    #[tokio::test]
    #[should_panic(expected = "does not match its declared arguments")]
    async fn short_argument_vector_panics() {
        let _ = adapter().invoke(args(vec![Val::from("post")])).await;
    }

    #[tokio::test]
    async fn unsupported_entry_points_fail() {
        struct Ignore;
        impl Subscriber for Ignore {
            fn on_next(&self, _value: Val) {}
            fn on_error(&self, _error: FieldError) {}
            fn on_complete(&self) {}
        }

        let adapter = adapter();

        assert_eq!(adapter.arity(), Err(UnsupportedOperation("arity")));
        assert_eq!(
            adapter.subscribe("posts", Arc::new(Ignore)),
            Err(UnsupportedOperation("subscribe"))
        );
        assert_eq!(
            adapter.unsubscribe("posts"),
            Err(UnsupportedOperation("unsubscribe"))
        );

        let mut sink = Vec::new();
        let result = adapter
            .invoke_serialized(args(vec![Val::from("post"), Val::Null]), &[], &mut sink)
            .await;
        assert!(matches!(
            result,
            Err(FieldError::Unsupported(UnsupportedOperation("invoke_serialized")))
        ));
        assert!(sink.is_empty());
    }
}
