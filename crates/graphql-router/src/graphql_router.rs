// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use async_trait::async_trait;
use bridge_env::Environment;
use common::context::{Context, ContextBuilder};
use common::env_const::get_graphql_http_path;
use common::http::{Headers, RequestHead, RequestPayload, ResponseBody, ResponsePayload};
use common::router::Router;
use http::StatusCode;
use tracing::{error, instrument};

use crate::{ExecutionEngine, OperationsPayload, format_error};

/// Populates the execution context of one request from its head (headers, path, ...).
pub type ContextBuilderFn = dyn Fn(&dyn RequestHead, &mut ContextBuilder) + Send + Sync;

pub struct GraphQLRouterConfig {
    graphql_path: String,
    context_builder: Option<Arc<ContextBuilderFn>>,
}

impl GraphQLRouterConfig {
    pub fn new(env: &dyn Environment) -> Self {
        Self {
            graphql_path: get_graphql_http_path(env),
            context_builder: None,
        }
    }

    pub fn with_context_builder(
        mut self,
        context_builder: impl Fn(&dyn RequestHead, &mut ContextBuilder) + Send + Sync + 'static,
    ) -> Self {
        self.context_builder = Some(Arc::new(context_builder));
        self
    }

    pub fn graphql_path(&self) -> &str {
        &self.graphql_path
    }

    fn suitable(&self, request_head: &(dyn RequestHead + Send + Sync)) -> bool {
        request_head.get_path() == self.graphql_path
            && request_head.get_method() == http::Method::POST
    }

    fn build_context(&self, request_head: &dyn RequestHead) -> Context {
        let mut builder = Context::builder();
        if let Some(context_builder) = &self.context_builder {
            context_builder(request_head, &mut builder);
        }
        builder.build()
    }
}

pub struct GraphQLRouter {
    engine: Arc<dyn ExecutionEngine>,
    config: Arc<GraphQLRouterConfig>,
}

impl GraphQLRouter {
    pub fn new(engine: Arc<dyn ExecutionEngine>, config: Arc<GraphQLRouterConfig>) -> Self {
        Self { engine, config }
    }
}

#[async_trait]
impl Router for GraphQLRouter {
    /// Executes the posted operation. Both successful results and engine errors are answered
    /// with `200 OK`; a body that isn't a GraphQL request is a `400`.
    #[instrument(name = "GraphQLRouter::route", skip(self, request))]
    async fn route(&self, request: &mut (dyn RequestPayload + Send)) -> Option<ResponsePayload> {
        if !self.config.suitable(request.get_head()) {
            return None;
        }

        let body = request.take_body();
        let operations_payload = match OperationsPayload::from_json(body) {
            Ok(operations_payload) => operations_payload,
            Err(e) => {
                error!("Invalid GraphQL request body: {e}");
                return Some(ResponsePayload {
                    body: ResponseBody::None,
                    headers: Headers::new(),
                    status_code: StatusCode::BAD_REQUEST,
                });
            }
        };

        let context = Arc::new(self.config.build_context(request.get_head()));

        let result = self
            .engine
            .execute(
                &operations_payload.query,
                &operations_payload.variables,
                operations_payload.operation_name.as_deref(),
                context,
            )
            .await;

        let body = match result {
            Ok(result) => result,
            Err(e) => {
                error!(error = %e, "Error while executing request");
                format_error(&e)
            }
        };

        Some(ResponsePayload {
            body: ResponseBody::Bytes(body.into_bytes()),
            headers: Headers::from_vec(vec![(
                http::header::CONTENT_TYPE.to_string(),
                "application/json".to_string(),
            )]),
            status_code: StatusCode::OK,
        })
    }
}
