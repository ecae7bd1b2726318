// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use async_graphql_parser::Pos;
use async_trait::async_trait;
use bridge_env::MapEnvironment;
use bytes::Bytes;
use common::{
    context::Context,
    env_const::BRIDGE_GRAPHQL_HTTP_PATH,
    http::{HttpRequestPayload, ResponseBody, ResponsePayload},
    router::{CompositeRouter, Router},
    value::Val,
};
use graphql_router::{ExecutionEngine, GraphQLError, GraphQLRouter, GraphQLRouterConfig};
use http::StatusCode;
use resolver_bridge::{FieldError, FunctionWrapper, InvocationArg, PropertyBuilder};
use serde_json::{Map, Value, json};
use test_log::test;

struct Query;

struct Viewer(String);

/// Resolves `post(id, includeDrafts)` on the root object through the bridge, and fails every
/// query mentioning `boom`.
struct PostEngine {
    post: Arc<dyn FunctionWrapper<String>>,
}

impl PostEngine {
    fn new() -> Self {
        let mut builder = PropertyBuilder::<Query, String>::typed("post").unwrap();
        let id = builder.arg::<i32>("id").unwrap();
        builder.arg::<Option<bool>>("includeDrafts").unwrap();
        builder.resolve(move |scope, _query| {
            let id = id.clone();
            async move {
                let viewer = scope.context().data::<Viewer>()?;
                let drafts = scope.get::<Option<bool>>("includeDrafts")?.unwrap_or(false);
                Ok::<_, FieldError>(format!(
                    "post {} for {} (drafts: {drafts})",
                    scope.arg(&id)?,
                    viewer.0
                ))
            }
        });

        Self {
            post: builder.build().unwrap().wrapper().clone(),
        }
    }
}

#[async_trait]
impl ExecutionEngine for PostEngine {
    async fn execute(
        &self,
        query: &str,
        variables: &Map<String, Value>,
        _operation_name: Option<&str>,
        context: Arc<Context>,
    ) -> Result<String, GraphQLError> {
        if query.contains("boom") {
            return Err(GraphQLError::new("boom", vec![Pos { line: 3, column: 5 }]));
        }

        let args = [InvocationArg::receiver(Query), InvocationArg::Context(context)]
            .into_iter()
            .chain(
                self.post
                    .arguments_descriptor()
                    .keys()
                    .skip(1)
                    .map(|name| variables.get(name).cloned().unwrap_or(Value::Null))
                    .map(|value| InvocationArg::Value(Val::from(value))),
            )
            .collect();

        match self.post.invoke(args).await {
            Ok(post) => Ok(json!({"data": {"post": post}}).to_string()),
            Err(e) => Err(GraphQLError::new(
                e.user_error_message().unwrap_or_else(|| "Internal error".to_string()),
                vec![],
            )),
        }
    }
}

fn router(env: &MapEnvironment) -> GraphQLRouter {
    let config = GraphQLRouterConfig::new(env).with_context_builder(|head, context| {
        if let Some(viewer) = head.get_header("x-viewer") {
            context.insert(Viewer(viewer));
        }
    });

    GraphQLRouter::new(Arc::new(PostEngine::new()), Arc::new(config))
}

fn post(path: &str, body: &str) -> HttpRequestPayload {
    HttpRequestPayload::new(
        http::Request::post(path)
            .header("X-Viewer", "ada")
            .body(Bytes::from(body.to_string()))
            .unwrap(),
    )
}

fn body_json(response: &ResponsePayload) -> Value {
    match &response.body {
        ResponseBody::Bytes(bytes) => serde_json::from_slice(bytes).unwrap(),
        ResponseBody::None => panic!("Empty response body"),
    }
}

#[test(tokio::test)]
async fn executes_with_request_context() {
    let router = router(&MapEnvironment::new());

    let response = router
        .route(&mut post(
            "/graphql",
            r#"{"query": "query($id: Int!) { post(id: $id) }", "variables": {"id": 42}}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status_code, StatusCode::OK);
    assert_eq!(
        response.headers.get("content-type").as_deref(),
        Some("application/json")
    );
    assert_eq!(
        body_json(&response),
        json!({"data": {"post": "post 42 for ada (drafts: false)"}})
    );
}

#[test(tokio::test)]
async fn engine_errors_use_the_envelope() {
    let router = router(&MapEnvironment::new());

    let response = router
        .route(&mut post("/graphql", r#"{"query": "{ boom }"}"#))
        .await
        .unwrap();

    assert_eq!(response.status_code, StatusCode::OK);
    assert_eq!(
        response.body,
        ResponseBody::Bytes(
            br#"{"errors":[{"message":"boom","locations":[{"line":3,"column":5}],"path":[],"extensions":{}}]}"#
                .to_vec()
        )
    );
}

#[test(tokio::test)]
async fn resolver_failures_reach_the_client() {
    let router = router(&MapEnvironment::new());

    let response = router
        .route(&mut post(
            "/graphql",
            r#"{"query": "{ post }", "variables": {"id": 1, "includeDrafts": "yes"}}"#,
        ))
        .await
        .unwrap();

    assert_eq!(
        body_json(&response)["errors"][0]["message"],
        json!("Argument 'includeDrafts' of type 'String' is used as 'Boolean'")
    );
}

#[test(tokio::test)]
async fn malformed_body_is_a_bad_request() {
    let router = router(&MapEnvironment::new());

    for body in ["not json", r#"{"variables": {}}"#] {
        let response = router.route(&mut post("/graphql", body)).await.unwrap();

        assert_eq!(response.status_code, StatusCode::BAD_REQUEST);
        assert_eq!(response.body, ResponseBody::None);
    }
}

#[test(tokio::test)]
async fn only_posts_to_the_configured_path() {
    let env = MapEnvironment::from([(BRIDGE_GRAPHQL_HTTP_PATH, "/api")]);
    let router = CompositeRouter::new(vec![Box::new(router(&env))]);

    let response = router
        .route(&mut post("/graphql", r#"{"query": "{ boom }"}"#))
        .await
        .unwrap();
    assert_eq!(response.status_code, StatusCode::NOT_FOUND);

    let mut get = HttpRequestPayload::new(http::Request::get("/api").body(Bytes::new()).unwrap());
    let response = router.route(&mut get).await.unwrap();
    assert_eq!(response.status_code, StatusCode::NOT_FOUND);

    let response = router
        .route(&mut post("/api", r#"{"query": "{ boom }"}"#))
        .await
        .unwrap();
    assert_eq!(response.status_code, StatusCode::OK);
}
