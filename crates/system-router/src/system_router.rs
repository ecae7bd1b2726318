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
use common::env_const::allow_introspection;
use common::http::{RequestPayload, ResponsePayload};
use common::router::{CompositeRouter, Router};
use graphql_router::{ExecutionEngine, GraphQLRouter, GraphQLRouterConfig};
use playground_router::{PlaygroundRouter, PlaygroundRouterConfig};
use tracing::{instrument, warn};

/// The GraphQL endpoint followed by the playground. Requests neither of them takes get a `404`.
pub struct SystemRouter {
    underlying: CompositeRouter,
    playground_config: Arc<PlaygroundRouterConfig>,
}

impl SystemRouter {
    pub fn new(
        engine: Arc<dyn ExecutionEngine>,
        graphql_config: GraphQLRouterConfig,
        env: Arc<dyn Environment>,
    ) -> Self {
        if !allow_introspection(env.as_ref()) {
            warn!("Introspection is disabled, the playground will not be served");
        }

        let playground_config = Arc::new(PlaygroundRouterConfig::new(env));

        let routers: Vec<Box<dyn Router + Send + Sync>> = vec![
            Box::new(GraphQLRouter::new(engine, Arc::new(graphql_config))),
            Box::new(PlaygroundRouter::new(playground_config.clone())),
        ];

        Self {
            underlying: CompositeRouter::new(routers),
            playground_config,
        }
    }

    pub fn is_playground_request(&self, request_path: &str, request_method: http::Method) -> bool {
        self.playground_config
            .suitable(request_path, request_method)
    }
}

#[async_trait]
impl Router for SystemRouter {
    #[instrument(name = "SystemRouter::route", skip_all)]
    async fn route(&self, request: &mut (dyn RequestPayload + Send)) -> Option<ResponsePayload> {
        self.underlying.route(request).await
    }
}

#[cfg(test)]
mod tests {
    use bridge_env::{CompositeEnvironment, MapEnvironment};
    use bytes::Bytes;
    use common::{
        context::Context,
        env_const::{BRIDGE_GRAPHQL_HTTP_PATH, BRIDGE_PLAYGROUND_HTTP_PATH},
        http::{HttpRequestPayload, ResponseBody},
    };
    use graphql_router::GraphQLError;
    use http::StatusCode;
    use serde_json::{Map, Value};

    use super::*;

    struct Echo;

    #[async_trait]
    impl ExecutionEngine for Echo {
        async fn execute(
            &self,
            query: &str,
            _variables: &Map<String, Value>,
            _operation_name: Option<&str>,
            _context: Arc<Context>,
        ) -> Result<String, GraphQLError> {
            Ok(serde_json::json!({ "data": query }).to_string())
        }
    }

    fn router() -> SystemRouter {
        let overrides = MapEnvironment::from([(BRIDGE_PLAYGROUND_HTTP_PATH, "/ui")]);
        let base = MapEnvironment::from([
            (BRIDGE_PLAYGROUND_HTTP_PATH, "/playground"),
            (BRIDGE_GRAPHQL_HTTP_PATH, "/gql"),
        ]);
        let env: Arc<dyn Environment> = Arc::new(CompositeEnvironment::new(vec![
            Arc::new(overrides),
            Arc::new(base),
        ]));

        SystemRouter::new(
            Arc::new(Echo),
            GraphQLRouterConfig::new(env.as_ref()),
            env,
        )
    }

    fn request(method: http::Method, path: &str, body: &'static str) -> HttpRequestPayload {
        HttpRequestPayload::new(
            http::Request::builder()
                .method(method)
                .uri(path)
                .body(Bytes::from_static(body.as_bytes()))
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn routes_by_path_and_method() {
        let router = router();

        let response = router
            .route(&mut request(http::Method::POST, "/gql", r#"{"query": "{ a }"}"#))
            .await
            .unwrap();
        assert_eq!(response.status_code, StatusCode::OK);
        assert_eq!(
            response.body,
            ResponseBody::Bytes(br#"{"data":"{ a }"}"#.to_vec())
        );

        let response = router
            .route(&mut request(http::Method::GET, "/ui", ""))
            .await
            .unwrap();
        assert_eq!(response.status_code, StatusCode::OK);
        assert_eq!(
            response.headers.get("content-type").as_deref(),
            Some("text/html")
        );
        assert!(router.is_playground_request("/ui", http::Method::GET));
        assert!(!router.is_playground_request("/playground", http::Method::GET));

        for (method, path) in [
            (http::Method::GET, "/gql"),
            (http::Method::POST, "/ui"),
            (http::Method::GET, "/playground"),
        ] {
            let response = router.route(&mut request(method, path, "")).await.unwrap();
            assert_eq!(response.status_code, StatusCode::NOT_FOUND);
        }
    }
}
