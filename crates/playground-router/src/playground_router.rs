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
use common::env_const::{allow_introspection, get_playground_http_path};
use common::http::{
    Headers, RequestHead, RequestPayload, ResponseBody, ResponsePayload, strip_leading_slash,
};
use common::router::Router;
use http::StatusCode;
use tracing::debug;

use crate::playground::{self, INDEX_FILE};

pub struct PlaygroundRouterConfig {
    playground_path: String,
    env: Arc<dyn Environment>,
}

impl PlaygroundRouterConfig {
    pub fn new(env: Arc<dyn Environment>) -> Self {
        Self {
            playground_path: strip_leading_slash(&get_playground_http_path(env.as_ref())),
            env,
        }
    }

    pub fn suitable(&self, request_path: &str, request_method: http::Method) -> bool {
        let request_path = strip_leading_slash(request_path);
        let under_playground = match request_path.strip_prefix(&self.playground_path) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        };

        under_playground && request_method == http::Method::GET
    }
}

pub struct PlaygroundRouter {
    config: Arc<PlaygroundRouterConfig>,
}

impl PlaygroundRouter {
    pub fn new(config: Arc<PlaygroundRouterConfig>) -> Self {
        Self { config }
    }

    fn suitable(&self, request_head: &(dyn RequestHead + Send + Sync)) -> bool {
        self.config
            .suitable(&request_head.get_path(), request_head.get_method())
    }
}

#[async_trait]
impl Router for PlaygroundRouter {
    async fn route(&self, request: &mut (dyn RequestPayload + Send)) -> Option<ResponsePayload> {
        if !self.suitable(request.get_head()) {
            return None;
        }

        let env = self.config.env.as_ref();

        if !allow_introspection(env) {
            return Some(ResponsePayload {
                body: ResponseBody::Bytes("Introspection is disabled".as_bytes().to_vec()),
                headers: Headers::new(),
                status_code: StatusCode::OK,
            });
        }

        let path = strip_leading_slash(&request.get_head().get_path());
        let asset_path = match path
            .strip_prefix(&self.config.playground_path)
            .map(strip_leading_slash)
        {
            Some(asset_path) if !asset_path.is_empty() => asset_path,
            _ => INDEX_FILE.to_string(),
        };

        debug!(asset_path = %asset_path, "Serving playground asset");

        let content_type = mime_guess::from_path(&asset_path).first_or_octet_stream();

        match playground::get_asset_bytes(&asset_path, env) {
            Some(asset) => Some(ResponsePayload {
                body: ResponseBody::Bytes(asset),
                headers: Headers::from_vec(vec![
                    (
                        http::header::CACHE_CONTROL.to_string(),
                        "no-cache".to_string(),
                    ),
                    (
                        http::header::CONTENT_TYPE.to_string(),
                        content_type.to_string(),
                    ),
                ]),
                status_code: StatusCode::OK,
            }),
            None => Some(ResponsePayload {
                body: ResponseBody::None,
                headers: Headers::new(),
                status_code: StatusCode::NOT_FOUND,
            }),
        }
    }
}
