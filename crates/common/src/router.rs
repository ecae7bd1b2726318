// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_trait::async_trait;
use http::StatusCode;

use crate::http::{Headers, RequestPayload, ResponseBody, ResponsePayload};

#[async_trait]
pub trait Router: Sync {
    /// Returns `None` if the request is not meant for this router.
    async fn route(&self, request: &mut (dyn RequestPayload + Send)) -> Option<ResponsePayload>;
}

/// Tries each router in order; answers 404 when none of them takes the request.
pub struct CompositeRouter {
    routers: Vec<Box<dyn Router + Send + Sync>>,
}

impl CompositeRouter {
    pub fn new(routers: Vec<Box<dyn Router + Send + Sync>>) -> Self {
        Self { routers }
    }
}

#[async_trait]
impl Router for CompositeRouter {
    async fn route(&self, request: &mut (dyn RequestPayload + Send)) -> Option<ResponsePayload> {
        for router in self.routers.iter() {
            if let Some(response) = router.route(request).await {
                return Some(response);
            }
        }

        Some(ResponsePayload {
            body: ResponseBody::None,
            headers: Headers::new(),
            status_code: StatusCode::NOT_FOUND,
        })
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::http::HttpRequestPayload;

    struct PathRouter(&'static str);

    #[async_trait]
    impl Router for PathRouter {
        async fn route(
            &self,
            request: &mut (dyn RequestPayload + Send),
        ) -> Option<ResponsePayload> {
            (request.get_head().get_path() == self.0).then(|| ResponsePayload {
                body: ResponseBody::Bytes(self.0.as_bytes().to_vec()),
                headers: Headers::new(),
                status_code: StatusCode::OK,
            })
        }
    }

    fn request(path: &str) -> HttpRequestPayload {
        HttpRequestPayload::new(http::Request::get(path).body(Bytes::new()).unwrap())
    }

    #[tokio::test]
    async fn first_matching_router_wins() {
        let router = CompositeRouter::new(vec![
            Box::new(PathRouter("/a")),
            Box::new(PathRouter("/b")),
        ]);

        let response = router.route(&mut request("/b")).await.unwrap();
        assert_eq!(response.status_code, StatusCode::OK);
        assert_eq!(response.body, ResponseBody::Bytes(b"/b".to_vec()));

        let response = router.route(&mut request("/c")).await.unwrap();
        assert_eq!(response.status_code, StatusCode::NOT_FOUND);
    }
}
