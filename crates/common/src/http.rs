// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use bytes::Bytes;
use http::StatusCode;
use serde_json::Value;

pub trait RequestPayload {
    fn get_head(&self) -> &(dyn RequestHead + Send + Sync);
    fn take_body(&mut self) -> Value;
}

/// Represents a HTTP request from which information can be extracted
pub trait RequestHead {
    // return all header values that have the following key
    fn get_headers(&self, key: &str) -> Vec<String>;

    // return the first header
    fn get_header(&self, key: &str) -> Option<String> {
        self.get_headers(&key.to_lowercase()).first().cloned()
    }

    fn get_path(&self) -> String;

    fn get_method(&self) -> http::Method;
}

#[derive(Debug, Clone, Default)]
pub struct Headers {
    inner: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self { inner: vec![] }
    }

    pub fn from_vec(vec: Vec<(String, String)>) -> Self {
        Self {
            inner: vec
                .into_iter()
                .map(|(key, value)| (key.to_lowercase(), value))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let key = key.to_lowercase();
        self.inner
            .iter()
            .find(|(k, _)| k == &key)
            .map(|(_, v)| v.clone())
    }

    pub fn insert(&mut self, key: String, value: String) {
        self.inner.push((key.to_lowercase(), value));
    }
}

impl IntoIterator for Headers {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

#[derive(Debug)]
pub struct ResponsePayload {
    pub body: ResponseBody,
    pub headers: Headers,
    pub status_code: StatusCode,
}

#[derive(Debug, PartialEq)]
pub enum ResponseBody {
    Bytes(Vec<u8>),
    None,
}

/// A request backed by the `http` crate types, for servers that hand us an `http::Request`.
pub struct HttpRequestPayload {
    head: http::request::Parts,
    body: Value,
}

impl HttpRequestPayload {
    /// A body that is not valid JSON is kept as `Value::Null`; routers treat that as a bad
    /// request.
    pub fn new(request: http::Request<Bytes>) -> Self {
        let (head, body) = request.into_parts();
        let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
        Self { head, body }
    }
}

impl RequestPayload for HttpRequestPayload {
    fn get_head(&self) -> &(dyn RequestHead + Send + Sync) {
        &self.head
    }

    fn take_body(&mut self) -> Value {
        self.body.take()
    }
}

impl RequestHead for http::request::Parts {
    fn get_headers(&self, key: &str) -> Vec<String> {
        self.headers
            .get_all(key)
            .iter()
            .filter_map(|value| value.to_str().ok().map(str::to_string))
            .collect()
    }

    fn get_path(&self) -> String {
        self.uri.path().to_string()
    }

    fn get_method(&self) -> http::Method {
        self.method.clone()
    }
}

pub fn strip_leading_slash(path: &str) -> String {
    path.strip_prefix('/').unwrap_or(path).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_request_payload() {
        let request = http::Request::post("/graphql?x=1")
            .header("X-Tenant", "a")
            .header("x-tenant", "b")
            .body(Bytes::from_static(br#"{"query": "{ a }"}"#))
            .unwrap();
        let mut payload = HttpRequestPayload::new(request);

        let head = payload.get_head();
        assert_eq!(head.get_path(), "/graphql");
        assert_eq!(head.get_method(), http::Method::POST);
        assert_eq!(head.get_headers("x-tenant"), vec!["a", "b"]);
        assert_eq!(head.get_header("X-TENANT").as_deref(), Some("a"));

        assert_eq!(payload.take_body(), serde_json::json!({"query": "{ a }"}));
        assert_eq!(payload.take_body(), Value::Null);
    }

    #[test]
    fn malformed_body_is_null() {
        let request = http::Request::post("/graphql")
            .body(Bytes::from_static(b"not json"))
            .unwrap();
        let mut payload = HttpRequestPayload::new(request);

        assert_eq!(payload.take_body(), Value::Null);
    }

    #[test]
    fn header_keys_are_case_insensitive() {
        let mut headers = Headers::from_vec(vec![("Content-Type".into(), "text/html".into())]);
        headers.insert("Cache-Control".into(), "no-cache".into());

        assert_eq!(headers.get("content-type").as_deref(), Some("text/html"));
        assert_eq!(headers.get("CACHE-CONTROL").as_deref(), Some("no-cache"));
    }
}
