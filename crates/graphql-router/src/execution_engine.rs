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
use common::context::Context;
use serde_json::{Map, Value, json};
use thiserror::Error;

/// A failure reported by the engine for a whole request.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct GraphQLError {
    pub message: String,
    pub locations: Vec<Pos>,
}

impl GraphQLError {
    pub fn new(message: impl Into<String>, locations: Vec<Pos>) -> Self {
        Self {
            message: message.into(),
            locations,
        }
    }
}

/// The GraphQL execution engine the endpoint delegates to.
#[async_trait]
pub trait ExecutionEngine: Send + Sync {
    /// Execute one request, returning the serialized response document.
    async fn execute(
        &self,
        query: &str,
        variables: &Map<String, Value>,
        operation_name: Option<&str>,
        context: Arc<Context>,
    ) -> Result<String, GraphQLError>;
}

/// Format an engine error as a GraphQL response document.
///
/// `path` and `extensions` are always empty.
pub fn format_error(error: &GraphQLError) -> String {
    let locations = error
        .locations
        .iter()
        .map(|pos| json!({"line": pos.line, "column": pos.column}))
        .collect::<Vec<_>>();

    json!({
        "errors": [{
            "message": error.message,
            "locations": locations,
            "path": [],
            "extensions": {}
        }]
    })
    .to_string()
}
