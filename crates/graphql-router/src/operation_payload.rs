// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde::Deserialize;
use serde_json::{Map, Value};

/// A GraphQL request as posted by clients.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationsPayload {
    pub operation_name: Option<String>,
    pub query: String,
    pub variables: Map<String, Value>,
}

impl OperationsPayload {
    pub fn from_json(json: Value) -> Result<Self, serde_json::Error> {
        #[derive(Debug, Deserialize)]
        struct RawOperationsPayload {
            #[serde(rename = "operationName")]
            operation_name: Option<String>,
            query: String,
            variables: Option<Map<String, Value>>,
        }

        serde_json::from_value::<RawOperationsPayload>(json).map(|raw_payload| OperationsPayload {
            operation_name: raw_payload.operation_name,
            query: raw_payload.query,
            variables: raw_payload.variables.unwrap_or_default(),
        })
    }
}
