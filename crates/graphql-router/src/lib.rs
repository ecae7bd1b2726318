// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The GraphQL endpoint: accepts `POST` requests carrying a query, hands them to an
//! [ExecutionEngine] together with a per-request [common::context::Context], and writes back
//! either the engine's result or an error envelope.
mod execution_engine;
mod graphql_router;
mod operation_payload;

pub use execution_engine::{ExecutionEngine, GraphQLError, format_error};
pub use graphql_router::{ContextBuilderFn, GraphQLRouter, GraphQLRouterConfig};
pub use operation_payload::OperationsPayload;
