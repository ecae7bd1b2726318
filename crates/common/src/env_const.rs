// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use bridge_env::Environment;

pub const BRIDGE_LOG: &str = "BRIDGE_LOG";

pub const BRIDGE_GRAPHQL_HTTP_PATH: &str = "BRIDGE_GRAPHQL_HTTP_PATH";
pub const BRIDGE_PLAYGROUND_HTTP_PATH: &str = "BRIDGE_PLAYGROUND_HTTP_PATH";

pub const BRIDGE_INTROSPECTION: &str = "BRIDGE_INTROSPECTION";

pub fn get_graphql_http_path(env: &dyn Environment) -> String {
    env.get_or_else(BRIDGE_GRAPHQL_HTTP_PATH, "/graphql")
}

pub fn get_playground_http_path(env: &dyn Environment) -> String {
    env.get_or_else(BRIDGE_PLAYGROUND_HTTP_PATH, "/playground")
}

/// Whether the playground (and thus schema introspection through it) is served.
///
/// A malformed value disables it.
pub fn allow_introspection(env: &dyn Environment) -> bool {
    env.enabled(BRIDGE_INTROSPECTION, true).unwrap_or(false)
}
