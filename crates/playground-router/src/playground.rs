// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::path::Path;

use bridge_env::Environment;
use common::env_const::{get_graphql_http_path, get_playground_http_path};
use include_dir::{Dir, include_dir};
use serde::Serialize;

static PLAYGROUND_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/assets");

pub(crate) const INDEX_FILE: &str = "playground.html";

pub(crate) fn get_asset_bytes<P: AsRef<Path>>(
    file_name: P,
    env: &dyn Environment,
) -> Option<Vec<u8>> {
    let file = PLAYGROUND_DIR.get_file(file_name.as_ref())?;

    if file_name.as_ref() == Path::new(INDEX_FILE) {
        let index = file.contents_utf8()?;
        let config = serde_json::to_string(&PlaygroundConfig::new(env)).ok()?;

        Some(
            index
                .replace("window.bridgeConfig = {}", &format!("window.bridgeConfig = {config}"))
                .into_bytes(),
        )
    } else {
        Some(file.contents().to_owned())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlaygroundConfig {
    playground_http_path: String,
    graphql_http_path: String,
}

impl PlaygroundConfig {
    fn new(env: &dyn Environment) -> Self {
        Self {
            playground_http_path: get_playground_http_path(env),
            graphql_http_path: get_graphql_http_path(env),
        }
    }
}
