// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Configuration lookup for the bridge.
//!
//! Everything that reads a setting goes through [Environment], so tests can substitute a
//! [MapEnvironment] for the process environment.

mod composite;
mod map;

pub use composite::CompositeEnvironment;
pub use map::MapEnvironment;

pub trait Environment: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Interpret the value for `key` as a boolean flag.
    fn enabled(&self, key: &str, default_value: bool) -> Result<bool, EnvError> {
        match self.get(key) {
            Some(value) => match value.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" | "enabled" => Ok(true),
                "false" | "0" | "no" | "off" | "disabled" => Ok(false),
                _ => Err(EnvError::InvalidBoolean {
                    key: key.to_string(),
                    value,
                }),
            },
            None => Ok(default_value),
        }
    }

    fn get_or_else(&self, key: &str, default_value: &str) -> String {
        self.get(key).unwrap_or_else(|| default_value.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error("Invalid value for {key}: {value}. Expected one of true, 1, yes, on, enabled OR false, 0, no, off, disabled")]
    InvalidBoolean { key: String, value: String },
}

/// The process environment.
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_flags() {
        let env = MapEnvironment::from([("ON", "Yes"), ("OFF", " 0 "), ("BAD", "maybe")]);

        assert!(env.enabled("ON", false).unwrap());
        assert!(!env.enabled("OFF", true).unwrap());
        assert!(env.enabled("MISSING", true).unwrap());
        assert!(matches!(
            env.enabled("BAD", false),
            Err(EnvError::InvalidBoolean { .. })
        ));
    }

    #[test]
    fn default_values() {
        let env = MapEnvironment::from([("PATH_KEY", "/api")]);

        assert_eq!(env.get_or_else("PATH_KEY", "/graphql"), "/api");
        assert_eq!(env.get_or_else("OTHER_KEY", "/graphql"), "/graphql");
    }
}
