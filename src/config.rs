//! Storage provider configurations
//!
//! Connection settings for the stores a [`Provider`](crate::Provider) fronts.
//! The variant set is closed: each store has fixed wire-building behavior,
//! so configs are a sum type rather than an open trait.

use serde::{Deserialize, Serialize};

/// Connection settings for a storage provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageConfig {
    Redis(RedisConfig),
    Snowflake(SnowflakeConfig),
    Postgres(PostgresConfig),
}

impl StorageConfig {
    /// Software tag reported to the control plane
    pub fn software(&self) -> &'static str {
        match self {
            Self::Redis(_) => "redis",
            Self::Snowflake(_) => "Snowflake",
            Self::Postgres(_) => "postgres",
        }
    }

    /// Store-type tag, for the stores that distinguish one
    pub fn store_type(&self) -> &'static str {
        match self {
            Self::Snowflake(_) => "SNOWFLAKE_OFFLINE",
            Self::Redis(_) | Self::Postgres(_) => "",
        }
    }

    /// Serialized connection payload embedded in the provider message
    ///
    /// Snowflake is the only payload-carrying store. Redis and Postgres
    /// pass their connection settings as structured sub-fields instead
    /// and produce an empty payload here.
    pub fn serialize(&self) -> Vec<u8> {
        match self {
            Self::Snowflake(config) => config.serialize(),
            Self::Redis(_) | Self::Postgres(_) => Vec::new(),
        }
    }
}

/// Connection settings for a Redis store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub password: String,
    pub db: u32,
}

/// Connection settings for a Snowflake warehouse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnowflakeConfig {
    pub account: String,
    pub database: String,
    pub organization: String,
    pub username: String,
    pub password: String,
    pub schema: String,
}

impl SnowflakeConfig {
    /// Flat key-value record of connection parameters, JSON-encoded
    pub fn serialize(&self) -> Vec<u8> {
        serde_json::json!({
            "Username": self.username,
            "Password": self.password,
            "Organization": self.organization,
            "Account": self.account,
            "Database": self.database,
        })
        .to_string()
        .into_bytes()
    }
}

/// Connection settings for a Postgres database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}
