//! # Featurekit
//!
//! Client-side declaration and registration for a feature-store control
//! plane.
//!
//! Infrastructure and data objects (credential providers, raw sources,
//! entities, computed features, labels, training sets, users) are declared
//! as in-memory value objects and collected in a [`Registry`], which:
//! - rejects conflicting redefinitions of the same kind and name
//! - exposes a dependency-ordered listing for audit output
//! - replays the declarations against the control plane through idempotent
//!   create calls, tolerating "already exists" responses
//!
//! The remote service is reached through the [`MetadataStub`] trait, passed
//! explicitly to the apply phase; featurekit never owns a connection.
//!
//! ## Example
//!
//! ```
//! use featurekit::{Entity, Registry, User};
//!
//! let mut registry = Registry::new();
//! registry.add(User { name: "alice".into() })?;
//! registry.add(Entity {
//!     name: "user_id".into(),
//!     description: "Primary user identifier".into(),
//! })?;
//!
//! for resource in registry.sorted_list() {
//!     println!("{} {}", resource.kind(), resource.name());
//! }
//! # Ok::<(), featurekit::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod registry;
pub mod resource;
pub mod wire;

// Re-export main types at crate root
pub use config::{PostgresConfig, RedisConfig, SnowflakeConfig, StorageConfig};
pub use error::{Error, RemoteError, Result};
pub use registry::Registry;
pub use resource::{
    ColumnMapping, Entity, Feature, Label, Location, NameVariant, Provider, Resource,
    ResourceKind, Source, SourceDefinition, TrainingSet, Transformation, User,
};
pub use wire::{
    ColumnMappingMessage, ConnectionMessage, EntityMessage, FeatureVariantMessage,
    LabelVariantMessage, MetadataStub, NameVariantMessage, ProviderMessage,
    SourceDefinitionMessage, SourceVariantMessage, TrainingSetVariantMessage, UserMessage,
};
