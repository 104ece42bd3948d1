//! Wire messages and the remote control-plane boundary
//!
//! The control plane exposes one idempotent create call per resource kind.
//! [`MetadataStub`] is that boundary as a trait so the transport stays
//! injectable; the message structs mirror the remote schema field for
//! field. Builders map each resource value into its message, threading
//! nested config and definition variants into their sub-messages.

use serde::{Deserialize, Serialize};

use crate::config::StorageConfig;
use crate::error::RemoteError;
use crate::resource::{
    ColumnMapping, Entity, Feature, Label, Location, NameVariant, Provider, Resource, Source,
    SourceDefinition, Transformation, TrainingSet, User,
};

/// Remote control-plane service boundary
///
/// Every call is expected to succeed-or-already-exist; an already-present
/// resource is reported as [`RemoteError::AlreadyExists`], which the apply
/// driver treats as satisfied.
pub trait MetadataStub {
    fn create_user(&mut self, message: UserMessage) -> Result<(), RemoteError>;
    fn create_provider(&mut self, message: ProviderMessage) -> Result<(), RemoteError>;
    fn create_source_variant(
        &mut self,
        message: SourceVariantMessage,
    ) -> Result<(), RemoteError>;
    fn create_entity(&mut self, message: EntityMessage) -> Result<(), RemoteError>;
    fn create_feature_variant(
        &mut self,
        message: FeatureVariantMessage,
    ) -> Result<(), RemoteError>;
    fn create_label_variant(&mut self, message: LabelVariantMessage) -> Result<(), RemoteError>;
    fn create_training_set_variant(
        &mut self,
        message: TrainingSetVariantMessage,
    ) -> Result<(), RemoteError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMessage {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderMessage {
    pub name: String,
    pub description: String,
    /// Store-type tag; empty for stores that do not distinguish one
    pub provider_type: String,
    pub software: String,
    pub team: String,
    /// Opaque connection payload; empty for structured-connection stores
    pub serialized_config: Vec<u8>,
    /// Structured connection settings; `None` for payload-carrying stores
    pub connection: Option<ConnectionMessage>,
}

/// Structured connection sub-fields for non-payload stores
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionMessage {
    Redis {
        host: String,
        port: u16,
        password: String,
        db: u32,
    },
    Postgres {
        host: String,
        port: u16,
        database: String,
        user: String,
        password: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceVariantMessage {
    pub name: String,
    pub variant: String,
    pub owner: String,
    pub provider: String,
    pub description: String,
    pub definition: SourceDefinitionMessage,
}

/// Selects which definition field of the source variant is populated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceDefinitionMessage {
    PrimaryData { table: String },
    SqlTransformation { query: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMessage {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMappingMessage {
    pub entity: String,
    pub value: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureVariantMessage {
    pub name: String,
    pub variant: String,
    pub value_type: String,
    pub entity: String,
    pub owner: String,
    pub provider: String,
    pub description: String,
    pub columns: ColumnMappingMessage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelVariantMessage {
    pub name: String,
    pub variant: String,
    pub value_type: String,
    pub entity: String,
    pub owner: String,
    pub description: String,
    pub columns: ColumnMappingMessage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameVariantMessage {
    pub name: String,
    pub variant: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingSetVariantMessage {
    pub name: String,
    pub variant: String,
    pub owner: String,
    pub description: String,
    pub label: NameVariantMessage,
    pub features: Vec<NameVariantMessage>,
}

impl From<&User> for UserMessage {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
        }
    }
}

impl From<&Provider> for ProviderMessage {
    fn from(provider: &Provider) -> Self {
        Self {
            name: provider.name.clone(),
            description: provider.description.clone(),
            provider_type: provider.config.store_type().to_string(),
            software: provider.config.software().to_string(),
            team: provider.team.clone(),
            serialized_config: provider.config.serialize(),
            connection: connection_message(&provider.config),
        }
    }
}

fn connection_message(config: &StorageConfig) -> Option<ConnectionMessage> {
    match config {
        StorageConfig::Redis(c) => Some(ConnectionMessage::Redis {
            host: c.host.clone(),
            port: c.port,
            password: c.password.clone(),
            db: c.db,
        }),
        StorageConfig::Postgres(c) => Some(ConnectionMessage::Postgres {
            host: c.host.clone(),
            port: c.port,
            database: c.database.clone(),
            user: c.user.clone(),
            password: c.password.clone(),
        }),
        StorageConfig::Snowflake(_) => None,
    }
}

impl From<&Source> for SourceVariantMessage {
    fn from(source: &Source) -> Self {
        let definition = match &source.definition {
            SourceDefinition::PrimaryData { location } => match location {
                Location::SqlTable { name } => SourceDefinitionMessage::PrimaryData {
                    table: name.clone(),
                },
            },
            SourceDefinition::Transformation(Transformation::Sql { query }) => {
                SourceDefinitionMessage::SqlTransformation {
                    query: query.clone(),
                }
            }
        };

        Self {
            name: source.name.clone(),
            variant: source.variant.clone(),
            owner: source.owner.clone(),
            provider: source.provider.clone(),
            description: source.description.clone(),
            definition,
        }
    }
}

impl From<&Entity> for EntityMessage {
    fn from(entity: &Entity) -> Self {
        Self {
            name: entity.name.clone(),
            description: entity.description.clone(),
        }
    }
}

impl From<&ColumnMapping> for ColumnMappingMessage {
    fn from(columns: &ColumnMapping) -> Self {
        Self {
            entity: columns.entity.clone(),
            value: columns.value.clone(),
            timestamp: columns.timestamp.clone(),
        }
    }
}

impl From<&Feature> for FeatureVariantMessage {
    fn from(feature: &Feature) -> Self {
        Self {
            name: feature.name.clone(),
            variant: feature.variant.clone(),
            value_type: feature.value_type.clone(),
            entity: feature.entity.clone(),
            owner: feature.owner.clone(),
            provider: feature.provider.clone(),
            description: feature.description.clone(),
            columns: (&feature.location).into(),
        }
    }
}

impl From<&Label> for LabelVariantMessage {
    fn from(label: &Label) -> Self {
        Self {
            name: label.name.clone(),
            variant: label.variant.clone(),
            value_type: label.value_type.clone(),
            entity: label.entity.clone(),
            owner: label.owner.clone(),
            description: label.description.clone(),
            columns: (&label.location).into(),
        }
    }
}

impl From<&NameVariant> for NameVariantMessage {
    fn from(nv: &NameVariant) -> Self {
        Self {
            name: nv.name.clone(),
            variant: nv.variant.clone(),
        }
    }
}

impl From<&TrainingSet> for TrainingSetVariantMessage {
    fn from(training_set: &TrainingSet) -> Self {
        Self {
            name: training_set.name.clone(),
            variant: training_set.variant.clone(),
            owner: training_set.owner.clone(),
            description: training_set.description.clone(),
            label: (&training_set.label).into(),
            features: training_set.features.iter().map(Into::into).collect(),
        }
    }
}

impl Resource {
    /// Build this resource's wire message and issue its create call
    pub fn create(&self, stub: &mut dyn MetadataStub) -> Result<(), RemoteError> {
        match self {
            Self::User(r) => stub.create_user(r.into()),
            Self::Provider(r) => stub.create_provider(r.into()),
            Self::Source(r) => stub.create_source_variant(r.into()),
            Self::Entity(r) => stub.create_entity(r.into()),
            Self::Feature(r) => stub.create_feature_variant(r.into()),
            Self::Label(r) => stub.create_label_variant(r.into()),
            Self::TrainingSet(r) => stub.create_training_set_variant(r.into()),
        }
    }
}
