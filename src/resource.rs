//! Resource value types and the identity/ordering policy
//!
//! Every declarable object is an immutable value once constructed. Only
//! [`TrainingSet`] validates at construction time (its label and feature
//! references must be well formed); the other kinds accept any field values
//! and leave referential integrity to the control plane.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::StorageConfig;
use crate::error::{Error, Result};

/// Reference to a specific variant of a name-bearing resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameVariant {
    pub name: String,
    pub variant: String,
}

impl NameVariant {
    pub fn new(name: impl Into<String>, variant: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variant: variant.into(),
        }
    }

    /// Both components must be non-empty to reference a resource
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty() && !self.variant.is_empty()
    }
}

impl fmt::Display for NameVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.variant)
    }
}

/// Category of a declarable resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    User,
    Provider,
    Source,
    Entity,
    Feature,
    Label,
    TrainingSet,
}

impl ResourceKind {
    /// Stable tag used in identity keys and error messages
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Provider => "provider",
            Self::Source => "source",
            Self::Entity => "entity",
            Self::Feature => "feature",
            Self::Label => "label",
            Self::TrainingSet => "training-set",
        }
    }

    /// Position in the dependency-respecting listing order
    ///
    /// Credentials and raw sources come before the entities and features
    /// that reference them; training sets reference features and labels
    /// and sort last.
    pub fn priority(self) -> u8 {
        match self {
            Self::User => 0,
            Self::Provider => 1,
            Self::Source => 2,
            Self::Entity => 3,
            Self::Feature => 4,
            Self::Label => 5,
            Self::TrainingSet => 6,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A platform user who owns resources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
}

/// A credentialed connection to a storage or compute system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub name: String,
    pub function: String,
    pub config: StorageConfig,
    pub description: String,
    pub team: String,
}

/// Where primary data lives inside a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    SqlTable { name: String },
}

/// A derivation applied to other sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transformation {
    Sql { query: String },
}

/// How a source's data comes to exist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceDefinition {
    /// Raw data already materialized at a location
    PrimaryData { location: Location },
    /// Data produced by running a transformation
    Transformation(Transformation),
}

/// A raw or derived dataset registered with a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    pub variant: String,
    pub definition: SourceDefinition,
    pub owner: String,
    pub provider: String,
    pub description: String,
}

/// A real-world object features describe (user, transaction, device, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub description: String,
}

/// Columns a feature or label reads from its source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub entity: String,
    pub value: String,
    pub timestamp: String,
}

/// A computed, entity-keyed value served at inference time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    pub variant: String,
    pub value_type: String,
    pub entity: String,
    pub owner: String,
    pub provider: String,
    pub description: String,
    pub location: ColumnMapping,
}

/// A ground-truth value used to train models
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    pub variant: String,
    pub value_type: String,
    pub entity: String,
    pub owner: String,
    pub description: String,
    pub location: ColumnMapping,
}

/// A label joined with features for model training
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingSet {
    pub name: String,
    pub variant: String,
    pub owner: String,
    pub label: NameVariant,
    pub features: Vec<NameVariant>,
    pub description: String,
}

impl TrainingSet {
    /// Construct a training set, validating its references
    ///
    /// Fails fast when the label reference is malformed, when no features
    /// are given, or when any feature reference is malformed. Validation
    /// happens here so a bad declaration never reaches the registry.
    pub fn new(
        name: impl Into<String>,
        variant: impl Into<String>,
        owner: impl Into<String>,
        label: NameVariant,
        features: Vec<NameVariant>,
        description: impl Into<String>,
    ) -> Result<Self> {
        if !label.is_valid() {
            return Err(Error::InvalidDeclaration(
                "training set label must have a non-empty name and variant".into(),
            ));
        }
        if features.is_empty() {
            return Err(Error::InvalidDeclaration(
                "a training set needs at least one feature".into(),
            ));
        }
        if let Some(feature) = features.iter().find(|f| !f.is_valid()) {
            return Err(Error::InvalidDeclaration(format!(
                "invalid feature reference {feature}"
            )));
        }

        Ok(Self {
            name: name.into(),
            variant: variant.into(),
            owner: owner.into(),
            label,
            features,
            description: description.into(),
        })
    }
}

/// A declared resource awaiting registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resource {
    User(User),
    Provider(Provider),
    Source(Source),
    Entity(Entity),
    Feature(Feature),
    Label(Label),
    TrainingSet(TrainingSet),
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::User(_) => ResourceKind::User,
            Self::Provider(_) => ResourceKind::Provider,
            Self::Source(_) => ResourceKind::Source,
            Self::Entity(_) => ResourceKind::Entity,
            Self::Feature(_) => ResourceKind::Feature,
            Self::Label(_) => ResourceKind::Label,
            Self::TrainingSet(_) => ResourceKind::TrainingSet,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::User(r) => &r.name,
            Self::Provider(r) => &r.name,
            Self::Source(r) => &r.name,
            Self::Entity(r) => &r.name,
            Self::Feature(r) => &r.name,
            Self::Label(r) => &r.name,
            Self::TrainingSet(r) => &r.name,
        }
    }

    /// Variant qualifier, for the kinds that carry one
    pub fn variant(&self) -> Option<&str> {
        match self {
            Self::Source(r) => Some(&r.variant),
            Self::Feature(r) => Some(&r.variant),
            Self::Label(r) => Some(&r.variant),
            Self::TrainingSet(r) => Some(&r.variant),
            Self::User(_) | Self::Provider(_) | Self::Entity(_) => None,
        }
    }

    /// Key used for redefinition checks: kind and name, variant excluded
    ///
    /// A name holds a single variant per kind within one declaration
    /// session; a second variant under the same name is a redefinition.
    pub(crate) fn identity_key(&self) -> (ResourceKind, String) {
        (self.kind(), self.name().to_string())
    }

    /// Ordering key for the audit-facing sorted listing
    pub(crate) fn sort_key(&self) -> (u8, &str, &str) {
        (
            self.kind().priority(),
            self.name(),
            self.variant().unwrap_or(""),
        )
    }
}

impl From<User> for Resource {
    fn from(r: User) -> Self {
        Self::User(r)
    }
}

impl From<Provider> for Resource {
    fn from(r: Provider) -> Self {
        Self::Provider(r)
    }
}

impl From<Source> for Resource {
    fn from(r: Source) -> Self {
        Self::Source(r)
    }
}

impl From<Entity> for Resource {
    fn from(r: Entity) -> Self {
        Self::Entity(r)
    }
}

impl From<Feature> for Resource {
    fn from(r: Feature) -> Self {
        Self::Feature(r)
    }
}

impl From<Label> for Resource {
    fn from(r: Label) -> Self {
        Self::Label(r)
    }
}

impl From<TrainingSet> for Resource {
    fn from(r: TrainingSet) -> Self {
        Self::TrainingSet(r)
    }
}
