//! Resource registry - uniqueness, ordering, and the apply driver

use std::collections::HashMap;

use crate::error::{Error, RemoteError, Result};
use crate::resource::{Resource, ResourceKind};
use crate::wire::MetadataStub;

/// Accumulates declared resources for a single apply pass
///
/// A registry is populated incrementally via [`Registry::add`] and consumed
/// exactly once via [`Registry::create_all`]. Uniqueness is enforced on
/// `(kind, name)`; creation replays resources in declaration order.
#[derive(Debug, Default)]
pub struct Registry {
    /// Identity map for redefinition checks
    state: HashMap<(ResourceKind, String), Resource>,
    /// Declaration order, replayed by the apply phase
    create_list: Vec<Resource>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a resource
    ///
    /// Fails with [`Error::Redefined`] when a resource of the same kind and
    /// name was already declared, leaving the registry untouched. The
    /// variant is not part of the key: a name holds a single variant per
    /// kind within one declaration session.
    pub fn add(&mut self, resource: impl Into<Resource>) -> Result<()> {
        let resource = resource.into();
        let key = resource.identity_key();
        if self.state.contains_key(&key) {
            return Err(Error::Redefined {
                kind: resource.kind(),
                name: resource.name().to_string(),
                variant: resource.variant().map(String::from),
            });
        }
        self.create_list.push(resource.clone());
        self.state.insert(key, resource);
        Ok(())
    }

    /// All declared resources ordered by (kind priority, name, variant)
    ///
    /// Listing order only; it does not affect the order `create_all`
    /// replays resources in.
    pub fn sorted_list(&self) -> Vec<&Resource> {
        let mut resources: Vec<&Resource> = self.state.values().collect();
        resources.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        resources
    }

    /// Number of declared resources
    pub fn len(&self) -> usize {
        self.create_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.create_list.is_empty()
    }

    /// Apply every declared resource against the remote control plane
    ///
    /// Resources are replayed in declaration order, so callers must declare
    /// dependencies before the resources that reference them. A remote
    /// "already exists" response counts as satisfied and is skipped; any
    /// other remote failure propagates immediately, aborting the remaining
    /// batch with no retry or rollback.
    pub fn create_all(self, stub: &mut dyn MetadataStub) -> Result<()> {
        for resource in &self.create_list {
            log::info!("creating {} {}", resource.kind(), resource.name());
            match resource.create(stub) {
                Ok(()) => {}
                Err(RemoteError::AlreadyExists(_)) => {
                    log::debug!("{} {} already exists", resource.kind(), resource.name());
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PostgresConfig, StorageConfig};
    use crate::resource::{
        ColumnMapping, Entity, Feature, Label, NameVariant, Provider, Source, SourceDefinition,
        TrainingSet, Transformation, User,
    };
    use crate::wire::{
        EntityMessage, FeatureVariantMessage, LabelVariantMessage, ProviderMessage,
        SourceVariantMessage, TrainingSetVariantMessage, UserMessage,
    };

    type RemoteResult = std::result::Result<(), RemoteError>;

    /// How the mock control plane answers each create call
    #[derive(Clone, Copy)]
    enum Behavior {
        Succeed,
        AlreadyExists,
        /// Fail the nth call (1-based) with a non-already-exists error
        FailAt(usize),
    }

    /// Mock stub recording the calls it receives, in order
    struct MockStub {
        behavior: Behavior,
        calls: Vec<String>,
    }

    impl MockStub {
        fn new(behavior: Behavior) -> Self {
            Self {
                behavior,
                calls: Vec::new(),
            }
        }

        fn record(&mut self, call: String) -> RemoteResult {
            self.calls.push(call.clone());
            match self.behavior {
                Behavior::Succeed => Ok(()),
                Behavior::AlreadyExists => Err(RemoteError::AlreadyExists(call)),
                Behavior::FailAt(n) if self.calls.len() == n => {
                    Err(RemoteError::Call("metadata service unavailable".into()))
                }
                Behavior::FailAt(_) => Ok(()),
            }
        }
    }

    impl MetadataStub for MockStub {
        fn create_user(&mut self, message: UserMessage) -> RemoteResult {
            self.record(format!("user:{}", message.name))
        }

        fn create_provider(&mut self, message: ProviderMessage) -> RemoteResult {
            self.record(format!("provider:{}", message.name))
        }

        fn create_source_variant(
            &mut self,
            message: SourceVariantMessage,
        ) -> RemoteResult {
            self.record(format!("source:{}", message.name))
        }

        fn create_entity(&mut self, message: EntityMessage) -> RemoteResult {
            self.record(format!("entity:{}", message.name))
        }

        fn create_feature_variant(
            &mut self,
            message: FeatureVariantMessage,
        ) -> RemoteResult {
            self.record(format!("feature:{}", message.name))
        }

        fn create_label_variant(
            &mut self,
            message: LabelVariantMessage,
        ) -> RemoteResult {
            self.record(format!("label:{}", message.name))
        }

        fn create_training_set_variant(
            &mut self,
            message: TrainingSetVariantMessage,
        ) -> RemoteResult {
            self.record(format!("training-set:{}", message.name))
        }
    }

    fn user(name: &str) -> User {
        User { name: name.into() }
    }

    fn postgres_provider(name: &str) -> Provider {
        Provider {
            name: name.into(),
            function: "OFFLINE".into(),
            config: StorageConfig::Postgres(PostgresConfig {
                host: "h".into(),
                port: 5432,
                database: "d".into(),
                user: "u".into(),
                password: "p".into(),
            }),
            description: String::new(),
            team: String::new(),
        }
    }

    fn entity(name: &str) -> Entity {
        Entity {
            name: name.into(),
            description: "desc".into(),
        }
    }

    fn source(name: &str, variant: &str) -> Source {
        Source {
            name: name.into(),
            variant: variant.into(),
            definition: SourceDefinition::Transformation(Transformation::Sql {
                query: "SELECT 1".into(),
            }),
            owner: "alice".into(),
            provider: "pg".into(),
            description: String::new(),
        }
    }

    fn columns() -> ColumnMapping {
        ColumnMapping {
            entity: "user_id".into(),
            value: "amount".into(),
            timestamp: "ts".into(),
        }
    }

    fn feature(name: &str, variant: &str) -> Feature {
        Feature {
            name: name.into(),
            variant: variant.into(),
            value_type: "float32".into(),
            entity: "user_id".into(),
            owner: "alice".into(),
            provider: "pg".into(),
            description: String::new(),
            location: columns(),
        }
    }

    fn label(name: &str, variant: &str) -> Label {
        Label {
            name: name.into(),
            variant: variant.into(),
            value_type: "bool".into(),
            entity: "user_id".into(),
            owner: "alice".into(),
            description: String::new(),
            location: columns(),
        }
    }

    #[test]
    fn test_distinct_resources_all_register() {
        let mut registry = Registry::new();
        registry.add(user("alice")).unwrap();
        registry.add(postgres_provider("pg")).unwrap();
        registry.add(source("transactions", "v1")).unwrap();
        registry.add(entity("user_id")).unwrap();
        registry.add(feature("amount", "v1")).unwrap();
        registry.add(label("is_fraud", "v1")).unwrap();

        assert_eq!(registry.len(), 6);
    }

    #[test]
    fn test_redefinition_rejected_across_variants() {
        let mut registry = Registry::new();
        registry.add(feature("amount", "v1")).unwrap();

        // Same kind and name; a different variant does not help
        let err = registry.add(feature("amount", "v2")).unwrap_err();
        match err {
            Error::Redefined {
                kind,
                name,
                variant,
            } => {
                assert_eq!(kind, ResourceKind::Feature);
                assert_eq!(name, "amount");
                assert_eq!(variant.as_deref(), Some("v2"));
            }
            other => panic!("expected Redefined, got {other:?}"),
        }

        // The failed add left no trace
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_same_name_allowed_across_kinds() {
        let mut registry = Registry::new();
        registry.add(feature("clicks", "v1")).unwrap();
        registry.add(label("clicks", "v1")).unwrap();
        registry.add(source("clicks", "v1")).unwrap();

        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_sorted_list_orders_by_priority_name_variant() {
        let mut registry = Registry::new();
        registry.add(feature("b_feature", "v1")).unwrap();
        registry.add(user("zoe")).unwrap();
        registry.add(feature("a_feature", "v1")).unwrap();
        registry.add(entity("user_id")).unwrap();
        registry.add(user("alice")).unwrap();

        let order: Vec<(&str, &str)> = registry
            .sorted_list()
            .iter()
            .map(|r| (r.kind().as_str(), r.name()))
            .collect();

        assert_eq!(
            order,
            vec![
                ("user", "alice"),
                ("user", "zoe"),
                ("entity", "user_id"),
                ("feature", "a_feature"),
                ("feature", "b_feature"),
            ]
        );
    }

    #[test]
    fn test_create_all_follows_declaration_order() {
        let mut registry = Registry::new();
        // Deliberately not in sorted order; apply must not reorder
        registry.add(entity("user_id")).unwrap();
        registry.add(user("alice")).unwrap();
        registry.add(postgres_provider("pg")).unwrap();

        let mut stub = MockStub::new(Behavior::Succeed);
        registry.create_all(&mut stub).unwrap();

        assert_eq!(stub.calls, vec!["entity:user_id", "user:alice", "provider:pg"]);
    }

    #[test]
    fn test_create_all_tolerates_already_exists() {
        let mut registry = Registry::new();
        registry.add(user("alice")).unwrap();
        registry.add(postgres_provider("pg")).unwrap();
        registry.add(entity("user_id")).unwrap();

        let mut stub = MockStub::new(Behavior::AlreadyExists);
        registry.create_all(&mut stub).unwrap();

        // One attempt per resource, none surfaced as an error
        assert_eq!(stub.calls.len(), 3);
    }

    #[test]
    fn test_create_all_aborts_on_remote_failure() {
        let mut registry = Registry::new();
        registry.add(user("alice")).unwrap();
        registry.add(postgres_provider("pg")).unwrap();
        registry.add(source("transactions", "v1")).unwrap();
        registry.add(entity("user_id")).unwrap();
        registry.add(feature("amount", "v1")).unwrap();

        let mut stub = MockStub::new(Behavior::FailAt(3));
        let err = registry.create_all(&mut stub).unwrap_err();

        assert!(matches!(err, Error::Remote(RemoteError::Call(_))));
        // The first two and the failing third were attempted; nothing after
        assert_eq!(
            stub.calls,
            vec!["user:alice", "provider:pg", "source:transactions"]
        );
    }

    #[test]
    fn test_declaration_scenario_end_to_end() {
        let mut registry = Registry::new();
        registry.add(user("alice")).unwrap();
        registry.add(postgres_provider("pg")).unwrap();
        registry.add(entity("user_id")).unwrap();

        let order: Vec<&str> = registry.sorted_list().iter().map(|r| r.name()).collect();
        assert_eq!(order, vec!["alice", "pg", "user_id"]);

        let mut stub = MockStub::new(Behavior::Succeed);
        registry.create_all(&mut stub).unwrap();
        assert_eq!(stub.calls, vec!["user:alice", "provider:pg", "entity:user_id"]);
    }

    #[test]
    fn test_training_set_registers_after_construction() {
        let training_set = TrainingSet::new(
            "fraud",
            "v1",
            "alice",
            NameVariant::new("is_fraud", "v1"),
            vec![NameVariant::new("amount", "v1")],
            "",
        )
        .unwrap();

        let mut registry = Registry::new();
        registry.add(training_set).unwrap();

        let mut stub = MockStub::new(Behavior::Succeed);
        registry.create_all(&mut stub).unwrap();
        assert_eq!(stub.calls, vec!["training-set:fraud"]);
    }
}
