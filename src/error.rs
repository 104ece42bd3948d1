//! Error types for featurekit

use thiserror::Error;

use crate::resource::ResourceKind;

/// Errors that can occur while declaring or applying resources
#[derive(Error, Debug)]
pub enum Error {
    /// A resource with the same kind and name was already declared
    #[error("{kind} resource {name}{} defined in multiple places", .variant.as_ref().map(|v| format!(" variant {v}")).unwrap_or_default())]
    Redefined {
        kind: ResourceKind,
        name: String,
        variant: Option<String>,
    },

    /// A resource declaration was rejected at construction time
    #[error("invalid declaration: {0}")]
    InvalidDeclaration(String),

    /// A remote create call failed during apply
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Failure reported by the remote control plane for a single create call
#[derive(Error, Debug)]
pub enum RemoteError {
    /// The resource is already present remotely; treated as satisfied
    /// during apply rather than surfaced to the caller
    #[error("{0} already exists")]
    AlreadyExists(String),

    /// Any other remote failure; aborts the remaining apply batch
    #[error("remote create failed: {0}")]
    Call(String),
}

/// Result type for featurekit operations
pub type Result<T> = std::result::Result<T, Error>;
