//! Tidy Core - shared foundation for git-tidy
//!
//! This crate provides the error taxonomy, configuration loading, the commit
//! attribute schema and the small value types every other git-tidy crate
//! passes around.

pub mod config;
pub mod error;
pub mod schema;
pub mod types;

pub use error::{
    ConfigError, GitError, HostError, RangeError, ResolveError, Result, SchemaError, SquashError,
    TidyError,
};
pub use schema::{AttributeDef, AttributeSchema, Condition, Schema};
pub use types::{AttrValue, Attributes, IdentityPolicy, LintMode, RevisionRange};
