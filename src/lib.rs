//! # Echelon Authorization Store
//!
//! Hierarchical authorization store with prefix-based inheritance. An
//! application defines named echelons (permission scopes such as
//! `admin::user::create`) arranged in a separator-delimited tree, attaches
//! users or groups to any scope, and asks whether a member has access to a
//! scope: access to a parent scope implies access to all descendants.
//!
//! ## Features
//!
//! - **Async-first design** using the Tokio runtime
//! - **Pluggable document store** behind a narrow adapter trait, with an
//!   in-memory backend built in and MongoDB behind the `mongo` feature
//! - **Explicit member model** - a tagged `Member` union instead of
//!   duck-typed identity objects
//! - **REST API** exposing echelon CRUD over axum
//!
//! ## Example
//!
//! ```rust
//! use echelon_authz::{AccessEvaluator, EchelonRegistry, Member, MemberType};
//! use echelon_authz::store::MemoryStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = EchelonRegistry::new(Arc::new(MemoryStore::new()));
//!     let evaluator = AccessEvaluator::new(registry.clone());
//!
//!     registry.define_echelon("admin::user", None, None).await?;
//!     registry.add_member("admin::user", ["bob"], MemberType::User).await?;
//!
//!     // Bob inherits every scope below admin::user
//!     let bob = Member::user("bob");
//!     assert!(evaluator.check_access(&bob, "admin::user::create").await?);
//!     assert!(!evaluator.check_access(&bob, "admin::billing").await?);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod error;
pub mod evaluator;
pub mod registry;
pub mod scope;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{EchelonError, Result};
pub use evaluator::AccessEvaluator;
pub use registry::EchelonRegistry;
pub use scope::{Scope, ScopeError};
pub use store::EchelonStore;
pub use types::{Echelon, EchelonConfig, Member, MemberType};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
