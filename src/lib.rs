//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! Flagron - Feature Flag Evaluation Engine
//!
//! Deterministic, explainable feature flag evaluation: boolean gating,
//! audience targeting, time windows, and variant allocation with
//! consistent percentile bucketing.
//!
//! # API Layers
//!
//! ## Prelude (Quick Start)
//!
//! Use `use flagron::prelude::*;` to import all commonly used types.
//!
//! ## Core API
//!
//! - [`FeatureManager`](manager::FeatureManager) - Evaluation orchestrator
//! - [`TargetingContext`](audience::TargetingContext) - Who is asking
//! - [`EvaluationResult`](schema::EvaluationResult) - Full explanation of one evaluation
//! - [`FlagronError`](error::FlagronError) - Error types
//!
//! ## Filters
//!
//! Built-in filters: audience targeting (`Flagron.Targeting`) and time
//! windows (`Flagron.TimeWindow`). Custom filters implement
//! [`FeatureFilter`](filters::FeatureFilter) and register by name.
//!
//! ## Providers
//!
//! Flag definitions come from a [`FeatureFlagProvider`](provider::FeatureFlagProvider):
//! in-memory documents or local JSON/YAML files.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use flagron::prelude::*;
//!
//! let provider = InMemoryProvider::from_json(r#"{
//!     "feature_flags": [{
//!         "id": "Beta",
//!         "enabled": true,
//!         "conditions": {
//!             "client_filters": [{
//!                 "name": "Flagron.Targeting",
//!                 "parameters": {
//!                     "Audience": {
//!                         "Users": ["Alice"],
//!                         "DefaultRolloutPercentage": 0
//!                     }
//!                 }
//!             }]
//!         }
//!     }]
//! }"#).unwrap();
//!
//! let manager = FeatureManager::new(Arc::new(provider)).unwrap();
//! let alice = TargetingContext::for_user("Alice");
//! assert!(manager.is_enabled_with_context("Beta", &alice).unwrap());
//! ```
//!
//! # Features
//!
//! - **Short-circuit conditions**: Any/All filter composition
//! - **Audience targeting**: users, groups, exclusions, percentage rollout
//! - **Variant allocation**: per-user, per-group, percentile ranges, defaults
//! - **Deterministic bucketing**: SHA-256 based, stable across processes
//! - **Explainable results**: every evaluation carries its assignment reason

pub mod prelude;

pub mod audience;
pub mod conditions;
pub mod constants;
pub mod error;
pub mod filters;
pub mod manager;
pub mod percentile;
pub mod provider;
pub mod schema;
pub mod targeting;
pub mod time_window;
pub mod validator;
pub mod variant;

pub use audience::TargetingContext;
pub use error::{FlagronError, ProviderError};
pub use manager::FeatureManager;
pub use schema::{EvaluationResult, FeatureFlag, Variant};
