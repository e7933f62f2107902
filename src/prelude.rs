//! Prelude module - Commonly used types for quick imports
//!
//! This module re-exports the most commonly used types from Flagron,
//! allowing users to import them with a single `use flagron::prelude::*;`
//! statement instead of importing each type individually.

// Core types - always available
pub use crate::audience::TargetingContext;
pub use crate::error::{FlagronError, ProviderError};
pub use crate::manager::{EvaluationObserver, FeatureManager};

// Flag model
pub use crate::schema::{
    EvaluationResult, FeatureFlag, FeatureManagement, RequirementType, StatusOverride, Variant,
    VariantAssignmentReason,
};

// Filters
pub use crate::filters::{FeatureFilter, FilterEvaluationContext, FilterRegistry};
pub use crate::targeting::TargetingFilter;
pub use crate::time_window::TimeWindowFilter;

// Providers
pub use crate::provider::{FeatureFlagProvider, InMemoryProvider, LocalFileProvider};
