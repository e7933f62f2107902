//! 评估编排器集成测试

use crate::common::manager_from_json;
use flagron::prelude::*;

fn boolean_manager() -> FeatureManager {
    manager_from_json(
        r#"{
            "feature_flags": [
                {"id": "BooleanTrue", "enabled": true},
                {"id": "BooleanFalse", "enabled": false},
                {"id": "NoEnabled"},
                {"id": "EmptyConditions", "enabled": true, "conditions": {"client_filters": []}},
                {
                    "id": "Tracked",
                    "enabled": true,
                    "telemetry": {"enabled": true, "metadata": {"stage": "canary"}}
                }
            ]
        }"#,
    )
}

#[test]
fn test_boolean_flags_without_context() {
    let manager = boolean_manager();
    assert!(manager.is_enabled("BooleanTrue").unwrap());
    assert!(!manager.is_enabled("BooleanFalse").unwrap());
}

#[test]
fn test_enabled_defaults_to_false_when_omitted() {
    let manager = boolean_manager();
    assert!(!manager.is_enabled("NoEnabled").unwrap());
}

#[test]
fn test_empty_conditions_behave_like_plain_boolean() {
    let manager = boolean_manager();
    assert!(manager.is_enabled("EmptyConditions").unwrap());
}

#[test]
fn test_unknown_feature_reports_provider_error() {
    let manager = boolean_manager();
    let error = manager.is_enabled("DoesNotExist").unwrap_err();
    assert!(matches!(error, FlagronError::ProviderError { .. }));
    assert!(error.to_string().contains("DoesNotExist"));
}

#[test]
fn test_feature_names_follow_document_order() {
    let manager = boolean_manager();
    let names = manager.feature_names().unwrap();
    assert_eq!(
        names,
        vec![
            "BooleanTrue",
            "BooleanFalse",
            "NoEnabled",
            "EmptyConditions",
            "Tracked"
        ]
    );
}

#[test]
fn test_observer_sees_full_evaluation_result() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    let manager = boolean_manager();
    let calls = Arc::new(AtomicUsize::new(0));

    let observed = Arc::clone(&calls);
    manager.on_feature_evaluated(Box::new(move |result| {
        assert_eq!(result.feature.id, "Tracked");
        assert!(result.enabled);
        assert_eq!(result.targeting_id, "Alice");
        assert_eq!(
            result.feature.telemetry.as_ref().unwrap().metadata["stage"],
            "canary"
        );
        observed.fetch_add(1, Ordering::SeqCst);
    }));

    let ctx = TargetingContext::for_user("Alice");
    manager.is_enabled_with_context("Tracked", &ctx).unwrap();
    // 未开启遥测的特性不派发
    manager.is_enabled("BooleanTrue").unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_unregistered_filter_name_fails_closed() {
    let manager = manager_from_json(
        r#"{
            "feature_flags": [{
                "id": "Gated",
                "enabled": true,
                "conditions": {"client_filters": [{"name": "Vendor.Unknown"}]}
            }]
        }"#,
    );
    // 软失败：按禁用处理而不是报错
    assert!(!manager.is_enabled("Gated").unwrap());
}

#[test]
fn test_targeting_without_context_is_context_error() {
    let manager = manager_from_json(
        r#"{
            "feature_flags": [{
                "id": "NeedsContext",
                "enabled": true,
                "conditions": {
                    "client_filters": [{
                        "name": "Flagron.Targeting",
                        "parameters": {"Audience": {"DefaultRolloutPercentage": 50}}
                    }]
                }
            }]
        }"#,
    );
    let result = manager.is_enabled("NeedsContext");
    assert!(matches!(result, Err(FlagronError::ContextError(_))));
}
