//! 自定义过滤器集成测试

use crate::common::manager_from_json;
use flagron::prelude::*;
use flagron::provider::InMemoryProvider;
use serde::Deserialize;
use std::sync::Arc;

/// 简单的环境过滤器：参数声明的环境与构造时注入的环境一致才通过
struct EnvironmentFilter {
    current: String,
}

#[derive(Deserialize)]
struct EnvironmentParameters {
    #[serde(default, alias = "Environment")]
    environment: String,
}

impl FeatureFilter for EnvironmentFilter {
    fn name(&self) -> &str {
        "Contoso.Environment"
    }

    fn evaluate(
        &self,
        eval_ctx: &FilterEvaluationContext<'_>,
        _app_ctx: Option<&TargetingContext>,
    ) -> Result<bool, FlagronError> {
        let params: EnvironmentParameters = serde_json::from_value(serde_json::Value::Object(
            eval_ctx.parameters.clone(),
        ))
        .map_err(|e| FlagronError::ParameterError(e.to_string()))?;
        Ok(params.environment == self.current)
    }
}

fn manager_with_environment(current: &str) -> FeatureManager {
    let provider = InMemoryProvider::from_json(
        r#"{
            "feature_flags": [
                {
                    "id": "StagingOnly",
                    "enabled": true,
                    "conditions": {
                        "client_filters": [{
                            "name": "Contoso.Environment",
                            "parameters": {"Environment": "staging"}
                        }]
                    }
                },
                {
                    "id": "StagingOrProd",
                    "enabled": true,
                    "conditions": {
                        "requirement_type": "Any",
                        "client_filters": [
                            {"name": "Contoso.Environment", "parameters": {"Environment": "staging"}},
                            {"name": "Contoso.Environment", "parameters": {"Environment": "production"}}
                        ]
                    }
                },
                {
                    "id": "StagingAndProd",
                    "enabled": true,
                    "conditions": {
                        "requirement_type": "All",
                        "client_filters": [
                            {"name": "Contoso.Environment", "parameters": {"Environment": "staging"}},
                            {"name": "Contoso.Environment", "parameters": {"Environment": "production"}}
                        ]
                    }
                }
            ]
        }"#,
    )
    .unwrap();

    FeatureManager::new(Arc::new(provider))
        .unwrap()
        .with_filter(Arc::new(EnvironmentFilter {
            current: current.to_string(),
        }))
        .unwrap()
}

#[test]
fn test_custom_filter_gates_by_environment() {
    assert!(manager_with_environment("staging")
        .is_enabled("StagingOnly")
        .unwrap());
    assert!(!manager_with_environment("production")
        .is_enabled("StagingOnly")
        .unwrap());
}

#[test]
fn test_any_composition_accepts_either_environment() {
    assert!(manager_with_environment("staging")
        .is_enabled("StagingOrProd")
        .unwrap());
    assert!(manager_with_environment("production")
        .is_enabled("StagingOrProd")
        .unwrap());
    assert!(!manager_with_environment("local")
        .is_enabled("StagingOrProd")
        .unwrap());
}

#[test]
fn test_all_composition_cannot_match_two_environments() {
    // 同一时刻只有一个环境，两个过滤器不可能同时通过
    assert!(!manager_with_environment("staging")
        .is_enabled("StagingAndProd")
        .unwrap());
}

#[test]
fn test_duplicate_filter_registration_is_error() {
    let manager = manager_from_json(r#"{"feature_flags": []}"#);
    let result = manager.with_filter(Arc::new(EnvironmentFilter {
        current: "staging".to_string(),
    }));
    let manager = result.unwrap();

    // 同名过滤器第二次注册必须失败
    let result = manager.with_filter(Arc::new(EnvironmentFilter {
        current: "production".to_string(),
    }));
    assert!(matches!(result, Err(FlagronError::RegistryError(_))));
}

#[test]
fn test_builtin_filter_name_collision_is_error() {
    struct Impostor;
    impl FeatureFilter for Impostor {
        fn name(&self) -> &str {
            "Flagron.Targeting"
        }
        fn evaluate(
            &self,
            _eval_ctx: &FilterEvaluationContext<'_>,
            _app_ctx: Option<&TargetingContext>,
        ) -> Result<bool, FlagronError> {
            Ok(true)
        }
    }

    let manager = manager_from_json(r#"{"feature_flags": []}"#);
    let result = manager.with_filter(Arc::new(Impostor));
    assert!(matches!(result, Err(FlagronError::RegistryError(_))));
}
