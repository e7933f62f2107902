//! 时间窗口过滤器集成测试
//!
//! 通过编排器以真实当前时间评估，窗口边界取远过去/远未来保证稳定。

use crate::common::manager_from_json;
use flagron::prelude::*;

fn timed_manager() -> FeatureManager {
    manager_from_json(
        r#"{
            "feature_flags": [
                {
                    "id": "PastTimeWindow",
                    "enabled": true,
                    "conditions": {
                        "client_filters": [{
                            "name": "Flagron.TimeWindow",
                            "parameters": {
                                "Start": "Mon, 01 May 2023 13:59:59 GMT",
                                "End": "Sat, 01 Jul 2023 00:00:00 GMT"
                            }
                        }]
                    }
                },
                {
                    "id": "FutureTimeWindow",
                    "enabled": true,
                    "conditions": {
                        "client_filters": [{
                            "name": "Flagron.TimeWindow",
                            "parameters": {
                                "Start": "3023-06-27T06:00:00Z",
                                "End": "3023-06-28T06:05:00Z"
                            }
                        }]
                    }
                },
                {
                    "id": "PresentTimeWindow",
                    "enabled": true,
                    "conditions": {
                        "client_filters": [{
                            "name": "Flagron.TimeWindow",
                            "parameters": {
                                "Start": "2023-06-27T06:00:00Z",
                                "End": "3023-06-28T06:05:00Z"
                            }
                        }]
                    }
                },
                {
                    "id": "OpenEndedStart",
                    "enabled": true,
                    "conditions": {
                        "client_filters": [{
                            "name": "Flagron.TimeWindow",
                            "parameters": {"Start": "2023-06-27T06:00:00Z"}
                        }]
                    }
                },
                {
                    "id": "NoBounds",
                    "enabled": true,
                    "conditions": {
                        "client_filters": [{"name": "Flagron.TimeWindow"}]
                    }
                },
                {
                    "id": "BadTime",
                    "enabled": true,
                    "conditions": {
                        "client_filters": [{
                            "name": "Flagron.TimeWindow",
                            "parameters": {"Start": "sometime next week"}
                        }]
                    }
                }
            ]
        }"#,
    )
}

#[test]
fn test_past_window_is_disabled() {
    let manager = timed_manager();
    assert!(!manager.is_enabled("PastTimeWindow").unwrap());
}

#[test]
fn test_future_window_is_disabled() {
    let manager = timed_manager();
    assert!(!manager.is_enabled("FutureTimeWindow").unwrap());
}

#[test]
fn test_current_window_is_enabled() {
    let manager = timed_manager();
    assert!(manager.is_enabled("PresentTimeWindow").unwrap());
}

#[test]
fn test_started_open_ended_window_is_enabled() {
    let manager = timed_manager();
    assert!(manager.is_enabled("OpenEndedStart").unwrap());
}

#[test]
fn test_window_without_bounds_is_disabled() {
    let manager = timed_manager();
    assert!(!manager.is_enabled("NoBounds").unwrap());
}

#[test]
fn test_unparseable_time_is_parameter_error() {
    let manager = timed_manager();
    let result = manager.is_enabled("BadTime");
    assert!(matches!(result, Err(FlagronError::ParameterError(_))));
}
