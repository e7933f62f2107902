//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 受众匹配
//!
//! 定向上下文与纯集合成员判断，不涉及哈希。

/// 定向上下文
///
/// 调用方在每次评估时显式传入的用户身份信息，用于受众与变体分配决策。
/// 引擎从不读取进程级全局状态，保证评估的确定性与可测试性。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetingContext {
    /// 用户ID（可为空）
    pub user_id: String,
    /// 用户所属的组（可为空）
    pub groups: Vec<String>,
}

impl TargetingContext {
    /// 创建新的定向上下文
    ///
    /// # 示例
    /// ```rust
    /// use flagron::audience::TargetingContext;
    ///
    /// let ctx = TargetingContext::new("Alice", vec!["Stage1".to_string()]);
    /// assert_eq!(ctx.user_id, "Alice");
    /// ```
    pub fn new(user_id: impl Into<String>, groups: Vec<String>) -> Self {
        Self {
            user_id: user_id.into(),
            groups,
        }
    }

    /// 仅携带用户ID的定向上下文
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self::new(user_id, Vec::new())
    }
}

/// 判断用户ID是否在目标用户列表中
///
/// 空用户ID永远不匹配。精确字符串匹配，区分大小写。
pub fn is_targeted_user(user_id: &str, users: &[String]) -> bool {
    if user_id.is_empty() {
        return false;
    }

    users.iter().any(|user| user == user_id)
}

/// 判断用户所属组与目标组是否有交集
///
/// 用户组为空时永远不匹配。精确字符串匹配，区分大小写。
pub fn is_targeted_group(source_groups: &[String], targeted_groups: &[String]) -> bool {
    if source_groups.is_empty() {
        return false;
    }

    source_groups
        .iter()
        .any(|source| targeted_groups.iter().any(|targeted| targeted == source))
}
