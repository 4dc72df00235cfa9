/*
 * @Author       : 老董
 * @Date         : 2026-03-05
 * @Description  : 优化器状态字典（可序列化快照）
 *
 * `ParamId`只在当前进程内有意义，所以状态按“参数组序号 + 组内位置”保存，
 * 加载时要求优化器以相同的顺序注册了形状相同的参数。
 */

use serde::{Deserialize, Serialize};

use super::{GroupConfig, OptimizerError, PidState};

/// 单个参数组的快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "C: GroupConfig")]
pub struct GroupStateDict<C: GroupConfig> {
    pub config: C,
    /// 与组内参数一一对应；`None`表示该参数尚未建立状态
    pub states: Vec<Option<PidState>>,
}

/// 整个优化器的快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "C: GroupConfig")]
pub struct OptimizerStateDict<C: GroupConfig> {
    pub groups: Vec<GroupStateDict<C>>,
}

impl<C: GroupConfig> OptimizerStateDict<C> {
    /// 已建立的状态记录总数
    pub fn num_states(&self) -> usize {
        self.groups
            .iter()
            .map(|group| group.states.iter().flatten().count())
            .sum()
    }

    pub fn to_json(&self) -> Result<String, OptimizerError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, OptimizerError> {
        Ok(serde_json::from_str(json)?)
    }
}
