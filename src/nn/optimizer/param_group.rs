/*
 * @Author       : 老董
 * @Date         : 2026-03-04
 * @Description  : 参数组：一组共享同一套超参数的参数
 */

use super::GroupConfig;
use crate::nn::Parameter;

/// 参数组
///
/// 用于需要分别设置超参数的场景，如：
/// - 迁移学习（主干网络用更小的学习率）
/// - 分层学习率
#[derive(Debug, Clone)]
pub struct ParamGroup<C: GroupConfig> {
    params: Vec<Parameter>,
    config: C,
}

impl<C: GroupConfig> ParamGroup<C> {
    pub fn new(params: &[Parameter], config: C) -> Self {
        Self {
            params: params.to_vec(),
            config,
        }
    }

    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    pub const fn config(&self) -> &C {
        &self.config
    }

    pub(crate) fn set_config(&mut self, config: C) {
        self.config = config;
    }
}
