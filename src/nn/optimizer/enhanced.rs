/*
 * @Author       : 老董
 * @Date         : 2026-03-06
 * @Description  : 增强版 PIDAO：把速度与原始梯度混合后再按学习率更新参数
 */

use std::path::Path;

use super::base::{Optimizer, PidCore};
use super::{EnhancedPidConfig, OptimizerError, OptimizerStateDict, ParamGroup, PidState};
use crate::nn::Parameter;

/// 增强版 PIDAO 优化器
///
/// 速度的计算与 [`super::Pidao`] 完全相同，区别只在最后一步：
/// - velocity = a * velocity - lr * update
/// - enhanced_update = c * velocity + g
/// - θ = θ - lr * enhanced_update
///
/// 注意学习率被作用了两次（一次在速度里，一次在最终更新里），这是该公式本身的特性，保持原样。
///
/// # 使用示例
/// ```ignore
/// let config = EnhancedPidConfig::default().with_velocity_coefficient(0.2);
/// let mut optimizer = EnhancedPidao::new(&model.parameters(), config)?;
/// optimizer.zero_grad();
/// loss.backward()?;
/// optimizer.step()?;
/// ```
#[derive(Debug)]
pub struct EnhancedPidao {
    core: PidCore<EnhancedPidConfig>,
}

impl EnhancedPidao {
    /// 创建新的增强版 PIDAO 优化器（所有参数归入同一参数组）
    pub fn new(params: &[Parameter], config: EnhancedPidConfig) -> Result<Self, OptimizerError> {
        Ok(Self {
            core: PidCore::new(params, config)?,
        })
    }

    /// 使用默认超参数（lr=1e-3, kp=1, ki=0.1, kd=0.01, a=0.1, c=0.1）创建
    pub fn new_default(params: &[Parameter]) -> Result<Self, OptimizerError> {
        Self::new(params, EnhancedPidConfig::default())
    }

    /// 追加一个参数组；参数不能与已有参数组重复
    pub fn add_param_group(
        &mut self,
        params: &[Parameter],
        config: EnhancedPidConfig,
    ) -> Result<(), OptimizerError> {
        self.core.add_param_group(params, config)
    }

    pub fn param_groups(&self) -> &[ParamGroup<EnhancedPidConfig>] {
        self.core.groups()
    }

    /// 整体替换某个参数组的超参数
    pub fn set_group_config(
        &mut self,
        index: usize,
        config: EnhancedPidConfig,
    ) -> Result<(), OptimizerError> {
        self.core.set_group_config(index, config)
    }

    /// 获取指定参数的状态记录；参数从未带梯度参与`step`时为`None`
    pub fn state(&self, param: &Parameter) -> Option<&PidState> {
        self.core.state(param)
    }

    pub fn state_len(&self) -> usize {
        self.core.state_len()
    }

    pub fn state_dict(&self) -> OptimizerStateDict<EnhancedPidConfig> {
        self.core.state_dict()
    }

    pub fn load_state_dict(
        &mut self,
        dict: OptimizerStateDict<EnhancedPidConfig>,
    ) -> Result<(), OptimizerError> {
        self.core.load_state_dict(dict)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), OptimizerError> {
        self.core.save(path)
    }

    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), OptimizerError> {
        self.core.load(path)
    }
}

impl Optimizer for EnhancedPidao {
    fn step(&mut self) -> Result<(), OptimizerError> {
        self.core.step(|config, value, velocity, grad| {
            let enhanced_update = config.velocity_coefficient * velocity + grad;
            *value -= config.pid.lr * &enhanced_update;
        })
    }

    fn zero_grad(&mut self) {
        self.core.zero_grad();
    }

    fn learning_rate(&self) -> f32 {
        self.core.learning_rate()
    }

    fn set_learning_rate(&mut self, lr: f32) -> Result<(), OptimizerError> {
        self.core.set_learning_rate(lr)
    }

    fn reset(&mut self) {
        self.core.reset();
    }
}
