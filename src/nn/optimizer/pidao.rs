/*
 * @Author       : 老董
 * @Date         : 2026-03-05
 * @Description  : PIDAO（Proportional-Integral-Derivative Accelerated Optimizer）
 */

use std::path::Path;

use super::base::{Optimizer, PidCore};
use super::{OptimizerError, OptimizerStateDict, ParamGroup, PidConfig, PidState};
use crate::nn::Parameter;

/// PIDAO 优化器
///
/// 在“动量 + 阻尼”的经典物理模型之上，对梯度信号施加 PID 控制：
/// - integral = integral + g
/// - update = kp * g + ki * integral + kd * (g - g_prev)
/// - velocity = a * velocity - lr * update
/// - θ = θ + velocity
///
/// 速度本身就是参数位移，不再额外乘学习率。积分项不衰减，会随训练步数无界累积。
///
/// # 使用示例
/// ```ignore
/// let mut optimizer = Pidao::new(&model.parameters(), PidConfig::default().with_lr(0.01))?;
/// optimizer.zero_grad();
/// loss.backward()?;
/// optimizer.step()?;
/// ```
#[derive(Debug)]
pub struct Pidao {
    core: PidCore<PidConfig>,
}

impl Pidao {
    /// 创建新的 PIDAO 优化器（所有参数归入同一参数组）
    pub fn new(params: &[Parameter], config: PidConfig) -> Result<Self, OptimizerError> {
        Ok(Self {
            core: PidCore::new(params, config)?,
        })
    }

    /// 使用默认超参数（lr=1e-3, kp=1, ki=0.1, kd=0.01, a=0.1）创建
    pub fn new_default(params: &[Parameter]) -> Result<Self, OptimizerError> {
        Self::new(params, PidConfig::default())
    }

    /// 追加一个参数组；参数不能与已有参数组重复
    pub fn add_param_group(
        &mut self,
        params: &[Parameter],
        config: PidConfig,
    ) -> Result<(), OptimizerError> {
        self.core.add_param_group(params, config)
    }

    pub fn param_groups(&self) -> &[ParamGroup<PidConfig>] {
        self.core.groups()
    }

    /// 整体替换某个参数组的超参数
    pub fn set_group_config(
        &mut self,
        index: usize,
        config: PidConfig,
    ) -> Result<(), OptimizerError> {
        self.core.set_group_config(index, config)
    }

    /// 获取指定参数的状态记录；参数从未带梯度参与`step`时为`None`
    pub fn state(&self, param: &Parameter) -> Option<&PidState> {
        self.core.state(param)
    }

    /// 已建立的状态记录数
    pub fn state_len(&self) -> usize {
        self.core.state_len()
    }

    pub fn state_dict(&self) -> OptimizerStateDict<PidConfig> {
        self.core.state_dict()
    }

    pub fn load_state_dict(
        &mut self,
        dict: OptimizerStateDict<PidConfig>,
    ) -> Result<(), OptimizerError> {
        self.core.load_state_dict(dict)
    }

    /// 以bincode格式把状态字典写入文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), OptimizerError> {
        self.core.save(path)
    }

    /// 从文件读取状态字典并加载
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), OptimizerError> {
        self.core.load(path)
    }
}

impl Optimizer for Pidao {
    fn step(&mut self) -> Result<(), OptimizerError> {
        // θ ← θ + velocity
        self.core.step(|_, value, velocity, _| *value += velocity)
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
