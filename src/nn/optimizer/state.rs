/*
 * @Author       : 老董
 * @Date         : 2026-03-04
 * @Description  : 单个参数的优化器状态（速度、积分、上一步梯度）及 PID 滤波核心
 */

use serde::{Deserialize, Serialize};

use super::PidConfig;
use crate::tensor::Tensor;

/// 单个参数的状态记录
///
/// 在该参数第一次带梯度参与`step`时惰性创建，三个张量都从全零开始，且形状始终与参数一致。
/// 此后一直存活到优化器被丢弃（或被`reset`清空），期间没有任何淘汰机制。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PidState {
    velocity: Tensor,
    integral: Tensor,
    prev_grad: Tensor,
}

impl PidState {
    /// 与参数形状一致的全零状态
    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            velocity: Tensor::zeros(shape),
            integral: Tensor::zeros(shape),
            prev_grad: Tensor::zeros(shape),
        }
    }

    /// 速度（动量项）
    pub const fn velocity(&self) -> &Tensor {
        &self.velocity
    }

    /// 积分项：该参数迄今所有梯度之和，不衰减
    pub const fn integral(&self) -> &Tensor {
        &self.integral
    }

    /// 上一次成功更新时所用的梯度
    pub const fn prev_grad(&self) -> &Tensor {
        &self.prev_grad
    }

    /// 找出第一个形状与`shape`不一致的内部张量，返回其名称与形状
    pub(crate) fn find_shape_mismatch(&self, shape: &[usize]) -> Option<(&'static str, Vec<usize>)> {
        [
            ("velocity", &self.velocity),
            ("integral", &self.integral),
            ("prev_grad", &self.prev_grad),
        ]
        .into_iter()
        .find(|(_, tensor)| tensor.shape() != shape)
        .map(|(name, tensor)| (name, tensor.shape().to_vec()))
    }

    /// PID 滤波：累加积分项，并返回 `kp·g + ki·积分 + kd·(g − 上一步梯度)`
    pub(crate) fn pid_update(&mut self, grad: &Tensor, kp: f32, ki: f32, kd: f32) -> Tensor {
        self.integral += grad;
        let derivative = grad - &self.prev_grad;
        kp * grad + ki * &self.integral + kd * &derivative
    }

    /// 推进一步：`velocity ← a·velocity − lr·update`，并把本步梯度留作`prev_grad`
    pub(crate) fn advance(&mut self, grad: Tensor, config: &PidConfig) {
        let update = self.pid_update(&grad, config.kp, config.ki, config.kd);
        self.velocity = config.damping * &self.velocity - config.lr * &update;
        self.prev_grad = grad;
    }
}
