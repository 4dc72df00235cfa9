/*
 * @Author       : 老董
 * @Date         : 2026-03-04
 * @Description  : PIDAO 系列优化器的超参数
 *
 * 超参数以不可变值对象的形式挂在每个参数组上；优化器自身从不改写它们，
 * 调用方若要调整（如修改学习率），只能在两次`step`之间整体替换。
 */

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::OptimizerError;

/// 参数组超参数的公共接口
pub trait GroupConfig: Copy + Debug + PartialEq + Serialize + DeserializeOwned {
    /// PID 部分的超参数
    fn pid(&self) -> &PidConfig;

    /// 仅替换学习率后的新配置
    #[must_use]
    fn with_lr(self, lr: f32) -> Self;

    /// 检查所有超参数是否合法
    fn validate(&self) -> Result<(), OptimizerError>;
}

/// 标准 PIDAO 的超参数
///
/// - `lr`：学习率
/// - `kp`：比例增益
/// - `ki`：积分增益
/// - `kd`：微分增益
/// - `damping`：阻尼系数`a`，每步保留上一步速度的比例
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidConfig {
    pub lr: f32,
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    pub damping: f32,
}

impl Default for PidConfig {
    fn default() -> Self {
        Self::new(1e-3, 1.0, 0.1, 0.01, 0.1)
    }
}

impl PidConfig {
    pub const fn new(lr: f32, kp: f32, ki: f32, kd: f32, damping: f32) -> Self {
        Self {
            lr,
            kp,
            ki,
            kd,
            damping,
        }
    }

    #[must_use]
    pub const fn with_lr(mut self, lr: f32) -> Self {
        self.lr = lr;
        self
    }

    #[must_use]
    pub const fn with_kp(mut self, kp: f32) -> Self {
        self.kp = kp;
        self
    }

    #[must_use]
    pub const fn with_ki(mut self, ki: f32) -> Self {
        self.ki = ki;
        self
    }

    #[must_use]
    pub const fn with_kd(mut self, kd: f32) -> Self {
        self.kd = kd;
        self
    }

    #[must_use]
    pub const fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }
}

impl GroupConfig for PidConfig {
    fn pid(&self) -> &PidConfig {
        self
    }

    fn with_lr(self, lr: f32) -> Self {
        Self::with_lr(self, lr)
    }

    fn validate(&self) -> Result<(), OptimizerError> {
        check_finite("lr", self.lr)?;
        check_finite("kp", self.kp)?;
        check_finite("ki", self.ki)?;
        check_finite("kd", self.kd)?;
        check_finite("damping", self.damping)?;
        if self.lr < 0.0 {
            return Err(OptimizerError::InvalidHyperParameter {
                name: "lr",
                value: self.lr,
                reason: "学习率不能为负",
            });
        }
        Ok(())
    }
}

/// 增强版 PIDAO 的超参数：在 PID 超参数之外多一个速度系数`c`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnhancedPidConfig {
    pub pid: PidConfig,
    pub velocity_coefficient: f32,
}

impl Default for EnhancedPidConfig {
    fn default() -> Self {
        Self::new(PidConfig::default(), 0.1)
    }
}

impl EnhancedPidConfig {
    pub const fn new(pid: PidConfig, velocity_coefficient: f32) -> Self {
        Self {
            pid,
            velocity_coefficient,
        }
    }

    #[must_use]
    pub const fn with_velocity_coefficient(mut self, velocity_coefficient: f32) -> Self {
        self.velocity_coefficient = velocity_coefficient;
        self
    }
}

impl From<PidConfig> for EnhancedPidConfig {
    fn from(pid: PidConfig) -> Self {
        Self::new(pid, 0.1)
    }
}

impl GroupConfig for EnhancedPidConfig {
    fn pid(&self) -> &PidConfig {
        &self.pid
    }

    fn with_lr(mut self, lr: f32) -> Self {
        self.pid = self.pid.with_lr(lr);
        self
    }

    fn validate(&self) -> Result<(), OptimizerError> {
        self.pid.validate()?;
        check_finite("velocity_coefficient", self.velocity_coefficient)
    }
}

fn check_finite(name: &'static str, value: f32) -> Result<(), OptimizerError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(OptimizerError::InvalidHyperParameter {
            name,
            value,
            reason: "须为有限值",
        })
    }
}
