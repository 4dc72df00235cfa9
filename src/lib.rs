//! # PIDAO
//!
//! `pidao`在经典的“动量 + 阻尼”梯度下降之上叠加了一个作用于梯度信号的
//! PID（比例-积分-微分）反馈控制器，提供两种参数更新规则：
//! - [`nn::optimizer::Pidao`]：PID滤波后的速度（velocity）直接作为参数位移；
//! - [`nn::optimizer::EnhancedPidao`]：把速度与原始梯度混合后，再乘以学习率并从参数中减去。
//!
//! 张量（[`tensor::Tensor`]）与参数句柄（[`nn::Parameter`]）只实现了优化器所需的最小功能，
//! 梯度由外部的自动微分/训练循环负责写入。
//!

pub mod errors;
pub mod nn;
pub mod tensor;
pub mod utils;
