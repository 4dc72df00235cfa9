/*
 * @Author       : 老董
 * @Date         : 2026-03-04
 * @Description  : 神经网络训练相关：可训练参数、梯度记录开关与优化器
 */

pub mod grad_mode;
pub mod optimizer;
mod parameter;

pub use parameter::{ParamId, Parameter};
