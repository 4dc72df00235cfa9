/*
 * @Author       : 老董
 * @Date         : 2026-03-04
 * @LastEditors  : 老董
 * @LastEditTime : 2026-03-06
 * @Description  : 优化器模块，实现 PyTorch 风格的 PIDAO / Enhanced PIDAO 优化算法
 */

mod base;
mod config;
mod enhanced;
mod error;
mod param_group;
mod pidao;
mod state;
mod state_dict;

pub use base::{LossClosure, Optimizer};
pub use config::{EnhancedPidConfig, GroupConfig, PidConfig};
pub use enhanced::EnhancedPidao;
pub use error::OptimizerError;
pub use param_group::ParamGroup;
pub use pidao::Pidao;
pub use state::PidState;
pub use state_dict::{GroupStateDict, OptimizerStateDict};
