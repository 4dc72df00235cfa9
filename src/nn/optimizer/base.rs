/*
 * @Author       : 老董
 * @Date         : 2026-03-05
 * @Description  : 优化器基础trait，以及两种 PIDAO 共用的参数组/状态管理
 */

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use super::{
    GroupConfig, GroupStateDict, OptimizerError, OptimizerStateDict, ParamGroup, PidState,
};
use crate::nn::grad_mode::{enable_grad_scope, GradModeGuard};
use crate::nn::{ParamId, Parameter};
use crate::tensor::Tensor;

/// 计算loss的闭包：在梯度记录开启的状态下重新前向计算（并反向传播），返回标量loss
pub type LossClosure<'a> = dyn FnMut() -> Result<f32, OptimizerError> + 'a;

/// 优化器核心 trait
///
/// `PyTorch` 风格训练循环：
/// ```ignore
/// optimizer.zero_grad();
/// let loss = model.forward(x)?.mse_loss(&y)?;
/// loss.backward()?;          // 外部自动微分系统写入各参数的梯度
/// optimizer.step()?;         // ← 只更新参数，不做 forward/backward
///
/// // 或者把重新计算loss的过程交给优化器
/// let loss = optimizer.step_with_closure(&mut || { ... })?;
/// ```
pub trait Optimizer {
    /// 参数更新（使用已写入的梯度），无梯度的参数直接跳过
    fn step(&mut self) -> Result<(), OptimizerError>;

    /// 先在梯度记录开启的状态下调用`closure`，再执行参数更新，并原样返回闭包的loss
    ///
    /// 闭包失败时错误原样返回，此时没有任何参数或状态被改动。
    fn step_with_closure(&mut self, closure: &mut LossClosure<'_>) -> Result<f32, OptimizerError> {
        let loss = enable_grad_scope(closure)?;
        self.step()?;
        Ok(loss)
    }

    /// 清空所有注册参数的梯度
    fn zero_grad(&mut self);

    /// 获取学习率（第一个参数组的学习率）
    fn learning_rate(&self) -> f32;

    /// 设置学习率（作用于所有参数组），只应在两次`step`之间调用
    fn set_learning_rate(&mut self, lr: f32) -> Result<(), OptimizerError>;

    /// 清空所有参数的状态记录
    fn reset(&mut self);
}

/// 参数组与按参数身份索引的状态记录（两种 PIDAO 共用）
#[derive(Debug)]
pub(crate) struct PidCore<C: GroupConfig> {
    groups: Vec<ParamGroup<C>>,
    states: HashMap<ParamId, PidState>,
}

/// 本步需要更新的参数
struct PendingUpdate<C> {
    param: Parameter,
    grad: Tensor,
    config: C,
}

impl<C: GroupConfig> PidCore<C> {
    pub(crate) fn new(params: &[Parameter], config: C) -> Result<Self, OptimizerError> {
        let mut core = Self {
            groups: Vec::new(),
            states: HashMap::new(),
        };
        core.add_param_group(params, config)?;
        Ok(core)
    }

    pub(crate) fn add_param_group(
        &mut self,
        params: &[Parameter],
        config: C,
    ) -> Result<(), OptimizerError> {
        config.validate()?;

        let mut seen: HashSet<ParamId> = self
            .groups
            .iter()
            .flat_map(|group| group.params().iter().map(Parameter::id))
            .collect();
        for param in params {
            if !seen.insert(param.id()) {
                return Err(OptimizerError::DuplicateParameter(param.id()));
            }
        }

        log::debug!(
            "新增第{}个参数组：{}个参数，{:?}",
            self.groups.len(),
            params.len(),
            config
        );
        self.groups.push(ParamGroup::new(params, config));
        Ok(())
    }

    pub(crate) fn groups(&self) -> &[ParamGroup<C>] {
        &self.groups
    }

    pub(crate) fn set_group_config(
        &mut self,
        index: usize,
        config: C,
    ) -> Result<(), OptimizerError> {
        config.validate()?;
        let len = self.groups.len();
        let group = self
            .groups
            .get_mut(index)
            .ok_or(OptimizerError::GroupIndexOutOfRange { index, len })?;
        group.set_config(config);
        Ok(())
    }

    pub(crate) fn state(&self, param: &Parameter) -> Option<&PidState> {
        self.states.get(&param.id())
    }

    pub(crate) fn state_len(&self) -> usize {
        self.states.len()
    }

    /// 执行一步更新
    ///
    /// `apply`负责最后的组合：给定参数值、本步新速度与梯度，原地写出新的参数值。
    pub(crate) fn step<F>(&mut self, apply: F) -> Result<(), OptimizerError>
    where
        F: Fn(&C, &mut Tensor, &Tensor, &Tensor),
    {
        let _no_grad = GradModeGuard::no_grad();

        // 先整体校验形状，确保失败时不会只更新了一部分参数
        let pending = self.collect_pending()?;
        let stepped = pending.len();
        let skipped = self.num_params() - stepped;

        for PendingUpdate {
            param,
            grad,
            config,
        } in pending
        {
            let state = self.states.entry(param.id()).or_insert_with(|| {
                log::debug!("为参数{}（{:?}）建立状态记录", param.id(), param.name());
                PidState::zeros(grad.shape())
            });
            // 梯度移交给状态，作为下一步的 prev_grad
            state.advance(grad, config.pid());
            param.update_value(|value| apply(&config, value, state.velocity(), state.prev_grad()));
        }

        log::trace!("step完成：更新{stepped}个参数，跳过{skipped}个无梯度参数");
        Ok(())
    }

    fn num_params(&self) -> usize {
        self.groups.iter().map(|group| group.params().len()).sum()
    }

    fn collect_pending(&self) -> Result<Vec<PendingUpdate<C>>, OptimizerError> {
        let mut pending = Vec::new();
        for group in &self.groups {
            for param in group.params() {
                let Some(grad) = param.grad() else {
                    continue;
                };
                let shape = param.shape();
                if grad.shape() != shape.as_slice() {
                    return Err(OptimizerError::ShapeMismatch {
                        param: param.id(),
                        tensor: "grad",
                        expected: shape,
                        got: grad.shape().to_vec(),
                    });
                }
                if let Some((tensor, got)) = self
                    .states
                    .get(&param.id())
                    .and_then(|state| state.find_shape_mismatch(&shape))
                {
                    return Err(OptimizerError::ShapeMismatch {
                        param: param.id(),
                        tensor,
                        expected: shape,
                        got,
                    });
                }
                pending.push(PendingUpdate {
                    param: param.clone(),
                    grad,
                    config: *group.config(),
                });
            }
        }
        Ok(pending)
    }

    pub(crate) fn zero_grad(&self) {
        for param in self.groups.iter().flat_map(ParamGroup::params) {
            param.clear_grad();
        }
    }

    /// 构造时至少注册了一个参数组，所以第一组总是存在
    pub(crate) fn learning_rate(&self) -> f32 {
        self.groups[0].config().pid().lr
    }

    pub(crate) fn set_learning_rate(&mut self, lr: f32) -> Result<(), OptimizerError> {
        let configs = self
            .groups
            .iter()
            .map(|group| {
                let config = group.config().with_lr(lr);
                config.validate().map(|()| config)
            })
            .collect::<Result<Vec<_>, _>>()?;
        for (group, config) in self.groups.iter_mut().zip(configs) {
            group.set_config(config);
        }
        Ok(())
    }

    pub(crate) fn reset(&mut self) {
        log::debug!("清空{}个参数的状态记录", self.states.len());
        self.states.clear();
    }

    pub(crate) fn state_dict(&self) -> OptimizerStateDict<C> {
        let groups = self
            .groups
            .iter()
            .map(|group| GroupStateDict {
                config: *group.config(),
                states: group
                    .params()
                    .iter()
                    .map(|param| self.states.get(&param.id()).cloned())
                    .collect(),
            })
            .collect();
        OptimizerStateDict { groups }
    }

    /// 加载状态字典；先完整校验，任何不匹配都不会改动当前优化器
    pub(crate) fn load_state_dict(
        &mut self,
        dict: OptimizerStateDict<C>,
    ) -> Result<(), OptimizerError> {
        if dict.groups.len() != self.groups.len() {
            return Err(OptimizerError::StateDictMismatch(format!(
                "参数组数量不同：状态字典有{}组，优化器有{}组",
                dict.groups.len(),
                self.groups.len()
            )));
        }
        for (index, (saved, group)) in dict.groups.iter().zip(&self.groups).enumerate() {
            if saved.states.len() != group.params().len() {
                return Err(OptimizerError::StateDictMismatch(format!(
                    "第{index}组参数数量不同：状态字典有{}个，优化器有{}个",
                    saved.states.len(),
                    group.params().len()
                )));
            }
            saved.config.validate()?;
            for (state, param) in saved.states.iter().zip(group.params()) {
                let shape = param.shape();
                if let Some((tensor, got)) =
                    state.as_ref().and_then(|state| state.find_shape_mismatch(&shape))
                {
                    return Err(OptimizerError::ShapeMismatch {
                        param: param.id(),
                        tensor,
                        expected: shape,
                        got,
                    });
                }
            }
        }

        for (saved, group) in dict.groups.into_iter().zip(self.groups.iter_mut()) {
            group.set_config(saved.config);
            for (state, param) in saved.states.into_iter().zip(group.params()) {
                match state {
                    Some(state) => {
                        self.states.insert(param.id(), state);
                    }
                    None => {
                        self.states.remove(&param.id());
                    }
                }
            }
        }
        log::debug!("已加载状态字典，共{}个状态记录", self.states.len());
        Ok(())
    }

    pub(crate) fn save(&self, path: impl AsRef<Path>) -> Result<(), OptimizerError> {
        let file = File::create(path)?;
        bincode::serialize_into(BufWriter::new(file), &self.state_dict())?;
        Ok(())
    }

    pub(crate) fn load(&mut self, path: impl AsRef<Path>) -> Result<(), OptimizerError> {
        let file = File::open(path)?;
        let dict: OptimizerStateDict<C> = bincode::deserialize_from(BufReader::new(file))?;
        self.load_state_dict(dict)
    }
}
