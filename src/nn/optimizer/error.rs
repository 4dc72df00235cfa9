/*
 * @Author       : 老董
 * @Date         : 2026-03-04
 * @Description  : 优化器错误类型
 *
 * 参数没有梯度不是错误（该参数本步直接跳过），所以这里没有对应的变体。
 */

use thiserror::Error;

use crate::nn::ParamId;

#[derive(Error, Debug)]
pub enum OptimizerError {
    /// 梯度或优化器状态的形状与参数不一致；`step`会在改写任何参数之前发现并返回
    #[error("参数{param}的{tensor}形状为{got:?}，与参数形状{expected:?}不一致")]
    ShapeMismatch {
        param: ParamId,
        tensor: &'static str,
        expected: Vec<usize>,
        got: Vec<usize>,
    },
    #[error("参数{0}在参数组中重复出现")]
    DuplicateParameter(ParamId),
    #[error("超参数`{name}`的取值{value}无效：{reason}")]
    InvalidHyperParameter {
        name: &'static str,
        value: f32,
        reason: &'static str,
    },
    #[error("参数组索引{index}超出范围（共{len}组）")]
    GroupIndexOutOfRange { index: usize, len: usize },
    #[error("状态字典与优化器不匹配：{0}")]
    StateDictMismatch(String),
    /// 供`step_with_closure`的闭包报告失败，优化器原样向上传递
    #[error("计算loss的闭包执行失败：{0}")]
    ClosureFailed(String),
    #[error("读写优化器状态文件失败：{0}")]
    Io(#[from] std::io::Error),
    #[error("优化器状态二进制（反）序列化失败：{0}")]
    Bincode(#[from] bincode::Error),
    #[error("优化器状态JSON（反）序列化失败：{0}")]
    Json(#[from] serde_json::Error),
}
