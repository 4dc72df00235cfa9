/*
 * @Author       : 老董
 * @Date         : 2026-03-02
 * @Description  : 优化器所用的张量：仅保留逐元素运算与形状属性，
 *                 不含矩阵乘法、切片、自动微分等功能（这些由外部框架提供）。
 */

use ndarray::{Array, IxDyn};
use serde::{Deserialize, Serialize};

use crate::errors::{Operator, TensorError};

mod ops {
    pub mod add;
    pub mod add_assign;
    pub mod eq;
    pub mod mul;
    pub mod sub;
    pub mod sub_assign;
}

mod property;


/// 定义张量的结构体。其可以是标量、向量、矩阵或更高维度的数组。
/// 注：只要通Tensor初始化的都是张量（即使标量也是张量）；
/// 而通常意义上的数字（类型为usize、i32、f64等）就只是纯数（number），在这里不被认为是张量。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tensor {
    data: Array<f32, IxDyn>,
}

impl Tensor {
    /// 创建一个张量，若为标量，`shape`可以是[]、[1]、[1,1]、[1,1,1]...
    /// 若为向量，`shape`可以是[n]、[1,n]、[n,1]；
    /// 若为矩阵，`shape`可以是[n,m]；
    /// 若为更高维度的数组，`shape`可以是[c,n,m,...]；
    /// 注：`data`的长度必须和`shape`中所有元素的乘积相等，否则会panic。
    pub fn new(data: &[f32], shape: &[usize]) -> Self {
        let data = Array::from_shape_vec(IxDyn(shape), data.to_vec()).unwrap_or_else(|_| {
            panic!(
                "{}",
                TensorError::DataShapeMismatch {
                    data_len: data.len(),
                    shape: shape.to_vec(),
                }
            )
        });
        Self { data }
    }

    /// 全零张量
    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            data: Array::zeros(IxDyn(shape)),
        }
    }

    /// 全一张量
    pub fn ones(shape: &[usize]) -> Self {
        Self {
            data: Array::ones(IxDyn(shape)),
        }
    }
}

// 私有方法
impl Tensor {
    /// 逐元素二元运算：形状严格一致，或其中一方为标量（广播到另一方的形状）；否则panic
    fn zip_with<F>(&self, other: &Self, operator: Operator, f: F) -> Self
    where
        F: Fn(f32, f32) -> f32,
    {
        let data = if self.is_same_shape(other) {
            ndarray::Zip::from(&self.data)
                .and(&other.data)
                .map_collect(|&a, &b| f(a, b))
        } else if let Some(number) = other.number() {
            self.data.mapv(|a| f(a, number))
        } else if let Some(number) = self.number() {
            other.data.mapv(|b| f(number, b))
        } else {
            panic!(
                "{}",
                TensorError::OperatorError {
                    operator,
                    tensor1_shape: self.shape().to_vec(),
                    tensor2_shape: other.shape().to_vec(),
                }
            )
        };
        Self { data }
    }

    /// 原地逐元素二元运算：形状严格一致，或右操作数为标量；否则panic
    fn zip_assign<F>(&mut self, other: &Self, operator: Operator, f: F)
    where
        F: Fn(&mut f32, f32),
    {
        if self.is_same_shape(other) {
            ndarray::Zip::from(&mut self.data)
                .and(&other.data)
                .for_each(|a, &b| f(a, b));
        } else if let Some(number) = other.number() {
            self.data.map_inplace(|a| f(a, number));
        } else {
            panic!(
                "{}",
                TensorError::OperatorError {
                    operator,
                    tensor1_shape: self.shape().to_vec(),
                    tensor2_shape: other.shape().to_vec(),
                }
            )
        }
    }
}
