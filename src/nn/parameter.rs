/*
 * @Author       : 老董
 * @Date         : 2026-03-04
 * @Description  : 可训练参数句柄
 *
 * 参数的值与梯度由调用方（模型/训练循环）拥有，优化器只在`step`中原地改写参数值。
 * 梯度由外部自动微分系统写入（`set_grad`），为`None`表示本步没有梯度，优化器会直接跳过该参数。
 */

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::tensor::Tensor;

static NEXT_PARAM_ID: AtomicU64 = AtomicU64::new(0);

/// 参数的身份标识，在`Parameter`创建时分配，进程内唯一
///
/// 克隆出的`Parameter`共享同一个`ParamId`；优化器以它为键保存每个参数的状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParamId(pub u64);

impl ParamId {
    fn next() -> Self {
        Self(NEXT_PARAM_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct ParameterInner {
    value: Tensor,
    grad: Option<Tensor>,
    name: Option<String>,
}

/// 可训练参数（浅拷贝句柄）
///
/// # 使用示例
/// ```ignore
/// let w = Parameter::with_name(Tensor::zeros(&[3, 1]), "w");
/// w.set_grad(Some(grad));   // 由反向传播写入
/// optimizer.step()?;        // 原地更新 w 的值
/// ```
#[derive(Clone)]
pub struct Parameter {
    id: ParamId,
    inner: Rc<RefCell<ParameterInner>>,
}

impl Parameter {
    pub fn new(value: Tensor) -> Self {
        Self::build(value, None)
    }

    pub fn with_name(value: Tensor, name: &str) -> Self {
        Self::build(value, Some(name.to_string()))
    }

    fn build(value: Tensor, name: Option<String>) -> Self {
        Self {
            id: ParamId::next(),
            inner: Rc::new(RefCell::new(ParameterInner {
                value,
                grad: None,
                name,
            })),
        }
    }

    pub const fn id(&self) -> ParamId {
        self.id
    }

    pub fn name(&self) -> Option<String> {
        self.inner.borrow().name.clone()
    }

    pub fn shape(&self) -> Vec<usize> {
        self.inner.borrow().value.shape().to_vec()
    }

    /// 参数当前值（克隆）
    pub fn value(&self) -> Tensor {
        self.inner.borrow().value.clone()
    }

    /// 以只读借用的方式访问参数值，避免克隆
    pub fn value_ref(&self) -> Ref<'_, Tensor> {
        Ref::map(self.inner.borrow(), |inner| &inner.value)
    }

    /// 整体替换参数值（不检查形状；形状变化会在下一次`step`时以`ShapeMismatch`报出）
    pub fn set_value(&self, value: Tensor) {
        self.inner.borrow_mut().value = value;
    }

    /// 当前梯度（克隆）；`None`表示本步没有梯度
    pub fn grad(&self) -> Option<Tensor> {
        self.inner.borrow().grad.clone()
    }

    pub fn has_grad(&self) -> bool {
        self.inner.borrow().grad.is_some()
    }

    /// 写入（或清空）梯度，通常由外部自动微分系统调用
    pub fn set_grad(&self, grad: Option<Tensor>) {
        self.inner.borrow_mut().grad = grad;
    }

    pub fn clear_grad(&self) {
        self.set_grad(None);
    }

    /// 原地改写参数值
    pub(crate) fn update_value<F>(&self, f: F)
    where
        F: FnOnce(&mut Tensor),
    {
        f(&mut self.inner.borrow_mut().value);
    }
}

impl PartialEq for Parameter {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Parameter {}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Parameter")
            .field("id", &self.id)
            .field("name", &inner.name)
            .field("shape", &inner.value.shape())
            .field("has_grad", &inner.grad.is_some())
            .finish()
    }
}
