/*
 * @Author       : 老董
 * @Date         : 2026-03-04
 * @Description  : 梯度记录开关（线程局部）
 *
 * 外部自动微分系统在记录计算图前应查询`is_grad_enabled()`。
 * 优化器在执行闭包（重新计算loss）时打开该开关，自身的参数运算则在关闭状态下完成。
 * 开关以RAII守卫的形式获取/释放，守卫析构（包括panic展开时）会恢复进入前的状态，因此可以嵌套。
 */

use std::cell::Cell;
use std::marker::PhantomData;
use std::rc::Rc;

thread_local! {
    static GRAD_ENABLED: Cell<bool> = const { Cell::new(true) };
}

/// 当前线程是否处于梯度记录状态（默认开启）
pub fn is_grad_enabled() -> bool {
    GRAD_ENABLED.with(Cell::get)
}

/// 设置梯度记录状态并返回原来的状态
fn set_grad_enabled(enabled: bool) -> bool {
    GRAD_ENABLED.with(|flag| flag.replace(enabled))
}

/// 梯度记录开关的作用域守卫，析构时恢复进入前的状态
///
/// 开关是线程局部的，所以守卫不能跨线程传递。
#[must_use = "守卫被丢弃后开关立即恢复"]
pub struct GradModeGuard {
    prev: bool,
    _not_send: PhantomData<Rc<()>>,
}

impl GradModeGuard {
    /// 关闭梯度记录
    pub fn no_grad() -> Self {
        Self::set(false)
    }

    /// 开启梯度记录
    pub fn enable_grad() -> Self {
        Self::set(true)
    }

    fn set(enabled: bool) -> Self {
        Self {
            prev: set_grad_enabled(enabled),
            _not_send: PhantomData,
        }
    }
}

impl Drop for GradModeGuard {
    fn drop(&mut self) {
        set_grad_enabled(self.prev);
    }
}

/// no_grad 上下文
pub fn no_grad_scope<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = GradModeGuard::no_grad();
    f()
}

/// enable_grad 上下文
pub fn enable_grad_scope<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = GradModeGuard::enable_grad();
    f()
}
