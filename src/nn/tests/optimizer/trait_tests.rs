/*
 * @Author       : 老董
 * @Date         : 2026-03-06
 * @Description  : Optimizer trait 通用行为测试
 *
 * 这些测试验证两种 PIDAO 实现的共同行为和 trait 约束
 */

use approx::assert_abs_diff_eq;

use super::{scalar_param, value_of};
use crate::assert_err;
use crate::nn::Parameter;
use crate::nn::grad_mode::{GradModeGuard, is_grad_enabled};
use crate::nn::optimizer::{
    EnhancedPidConfig, EnhancedPidao, Optimizer, OptimizerError, PidConfig, Pidao,
};
use crate::tensor::Tensor;

fn both_optimizers(params: &[Parameter]) -> Vec<Box<dyn Optimizer>> {
    let config = PidConfig::new(0.1, 1., 0., 0., 0.);
    vec![
        Box::new(Pidao::new(params, config).unwrap()),
        Box::new(EnhancedPidao::new(params, EnhancedPidConfig::from(config)).unwrap()),
    ]
}

#[test]
fn test_optimizer_trait_implementations() {
    for mut optimizer in both_optimizers(&[]) {
        assert_eq!(optimizer.learning_rate(), 0.1);
        optimizer.set_learning_rate(0.02).unwrap();
        assert_eq!(optimizer.learning_rate(), 0.02);
        optimizer.step().unwrap();
    }
}

#[test]
fn test_zero_grad_clears_all_params() {
    let a = scalar_param(1., Some(1.));
    let b = Parameter::new(Tensor::zeros(&[2, 2]));
    b.set_grad(Some(Tensor::ones(&[2, 2])));

    for mut optimizer in both_optimizers(&[a.clone(), b.clone()]) {
        optimizer.zero_grad();
        assert!(!a.has_grad());
        assert!(!b.has_grad());

        // 梯度清空后 step 不做任何改动
        optimizer.step().unwrap();
        assert_eq!(value_of(&a), 1.);
        assert_eq!(b.value(), Tensor::zeros(&[2, 2]));
    }
}

#[test]
fn test_step_with_closure_returns_loss_and_updates() {
    let p = scalar_param(10., None);
    let mut optimizer = Pidao::new(&[p.clone()], PidConfig::new(0.1, 1., 0., 0., 0.)).unwrap();

    // 闭包负责写入梯度（相当于 forward + backward）
    let handle = p.clone();
    let loss = optimizer
        .step_with_closure(&mut || {
            handle.set_grad(Some(Tensor::new(&[1.], &[1])));
            Ok(0.5)
        })
        .unwrap();
    assert_eq!(loss, 0.5);
    assert_abs_diff_eq!(value_of(&p), 9.9, epsilon = 1e-5);
}

#[test]
fn test_closure_runs_with_grad_enabled() {
    let p = scalar_param(10., Some(1.));
    let mut optimizer = Pidao::new(&[p.clone()], PidConfig::default()).unwrap();

    let outer = GradModeGuard::no_grad();
    let mut seen = None;
    optimizer
        .step_with_closure(&mut || {
            seen = Some(is_grad_enabled());
            Ok(1.)
        })
        .unwrap();

    assert_eq!(seen, Some(true));
    // step 结束后恢复调用前的状态
    assert!(!is_grad_enabled());
    drop(outer);
    assert!(is_grad_enabled());
}

#[test]
fn test_grad_mode_restored_after_step() {
    let p = scalar_param(10., Some(1.));
    let mut optimizer = EnhancedPidao::new_default(&[p]).unwrap();
    optimizer.step().unwrap();
    assert!(is_grad_enabled());
}

#[test]
fn test_closure_error_propagates_without_update() {
    let p = scalar_param(10., Some(1.));
    for mut optimizer in both_optimizers(&[p.clone()]) {
        let result =
            optimizer.step_with_closure(&mut || Err(OptimizerError::ClosureFailed("loss为NaN".to_string())));
        assert_err!(result, OptimizerError::ClosureFailed("loss为NaN"));
        assert_eq!(value_of(&p), 10.);
        assert!(p.has_grad());
    }
}

#[test]
fn test_reset_through_trait_object() {
    let p = scalar_param(10., Some(1.));
    for mut optimizer in both_optimizers(&[p.clone()]) {
        optimizer.step().unwrap();
        optimizer.reset();
        // 状态清空后第二次 step 的结果与首次相同
        let before = value_of(&p);
        optimizer.step().unwrap();
        let first_delta = value_of(&p) - before;
        optimizer.reset();
        let before = value_of(&p);
        optimizer.step().unwrap();
        assert_abs_diff_eq!(value_of(&p) - before, first_delta, epsilon = 1e-6);
    }
}
