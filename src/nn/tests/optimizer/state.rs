use approx::assert_abs_diff_eq;

use crate::nn::optimizer::{PidConfig, PidState};
use crate::tensor::Tensor;

#[test]
fn test_zeros_matches_shape() {
    let state = PidState::zeros(&[2, 3]);
    for tensor in [state.velocity(), state.integral(), state.prev_grad()] {
        assert_eq!(tensor.shape(), &[2, 3]);
        assert_eq!(tensor, &Tensor::zeros(&[2, 3]));
    }
}

#[test]
fn test_pid_update_accumulates_integral() {
    let mut state = PidState::zeros(&[2]);
    let grad = Tensor::new(&[1., -2.], &[2]);

    // 第一步：integral = g，derivative = g
    let update = state.pid_update(&grad, 1., 0.5, 0.25);
    // 1*g + 0.5*g + 0.25*g = 1.75*g
    assert_abs_diff_eq!(update, Tensor::new(&[1.75, -3.5], &[2]), epsilon = 1e-6);
    assert_eq!(state.integral(), &grad);

    // pid_update 不负责记录 prev_grad，第二步的微分项仍相对全零计算
    let update = state.pid_update(&grad, 0., 1., 0.);
    assert_abs_diff_eq!(update, Tensor::new(&[2., -4.], &[2]), epsilon = 1e-6);
}

#[test]
fn test_advance_updates_velocity_and_prev_grad() {
    let config = PidConfig::new(0.1, 1., 0., 1., 0.5);
    let mut state = PidState::zeros(&[1]);

    // update = g + (g - 0) = 2，velocity = 0.5*0 - 0.1*2 = -0.2
    state.advance(Tensor::new(&[1.], &[1]), &config);
    assert_abs_diff_eq!(state.velocity(), &Tensor::new(&[-0.2], &[1]), epsilon = 1e-6);
    assert_eq!(state.prev_grad(), &Tensor::new(&[1.], &[1]));

    // update = 3 + (3 - 1) = 5，velocity = 0.5*(-0.2) - 0.1*5 = -0.6
    state.advance(Tensor::new(&[3.], &[1]), &config);
    assert_abs_diff_eq!(state.velocity(), &Tensor::new(&[-0.6], &[1]), epsilon = 1e-6);
    assert_eq!(state.prev_grad(), &Tensor::new(&[3.], &[1]));
    assert_eq!(state.integral(), &Tensor::new(&[4.], &[1]));
}

#[test]
fn test_find_shape_mismatch() {
    let state = PidState::zeros(&[2, 2]);
    assert_eq!(state.find_shape_mismatch(&[2, 2]), None);
    assert_eq!(
        state.find_shape_mismatch(&[4]),
        Some(("velocity", vec![2, 2]))
    );
}
