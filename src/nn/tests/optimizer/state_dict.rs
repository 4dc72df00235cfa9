use approx::assert_abs_diff_eq;

use super::{scalar_param, value_of};
use crate::assert_err;
use crate::nn::Parameter;
use crate::nn::optimizer::{
    EnhancedPidConfig, EnhancedPidao, GroupStateDict, Optimizer, OptimizerError,
    OptimizerStateDict, PidConfig, PidState, Pidao,
};
use crate::tensor::Tensor;

const CONFIG: PidConfig = PidConfig::new(0.1, 1., 0.5, 0.1, 0.3);

#[test]
fn test_state_dict_follows_registration_order() {
    let a = scalar_param(1., Some(1.));
    let b = scalar_param(1., None);
    let mut optimizer = Pidao::new(&[a.clone(), b], CONFIG).unwrap();
    optimizer.step().unwrap();

    let dict = optimizer.state_dict();
    assert_eq!(dict.groups.len(), 1);
    assert_eq!(dict.groups[0].config, CONFIG);
    assert_eq!(dict.groups[0].states.len(), 2);
    assert_eq!(dict.groups[0].states[0].as_ref(), optimizer.state(&a));
    assert!(dict.groups[0].states[1].is_none());
    assert_eq!(dict.num_states(), 1);
}

#[test]
fn test_json_round_trip() {
    let p = Parameter::new(Tensor::new(&[1., 2., 3.], &[3]));
    p.set_grad(Some(Tensor::new(&[0.5, -0.5, 1.], &[3])));
    let mut optimizer = EnhancedPidao::new(&[p], EnhancedPidConfig::from(CONFIG)).unwrap();
    optimizer.step().unwrap();
    optimizer.step().unwrap();

    let dict = optimizer.state_dict();
    let json = dict.to_json().unwrap();
    assert!(json.contains("velocity_coefficient"));
    let back = OptimizerStateDict::<EnhancedPidConfig>::from_json(&json).unwrap();
    assert_eq!(back, dict);
}

#[test]
fn test_loaded_optimizer_continues_identically() {
    let original = scalar_param(10., Some(1.));
    let mut optimizer = Pidao::new(&[original.clone()], CONFIG).unwrap();
    for _ in 0..3 {
        optimizer.step().unwrap();
    }

    let restored = scalar_param(value_of(&original), Some(1.));
    let mut other = Pidao::new(&[restored.clone()], PidConfig::default()).unwrap();
    other.load_state_dict(optimizer.state_dict()).unwrap();
    assert_eq!(other.param_groups()[0].config(), &CONFIG);
    assert_eq!(other.state(&restored), optimizer.state(&original));

    for _ in 0..3 {
        optimizer.step().unwrap();
        other.step().unwrap();
        assert_abs_diff_eq!(value_of(&restored), value_of(&original), epsilon = 1e-6);
    }
}

#[test]
fn test_load_none_removes_existing_state() {
    let p = scalar_param(10., Some(1.));
    let mut optimizer = Pidao::new(&[p.clone()], CONFIG).unwrap();
    optimizer.step().unwrap();
    assert_eq!(optimizer.state_len(), 1);

    let fresh = Pidao::new(&[scalar_param(0., None)], CONFIG).unwrap();
    optimizer.load_state_dict(fresh.state_dict()).unwrap();
    assert_eq!(optimizer.state_len(), 0);
}

#[test]
fn test_load_mismatch_leaves_optimizer_untouched() {
    let p = Parameter::new(Tensor::zeros(&[2]));
    p.set_grad(Some(Tensor::ones(&[2])));
    let mut optimizer = Pidao::new(&[p.clone()], CONFIG).unwrap();
    optimizer.step().unwrap();
    let before = optimizer.state_dict();

    // 参数组数量不同
    let mut dict = before.clone();
    dict.groups.push(dict.groups[0].clone());
    assert_err!(
        optimizer.load_state_dict(dict),
        OptimizerError::StateDictMismatch(msg) if msg.contains("参数组数量")
    );

    // 组内参数数量不同
    let mut dict = before.clone();
    dict.groups[0].states.push(None);
    assert_err!(
        optimizer.load_state_dict(dict),
        OptimizerError::StateDictMismatch(msg) if msg.contains("参数数量")
    );

    // 状态形状与参数不同
    let dict = OptimizerStateDict {
        groups: vec![GroupStateDict {
            config: PidConfig::default(),
            states: vec![Some(PidState::zeros(&[5]))],
        }],
    };
    assert_err!(
        optimizer.load_state_dict(dict),
        OptimizerError::ShapeMismatch([2], [5])
    );

    // 超参数非法
    let mut dict = before.clone();
    dict.groups[0].config.lr = -1.;
    assert_err!(
        optimizer.load_state_dict(dict),
        OptimizerError::InvalidHyperParameter { .. }
    );

    assert_eq!(optimizer.state_dict(), before);
}

#[test]
fn test_load_rejects_invalid_config_in_any_group() {
    let a = scalar_param(10., Some(1.));
    let b = scalar_param(10., Some(1.));
    let config = EnhancedPidConfig::from(CONFIG);
    let mut optimizer = EnhancedPidao::new(&[a], config).unwrap();
    optimizer.add_param_group(&[b], config).unwrap();
    optimizer.step().unwrap();
    let before = optimizer.state_dict();

    // 第一组合法、第二组的速度系数非法：整份状态字典都不加载
    let mut dict = before.clone();
    dict.groups[0].config = config.with_velocity_coefficient(0.5);
    dict.groups[0].states[0] = None;
    dict.groups[1].config = config.with_velocity_coefficient(f32::INFINITY);
    assert_err!(
        optimizer.load_state_dict(dict),
        OptimizerError::InvalidHyperParameter { name, .. } if *name == "velocity_coefficient"
    );
    assert_eq!(optimizer.state_dict(), before);
    assert_eq!(optimizer.state_len(), 2);
}

#[test]
fn test_save_and_load_file() {
    let path = std::env::temp_dir().join("pidao_test_optimizer_state.bin");
    let p = scalar_param(10., Some(1.));
    let mut optimizer = EnhancedPidao::new_default(&[p.clone()]).unwrap();
    optimizer.step().unwrap();
    optimizer.save(&path).unwrap();

    let q = scalar_param(10., None);
    let mut other = EnhancedPidao::new_default(&[q.clone()]).unwrap();
    other.load(&path).unwrap();
    assert_eq!(other.state(&q), optimizer.state(&p));
    assert_eq!(other.state_dict(), optimizer.state_dict());

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_load_errors() {
    let mut optimizer = Pidao::new_default(&[]).unwrap();

    let missing = std::env::temp_dir().join("pidao_test_missing_dir/none.bin");
    assert_err!(optimizer.load(&missing), OptimizerError::Io(_));

    let path = std::env::temp_dir().join("pidao_test_corrupt_state.bin");
    std::fs::write(&path, [0xffu8; 3]).unwrap();
    assert_err!(optimizer.load(&path), OptimizerError::Bincode(_));
    std::fs::remove_file(&path).ok();

    let result = OptimizerStateDict::<PidConfig>::from_json("{\"groups\": 1}");
    assert_err!(result, OptimizerError::Json(_));
}
