use candle_core::{DType, Device, Tensor};
use appsearch_embed::masked_mean_l2;

#[test]
fn masked_mean_l2_ignores_padding() {
    let dev = Device::Cpu;
    // Three tokens with hidden dim 2; the last token is masked out.
    let h = Tensor::from_slice(&[3.0f32, 0.0,   // token 0
                                 1.0, 4.0,      // token 1
                                 100.0, 100.0], // token 2 (padding)
                               (1, 3, 2), &dev).unwrap();
    let mask = Tensor::from_slice(&[1u32, 1, 0], (1, 3), &dev).unwrap()
        .to_dtype(DType::F32).unwrap();
    let out = masked_mean_l2(&h, &mask).unwrap();
    let v: Vec<Vec<f32>> = out.to_vec2().unwrap();
    // mean = [2, 2] -> unit vector [1/sqrt2, 1/sqrt2]
    let expected = std::f32::consts::FRAC_1_SQRT_2;
    for a in &v[0] { assert!((a - expected).abs() < 1e-5, "a={a}"); }
}

#[test]
fn masked_mean_l2_rejects_rank_two_input() {
    let dev = Device::Cpu;
    let h = Tensor::zeros((2, 4), DType::F32, &dev).unwrap();
    let mask = Tensor::ones((2, 1), DType::F32, &dev).unwrap();
    assert!(masked_mean_l2(&h, &mask).is_err());
}
