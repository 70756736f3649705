//! Property tests for the stage invariants.
//!
//! Run with: cargo test --test properties

use proptest::prelude::*;
use std::collections::HashSet;
use xnornet::bits::{bipolar_sum, matches, to_bipolar};
use xnornet::dense::first_max;
use xnornet::pad::{crop, pad};
use xnornet::pool::or_pool;
use xnornet::reshape::flatten;
use xnornet::{Activation, ConvDims, ConvLayer, DenseLayer, FeatureMap, FmapShape, Layout};

// =============================================================================
// Strategies
// =============================================================================

fn arb_fmap(max_channels: usize, max_width: usize) -> impl Strategy<Value = FeatureMap> {
    (1..=max_channels, 0..=max_width).prop_flat_map(|(channels, width)| {
        let shape = FmapShape::new(channels, width);
        prop::collection::vec(any::<bool>(), shape.len()).prop_map(move |bits| {
            FeatureMap::new(shape, Layout::ChannelMajor, bits).unwrap()
        })
    })
}

fn arb_bit_pair(max_len: usize) -> impl Strategy<Value = (Vec<bool>, Vec<bool>)> {
    (0..=max_len).prop_flat_map(|len| {
        (
            prop::collection::vec(any::<bool>(), len),
            prop::collection::vec(any::<bool>(), len),
        )
    })
}

// =============================================================================
// Padding
// =============================================================================

proptest! {
    #[test]
    fn pad_then_crop_is_identity(input in arb_fmap(4, 8), half in 0usize..3) {
        let padding = half * 2;
        let padded = pad(&input, padding).unwrap();
        prop_assert_eq!(crop(&padded, padding).unwrap(), input.clone());
        // everything outside the interior is zero
        prop_assert_eq!(padded.count_ones(), input.count_ones());
    }
}

// =============================================================================
// XNOR-popcount
// =============================================================================

proptest! {
    #[test]
    fn bipolar_sum_is_mapped_dot_product((a, b) in arb_bit_pair(64)) {
        let dot: i32 = a.iter().zip(b.iter()).map(|(&x, &y)| to_bipolar(x) * to_bipolar(y)).sum();
        prop_assert_eq!(bipolar_sum(matches(&a, &b), a.len() as u32), dot);
    }
}

// =============================================================================
// Conv thresholds
// =============================================================================

fn single_output_conv(weights: Vec<bool>, threshold: i16) -> ConvLayer {
    let dims = ConvDims {
        in_channels: 2,
        out_channels: 1,
        input_width: 3,
        kernel: 3,
        padding: 0,
    };
    ConvLayer::new(dims, weights, vec![threshold]).unwrap()
}

proptest! {
    #[test]
    fn raising_threshold_never_sets_a_bit(
        weights in prop::collection::vec(any::<bool>(), 18),
        input in prop::collection::vec(any::<bool>(), 18),
        t in -20i16..20,
        dt in 0i16..10,
    ) {
        let input = FeatureMap::new(FmapShape::new(2, 3), Layout::ChannelMajor, input).unwrap();
        let low = single_output_conv(weights.clone(), t).forward(&input).unwrap();
        let high = single_output_conv(weights.clone(), t + dt).forward(&input).unwrap();
        prop_assert!(high.bits()[0] <= low.bits()[0]);

        let sum = single_output_conv(weights, t).signed_sum(&input, 0, 0, 0).unwrap();
        prop_assert_eq!(low.bits()[0], sum > t as i32);
    }
}

// =============================================================================
// Pooling
// =============================================================================

proptest! {
    #[test]
    fn pooling_uniform_blocks(blocks in arb_fmap(3, 6)) {
        let shape = blocks.shape();
        let mut input = FeatureMap::zeros(FmapShape::new(shape.channels, shape.width * 2), Layout::ChannelMajor);
        for (c, x, y) in input.shape().indices() {
            input.set(c, x, y, blocks.get(c, x / 2, y / 2));
        }
        prop_assert_eq!(or_pool(&input).unwrap(), blocks);
    }

    #[test]
    fn pooling_is_block_or(input in arb_fmap(3, 6).prop_filter("even width", |f| f.shape().width % 2 == 0)) {
        let out = or_pool(&input).unwrap();
        for (c, x, y) in out.shape().indices() {
            let any = (0..2).any(|dx| (0..2).any(|dy| input.get(c, 2 * x + dx, 2 * y + dy)));
            prop_assert_eq!(out.get(c, x, y), any);
        }
    }
}

// =============================================================================
// Reshape
// =============================================================================

proptest! {
    #[test]
    fn reshape_is_a_bijection(channels in 1usize..40, width in 0usize..8) {
        let shape = FmapShape::new(channels, width);
        let targets: HashSet<usize> = shape
            .indices()
            .map(|(c, x, y)| shape.position_major(c, x, y))
            .collect();
        prop_assert_eq!(targets.len(), shape.len());
        prop_assert!(targets.iter().all(|&i| i < shape.len()));
    }

    #[test]
    fn reshape_preserves_pixels(input in arb_fmap(5, 5)) {
        let out = flatten(&input).unwrap();
        prop_assert_eq!(out.count_ones(), input.count_ones());
        for (c, x, y) in input.shape().indices() {
            prop_assert_eq!(out.get(c, x, y), input.get(c, x, y));
        }
    }
}

// =============================================================================
// Dense arg-max
// =============================================================================

proptest! {
    #[test]
    fn argmax_has_single_winner(
        (m, n, weights, input) in (1usize..100, 1usize..12).prop_flat_map(|(m, n)| (
            Just(m),
            Just(n),
            prop::collection::vec(any::<bool>(), m * n),
            prop::collection::vec(any::<bool>(), m),
        )),
        bias_seed in prop::collection::vec(-4f32..4f32, 12),
    ) {
        let layer = DenseLayer::new(m, n, &weights, bias_seed[..n].to_vec()).unwrap();
        let input = FeatureMap::flat(input);
        let acts = layer.activations(&input).unwrap();
        let distinct: HashSet<u32> = acts.iter().map(|a| a.to_bits()).collect();
        prop_assume!(distinct.len() == n);

        let out = layer.forward(&input, Activation::ArgMax).unwrap();
        prop_assert_eq!(out.count_ones(), 1);
        let winner = out.argmax().unwrap();
        prop_assert!(acts.iter().all(|&a| a <= acts[winner]));
        prop_assert_eq!(first_max(&acts), Some(winner));
    }
}
