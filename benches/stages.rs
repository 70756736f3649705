#[macro_use]
extern crate criterion;
use criterion::{black_box, BatchSize, BenchmarkId, Criterion};
use rand::Rng;
use rand::SeedableRng;
use rand_hc::Hc128Rng;
use xnornet::pad::pad;
use xnornet::pool::or_pool;
use xnornet::reshape::flatten;
use xnornet::{
    Activation, ConvDims, ConvParams, DenseParams, FeatureMap, FmapShape, Layout, ModelParams,
    NetConfig, Network,
};

fn rand_fmap<R: Rng>(rng: &mut R, shape: FmapShape) -> FeatureMap {
    let bits = (0..shape.len()).map(|_| rng.gen()).collect();
    FeatureMap::new(shape, Layout::ChannelMajor, bits).unwrap()
}

macro_rules! bench_conv {
    ($group:expr, $name:expr, $dims:expr) => {
        let mut rng = Hc128Rng::seed_from_u64(0);
        let dims: ConvDims = $dims;
        let layer = ConvParams::rand(&dims, &mut rng).build(dims).unwrap();
        $group.bench_with_input(BenchmarkId::new($name, dims.in_channels), &dims, |b, dims| {
            b.iter_batched(
                || rand_fmap(&mut rng, dims.input_shape()),
                |input| layer.forward(&input).unwrap(),
                BatchSize::SmallInput,
            )
        });
    };
}

fn conv(c: &mut Criterion) {
    let config = NetConfig::default();
    let mut group = c.benchmark_group("conv");
    bench_conv!(group, "conv1", config.conv1());
    bench_conv!(group, "conv2", config.conv2());
    group.finish();
}

fn dense(c: &mut Criterion) {
    let config = NetConfig::default();
    let mut rng = Hc128Rng::seed_from_u64(0);
    let mut group = c.benchmark_group("dense");
    for &(inputs, outputs, activation) in &[
        (config.flat_len(), config.hidden, Activation::Relu),
        (config.hidden, config.classes, Activation::ArgMax),
    ] {
        let layer = DenseParams::rand(inputs, outputs, &mut rng)
            .build(inputs, outputs)
            .unwrap();
        group.bench_with_input(BenchmarkId::new("dense", inputs), &inputs, |b, &inputs| {
            b.iter_batched(
                || FeatureMap::flat((0..inputs).map(|_| rng.gen()).collect()),
                |input| layer.forward(&input, activation).unwrap(),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn layout_stages(c: &mut Criterion) {
    let mut rng = Hc128Rng::seed_from_u64(0);
    let input = rand_fmap(&mut rng, FmapShape::new(16, 16));
    c.bench_function("pad", |b| b.iter(|| pad(black_box(&input), 2).unwrap()));
    c.bench_function("or_pool", |b| b.iter(|| or_pool(black_box(&input)).unwrap()));
    c.bench_function("flatten", |b| b.iter(|| flatten(black_box(&input)).unwrap()));
}

fn network(c: &mut Criterion) {
    let mut rng = Hc128Rng::seed_from_u64(0);
    let net = Network::new(ModelParams::rand(NetConfig::default(), &mut rng).unwrap()).unwrap();
    let inputs: Vec<FeatureMap> = (0..256)
        .map(|_| rand_fmap(&mut rng, net.input_shape()))
        .collect();
    c.bench_function("classify", |b| {
        b.iter(|| net.classify(black_box(&inputs[0])).unwrap())
    });
    c.bench_function("classify_batch_256", |b| {
        b.iter(|| net.classify_batch(black_box(&inputs)).unwrap())
    });
}

criterion_group!(benches, conv, dense, layout_stages, network);
criterion_main!(benches);
