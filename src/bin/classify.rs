use image::imageops::{resize, FilterType};
use rand::SeedableRng;
use rand_hc::Hc128Rng;
use std::env;
use std::path::Path;
use std::process;
use tracing::error;
use tracing_subscriber::EnvFilter;
use xnornet::{FeatureMap, ModelParams, NetConfig, Network, Result};

const PIXEL_CUTOFF: u8 = 128;

fn usage() -> ! {
    eprintln!("usage: classify <model.bin> <image>...");
    eprintln!("       classify --random <model.bin> [seed]");
    process::exit(2);
}

fn load_image(path: &Path, width: u32) -> Result<FeatureMap> {
    let luma = image::open(path)?.to_luma8();
    let small = resize(&luma, width, width, FilterType::Triangle);
    FeatureMap::from_pixels(&small.into_raw(), width as usize, PIXEL_CUTOFF)
}

fn run(args: &[String]) -> Result<()> {
    match args {
        [flag, model_path, rest @ ..] if flag == "--random" => {
            let seed = rest.first().and_then(|s| s.parse().ok()).unwrap_or(0u64);
            let mut rng = Hc128Rng::seed_from_u64(seed);
            ModelParams::rand(NetConfig::default(), &mut rng)?.save(Path::new(model_path))
        }
        [model_path, image_paths @ ..] if !image_paths.is_empty() => {
            let net = Network::new(ModelParams::load(Path::new(model_path))?)?;
            let width = net.config().input_width as u32;
            let inputs = image_paths
                .iter()
                .map(|p| load_image(Path::new(p), width))
                .collect::<Result<Vec<FeatureMap>>>()?;
            let classes = net.classify_batch(&inputs)?;
            for (path, class) in image_paths.iter().zip(classes.iter()) {
                println!("{}: {}", path, class);
            }
            Ok(())
        }
        _ => usage(),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let args: Vec<String> = env::args().skip(1).collect();
    if let Err(err) = run(&args) {
        error!("{}", err);
        process::exit(1);
    }
}
