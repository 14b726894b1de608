// Classifies images with a pretrained ImageNet model.
//
// The model is looked up in ./graphs/<model>/model.pt, then ./saves/<model>/model.pt,
// then downloaded from the registry locator. Directories, label URL, device and
// registry can be overridden with the IMAGENET_HUB_* environment variables.
//
//   cargo run --example classify -- --model mobilenet_v2_100_224 cat.jpg dog.png
use anyhow::Result;
use clap::Parser;
use imagenet_hub::{ClassifierService, Config};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Model name, see --list for the built-in registry.
    #[arg(long, short, default_value = "efficientnetv2-b0")]
    model: String,

    /// Print the predictions as JSON.
    #[arg(long)]
    json: bool,

    /// List the registry entries and exit.
    #[arg(long)]
    list: bool,

    images: Vec<std::path::PathBuf>,
}

pub fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();
    let config = Config::from_env()?;

    if args.list {
        let registry = config.registry()?;
        for name in registry.names() {
            match registry.fixed_size(name) {
                Some(size) => println!("{name:30} {size}x{size}"),
                None => println!("{name:30} dynamic"),
            }
        }
        return Ok(());
    }

    let mut service = ClassifierService::new(config);
    service.configure(&args.model)?;
    for image in args.images.iter() {
        let predictions = service.classify(image)?;
        if args.json {
            let entry = serde_json::json!({ "image": image, "predictions": predictions });
            println!("{entry}");
        } else {
            println!("{}", image.display());
            for prediction in predictions.iter() {
                println!("  {:50} {:5.2}%", prediction.class, 100.0 * prediction.probability);
            }
        }
    }
    Ok(())
}
