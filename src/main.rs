use std::path::PathBuf;

use celebrity_overlay::{
    Annotator, BatchConfig, OverlayStyle, RekognitionClient, batch::DEFAULT_SUFFIX,
    face::CONFIDENCE_THRESHOLD, run_batch,
};
use clap::Parser;
use log::{info, warn};

const DEFAULT_IMAGES: [&str; 3] = ["bbc.jpg", "msn.jpg", "neymar-torcedores.jpg"];

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Images to annotate (defaults to the sample set inside --dir)
    images: Vec<PathBuf>,

    /// Directory holding the sample images
    #[arg(long, default_value = "images")]
    dir: PathBuf,

    /// TrueType font used for the name labels; if it cannot be loaded,
    /// boxes are still drawn and the labels are left out
    #[arg(long, default_value = "Ubuntu-R.ttf")]
    font: PathBuf,

    /// Label size in pixels
    #[arg(long, default_value_t = 20.0)]
    font_size: f32,

    /// Only matches scoring strictly above this are drawn
    #[arg(long, default_value_t = CONFIDENCE_THRESHOLD)]
    threshold: f32,

    /// Appended to each input stem to name the output file
    #[arg(long, default_value = DEFAULT_SUFFIX)]
    suffix: String,

    /// AWS region, overriding the environment and profile
    #[arg(long)]
    region: Option<String>,
}

impl Args {
    fn image_paths(&self) -> Vec<PathBuf> {
        if self.images.is_empty() {
            DEFAULT_IMAGES.iter().map(|name| self.dir.join(name)).collect()
        } else {
            self.images.clone()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    anyhow::ensure!(
        (0.0..=100.0).contains(&args.threshold),
        "threshold must be between 0 and 100, got {}",
        args.threshold
    );

    let font = match Annotator::load_font(&args.font) {
        Ok(font) => Some(font),
        Err(e) => {
            warn!("{}; drawing boxes without labels", e);
            None
        }
    };
    let style = OverlayStyle {
        threshold: args.threshold,
        font_scale: args.font_size,
        ..OverlayStyle::default()
    };
    let annotator = Annotator::new(style, font);
    info!("Drawing matches above {:.1}% confidence", annotator.style().threshold);

    let config = BatchConfig {
        images: args.image_paths(),
        suffix: args.suffix.clone(),
    };
    let client = RekognitionClient::from_env(args.region.clone()).await;

    run_batch(&client, &annotator, &config).await;

    Ok(())
}
