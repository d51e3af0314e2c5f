use log::*;
use panostitch::{standardize, Detector, Stitcher, TARGET_HEIGHT, TARGET_WIDTH};
use std::path::PathBuf;
use std::process::exit;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "panostitch",
    about = "Stitch overlapping photographs into a single panorama"
)]
struct Opt {
    /// The akaze threshold to use.
    ///
    /// 0.01 will be very sparse and 0.0001 will be very dense.
    #[structopt(short, long, default_value = "0.001")]
    threshold: f64,
    /// Reprojection error in pixels below which a match counts as a
    /// homography inlier.
    #[structopt(long, default_value = "4.0")]
    reproj_threshold: f64,
    /// Letterbox the finished panorama into a 1280x720 frame.
    #[structopt(long)]
    standardize: bool,
    /// The output path to write to (autodetects image type from extension).
    #[structopt(short, long, parse(from_os_str), default_value = "stitched_image.jpg")]
    output: PathBuf,
    /// The image files to stitch, in order. The first becomes the base of
    /// the panorama and each following image is stitched onto it.
    #[structopt(parse(from_os_str), required = true)]
    inputs: Vec<PathBuf>,
}

fn main() {
    pretty_env_logger::init_timed();
    let opt = Opt::from_args();

    // Decode everything up front; an unreadable input stops the run before
    // feature detection starts.
    let mut images = Vec::with_capacity(opt.inputs.len());
    for path in &opt.inputs {
        match image::open(path) {
            Ok(image) => {
                info!("loaded {}", path.display());
                images.push(image.to_rgb8());
            }
            Err(err) => {
                eprintln!("error loading {}: {}", path.display(), err);
                exit(1);
            }
        }
    }

    let stitcher = Stitcher {
        detector: Detector::akaze(opt.threshold),
        reproj_threshold: opt.reproj_threshold,
        ..Stitcher::default()
    };
    let panorama = match stitcher.stitch_all(&images) {
        Ok(panorama) => panorama,
        Err(err) => {
            eprintln!("error stitching images: {}", err);
            eprintln!("ensure consecutive images overlap sufficiently");
            exit(1);
        }
    };

    let panorama = if opt.standardize {
        standardize(&panorama, TARGET_WIDTH, TARGET_HEIGHT)
    } else {
        panorama
    };

    if let Err(err) = panorama.save(&opt.output) {
        eprintln!("error writing {}: {}", opt.output.display(), err);
        exit(1);
    }
    println!("wrote {}", opt.output.display());
}
