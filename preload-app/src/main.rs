use std::env;

use anyhow::{bail, Context};
use map_preloader::prelude::*;

const USAGE: &str = "usage: preload-app <lon> <lat> <zoom> [steps] [config.json]";

struct Args {
    center: Point,
    zoom: ZoomLevel,
    steps: u32,
    config: PreloadConfig,
}

fn parse_args() -> anyhow::Result<Args> {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 3 {
        bail!(USAGE);
    }

    let lon: f64 = args[0].parse().context("invalid longitude")?;
    let lat: f64 = args[1].parse().context("invalid latitude")?;
    let zoom: f64 = args[2].parse().context("invalid zoom")?;
    let steps: u32 = match args.get(3) {
        Some(raw) => raw.parse().context("invalid step count")?,
        None => 3,
    };
    let config = match args.get(4) {
        Some(path) => PreloadConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path))?,
        None => PreloadConfig::default(),
    };

    // Web Mercator metres from degrees
    let x = lon.to_radians() * 6_378_137.0;
    let y = (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln() * 6_378_137.0;

    Ok(Args {
        center: Point::new(x, y),
        zoom,
        steps,
        config,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    map_preloader::init_logging();

    let args = parse_args()?;
    let surface_size = Point::new(
        args.config.surface.width as f64,
        args.config.surface.height as f64,
    );
    let source = StaticSource::from_view(View::new(args.center, args.zoom), surface_size);
    let surface = HeadlessSurface::from_config(&args.config.surface);
    let log = surface.render_log();

    let mut preloader = MapPreloader::with_config(args.config)?;
    preloader.init()?;
    preloader.set_rendering_map(surface);
    preloader.add_event_listener(|event| log::info!("preload progress: {}%", event.value));

    let spawned = preloader.load(&source, args.steps)?.spawn()?;
    let cancel = spawned.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("interrupt received, cancelling preload");
            cancel.cancel();
        }
    });

    let outcome = spawned.wait().await?;
    let verdict = if outcome.is_completed() {
        "completed"
    } else {
        "cancelled"
    };
    println!("preload {} after {} renders", verdict, log.len());
    println!("{}", serde_json::to_string_pretty(outcome.stats())?);

    Ok(())
}
