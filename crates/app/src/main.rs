//! Entry point for the aircraft demo: logging + CLI flags.

use std::path::PathBuf;

use anyhow::Result;
use platform::RunConfig;

fn parse_show_fps<I: IntoIterator<Item = String>>(args: I) -> bool {
    // --show-fps[=on|off], default off
    for arg in args {
        if arg == "--show-fps" {
            return true;
        }
        if let Some(val) = arg.strip_prefix("--show-fps=") {
            return matches!(
                val.to_ascii_lowercase().as_str(),
                "1" | "true" | "on" | "yes"
            );
        }
    }
    false
}

fn parse_size<I: IntoIterator<Item = String>>(args: I) -> (u32, u32) {
    let mut w: Option<u32> = None;
    let mut h: Option<u32> = None;

    for arg in args {
        if let Some(v) = arg.strip_prefix("--size=") {
            if let Some((sw, sh)) = v.split_once('x').or_else(|| v.split_once('X')) {
                if let (Ok(pw), Ok(ph)) = (sw.parse::<u32>(), sh.parse::<u32>()) {
                    w = Some(pw);
                    h = Some(ph);
                }
            }
        } else if let Some(v) = arg.strip_prefix("--width=") {
            if let Ok(pw) = v.parse::<u32>() {
                w = Some(pw);
            }
        } else if let Some(v) = arg.strip_prefix("--height=") {
            if let Ok(ph) = v.parse::<u32>() {
                h = Some(ph);
            }
        }
    }

    let defaults = RunConfig::default();
    (
        w.unwrap_or(defaults.width).max(1),
        h.unwrap_or(defaults.height).max(1),
    )
}

fn parse_asset_root<I: IntoIterator<Item = String>>(args: I) -> PathBuf {
    args.into_iter()
        .filter_map(|arg| arg.strip_prefix("--assets=").map(PathBuf::from))
        .last()
        .unwrap_or_else(|| RunConfig::default().asset_root)
}

fn parse_config(args: &[String]) -> RunConfig {
    let (width, height) = parse_size(args.iter().cloned());
    RunConfig {
        width,
        height,
        asset_root: parse_asset_root(args.iter().cloned()),
        show_fps: parse_show_fps(args.iter().cloned()),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    for arg in &args {
        if !arg.starts_with("--size=")
            && !arg.starts_with("--width=")
            && !arg.starts_with("--height=")
            && !arg.starts_with("--assets=")
            && !arg.starts_with("--show-fps")
        {
            log::warn!("Ignoring unknown argument '{arg}'");
        }
    }

    let config = parse_config(&args);
    log::info!(
        "Starting aircraft demo. window_size={}x{}, assets={}, show_fps={}",
        config.width,
        config.height,
        config.asset_root.display(),
        config.show_fps
    );

    platform::run(config)?;

    log::info!("Graceful shutdown. Bye!");
    Ok(())
}
