//! `tripick [MODEL] [--options PRESET.toml]`
//!
//! Opens a window on the model (or a box when no model is given) above a
//! ground grid. Right-click picks a triangle; left-drag looks around;
//! `W`/`A`/`S`/`D` move; `Escape` clears the pick; `R` resets the camera.

use std::path::PathBuf;

use tripick::{Options, Viewer};

struct Args {
    model: Option<PathBuf>,
    options: Option<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args {
        model: None,
        options: None,
    };
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--options" | "-o" => {
                let path = args
                    .next()
                    .ok_or_else(|| format!("{arg} expects a TOML file"))?;
                parsed.options = Some(path.into());
            }
            flag if flag.starts_with('-') => {
                return Err(format!("unknown flag: {flag}"));
            }
            _ if parsed.model.is_some() => {
                return Err(format!("unexpected argument: {arg}"));
            }
            _ => parsed.model = Some(arg.into()),
        }
    }
    Ok(parsed)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            log::error!("{e}");
            log::error!("Usage: tripick [MODEL] [--options PRESET.toml]");
            std::process::exit(1);
        }
    };

    let options = match &args.options {
        Some(path) => match Options::load(path) {
            Ok(options) => options,
            Err(e) => {
                log::error!("failed to load {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => Options::default(),
    };

    let mut builder = Viewer::builder().with_options(options);
    if let Some(model) = args.model {
        builder = builder.with_path(model);
    }

    if let Err(e) = builder.build().run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
