//! Shape a Khmer word and emit a colored, per-glyph SVG document.
//!
//! Usage:
//!   aksar-demo "កម្ពុជា" --font fonts/KhmerOSsiemreap.ttf --out word.svg
//!
//! Settings not given on the command line fall back to `aksar.toml`
//! (font, size, padding, override rules).

use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use aksar_config::AksarConfig;
use aksar_text::{FontKey, GlyphEngine, ShapeRequest};

mod svg;

struct Args {
    text: String,
    font: Option<PathBuf>,
    size: Option<f32>,
    out: Option<PathBuf>,
    config: Option<PathBuf>,
    split: bool,
}

fn parse_args() -> Result<Args> {
    let mut text = None;
    let mut font = None;
    let mut size = None;
    let mut out = None;
    let mut config = None;
    let mut split = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--font" => font = Some(PathBuf::from(args.next().context("--font needs a path")?)),
            "--size" => {
                size = Some(
                    args.next()
                        .context("--size needs a value")?
                        .parse::<f32>()
                        .context("--size must be a number")?,
                )
            }
            "--out" => out = Some(PathBuf::from(args.next().context("--out needs a path")?)),
            "--config" => {
                config = Some(PathBuf::from(args.next().context("--config needs a path")?))
            }
            // Diagnostic rendering with the Khmer shaping features off.
            "--split" => split = true,
            other if other.starts_with("--") => bail!("unknown option: {other}"),
            other => {
                if text.replace(other.to_string()).is_some() {
                    bail!("only one text argument is supported");
                }
            }
        }
    }

    Ok(Args {
        text: text.context("usage: aksar-demo <khmer text> [--font F] [--size N] [--out P]")?,
        font,
        size,
        out,
        config,
        split,
    })
}

fn main() -> Result<()> {
    let _ = env_logger::try_init();
    let args = parse_args()?;

    let config = match &args.config {
        Some(path) => AksarConfig::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AksarConfig::load_or_default(),
    };
    let overrides = config.override_table().context("compiling override rules")?;

    let font_path = args
        .font
        .or(config.text.font)
        .context("no font given: pass --font or set [text].font in aksar.toml")?;
    let size = args.size.or(config.text.size).unwrap_or(120.0);
    let padding = config.text.padding.unwrap_or(40.0);

    let engine = GlyphEngine::new(overrides);
    let mut request = ShapeRequest::new(
        &args.text,
        FontKey::new(&font_path, config.text.font_index as usize),
        size,
    );
    request.options.disable_khmer_features = args.split;

    let layout = engine.render(&request)?;
    log::info!(
        "{} glyphs, width {:.1}px at {}px",
        layout.glyphs.len(),
        layout.width,
        size
    );
    for glyph in &layout.glyphs {
        log::debug!(
            "#{} {:?} '{}'{}",
            glyph.id,
            glyph.role,
            glyph.ch,
            if glyph.is_subscript { " (subscript)" } else { "" },
        );
    }

    let doc = svg::document(&layout, padding);
    match &args.out {
        Some(path) => {
            std::fs::write(path, &doc).with_context(|| format!("writing {}", path.display()))?;
            log::info!("wrote {}", path.display());
        }
        None => println!("{doc}"),
    }
    Ok(())
}
