//! Command line front end: annotate a screenshot and export the result.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use inkframe_core::{create_bounds, Bounds, ExportFormat, Point, Rgba, StageConfig};
use inkframe_scene::image_cache::ImageCache;
use inkframe_scene::{ExportOptions, LayerBuilder, Stage, TextStyle};
use inkframe_settings::Settings;

/// Text placed at a position, given as `x,y,text`.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub position: Point,
    pub text: String,
}

/// Segment given as `x1,y1,x2,y2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

#[derive(Debug, Parser)]
#[command(name = "inkframe", version, about = "Annotate a screenshot and export it")]
pub struct Args {
    /// Screenshot to annotate
    pub input: PathBuf,

    /// Output file. Defaults to `<input>-annotated.<format>`
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Rectangle outline as `x,y,width,height` (repeatable)
    #[arg(long = "rect", value_parser = parse_box)]
    pub rects: Vec<Bounds>,

    /// Ellipse outline as `x,y,width,height` (repeatable)
    #[arg(long = "ellipse", value_parser = parse_box)]
    pub ellipses: Vec<Bounds>,

    /// Arrow as `x1,y1,x2,y2` (repeatable)
    #[arg(long = "arrow", value_parser = parse_segment)]
    pub arrows: Vec<Segment>,

    /// Text as `x,y,text` (repeatable)
    #[arg(long = "text", value_parser = parse_label)]
    pub labels: Vec<Label>,

    /// Annotation color
    #[arg(long, default_value = "#ff0000")]
    pub color: Rgba,

    #[arg(long, default_value_t = 4.0)]
    pub stroke_width: f32,

    #[arg(long, default_value_t = 20.0)]
    pub font_size: f32,

    /// png or jpeg. Defaults to the settings file
    #[arg(long)]
    pub format: Option<ExportFormat>,

    /// Export only `x,y,width,height`
    #[arg(long, value_parser = parse_box)]
    pub crop: Option<Bounds>,

    /// Also copy the result to the clipboard
    #[arg(long)]
    pub clipboard: bool,

    /// Settings file (.json or .toml) instead of the default location
    #[arg(long)]
    pub settings: Option<PathBuf>,
}

fn parse_numbers<const N: usize>(value: &str) -> Result<[f32; N], String> {
    let numbers = value
        .split(',')
        .map(|part| part.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("{value:?}: {e}"))?;
    numbers
        .try_into()
        .map_err(|v: Vec<f32>| format!("expected {N} numbers, got {}", v.len()))
}

pub fn parse_box(value: &str) -> Result<Bounds, String> {
    let [x, y, w, h] = parse_numbers::<4>(value)?;
    Ok(create_bounds(x, y, w, h))
}

pub fn parse_segment(value: &str) -> Result<Segment, String> {
    let [x1, y1, x2, y2] = parse_numbers::<4>(value)?;
    Ok(Segment {
        start: Point::new(x1, y1),
        end: Point::new(x2, y2),
    })
}

pub fn parse_label(value: &str) -> Result<Label, String> {
    let mut parts = value.splitn(3, ',');
    let (Some(x), Some(y), Some(text)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected x,y,text, got {value:?}"));
    };
    let [x, y] = parse_numbers::<2>(&format!("{x},{y}"))?;
    Ok(Label {
        position: Point::new(x, y),
        text: text.to_string(),
    })
}

/// `<dir>/<stem>-annotated.<ext>` next to the input.
pub fn default_output(input: &Path, format: ExportFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "screenshot".to_string());
    let extension = match format {
        ExportFormat::Png => "png",
        ExportFormat::Jpeg => "jpg",
    };
    input.with_file_name(format!("{stem}-annotated.{extension}"))
}

fn build_stage(args: &Args, settings: &Settings) -> anyhow::Result<Stage> {
    let bytes = std::fs::read(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let (width, height) = image::image_dimensions(&args.input)
        .with_context(|| format!("Unsupported image {}", args.input.display()))?;
    let source = args.input.to_string_lossy().into_owned();
    ImageCache::global()
        .insert_encoded(&source, &bytes)
        .map_err(anyhow::Error::msg)?;

    let config = StageConfig {
        width,
        height,
        interactive: false,
        ..settings.stage.clone()
    };
    let mut stage = crate::configured_stage(config, settings)?;
    stage.add(LayerBuilder::image(
        0.0,
        0.0,
        width as f32,
        height as f32,
        source,
    ))?;

    let (color, stroke) = (args.color, args.stroke_width);
    for b in &args.rects {
        stage.add(LayerBuilder::rect(b.left, b.top, b.width(), b.height()).stroke(color, stroke))?;
    }
    for b in &args.ellipses {
        stage.add(
            LayerBuilder::ellipse(b.left, b.top, b.width(), b.height()).stroke(color, stroke),
        )?;
    }
    for arrow in &args.arrows {
        stage.add(
            LayerBuilder::arrow(arrow.start, arrow.end)
                .stroke(color, stroke)
                .caps(false, true, stroke * 3.0),
        )?;
    }
    for label in &args.labels {
        let style = TextStyle::default().with_font_size(args.font_size);
        stage.add(
            LayerBuilder::text(label.position.x, label.position.y, label.text.clone(), style)
                .fill(color),
        )?;
    }
    tracing::debug!(
        "Built {}x{} stage with {} layers",
        width,
        height,
        stage.scene().len()
    );
    Ok(stage)
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let settings = match &args.settings {
        Some(path) => Settings::load_from_file(path)?,
        None => Settings::load_or_default(),
    };
    let mut stage = build_stage(&args, &settings)?;
    stage.render();

    let options = ExportOptions {
        format: args.format.unwrap_or(settings.export.format),
        crop: args.crop,
        jpeg_quality: settings.export.jpeg_quality,
    };
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.input, options.format));
    let bytes = stage.to_blob(&options)?;
    std::fs::write(&output, &bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    tracing::info!("Wrote {} ({} bytes)", output.display(), bytes.len());

    if args.clipboard || settings.export.copy_to_clipboard {
        stage.copy_to_clipboard(&options)?;
        tracing::info!("Copied annotated image to clipboard");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    #[test]
    fn test_parse_box_normalizes() {
        let b = parse_box("10, 20, -5, 5").unwrap();
        assert_eq!(b, Bounds::new(20.0, 10.0, 25.0, 5.0));
        assert!(parse_box("1,2,3").is_err());
        assert!(parse_box("1,2,x,4").is_err());
    }

    #[test]
    fn test_parse_label_keeps_commas_in_text() {
        let label = parse_label("5,6,hello, world").unwrap();
        assert_eq!(label.position, Point::new(5.0, 6.0));
        assert_eq!(label.text, "hello, world");
        assert!(parse_label("5,6").is_err());
    }

    #[test]
    fn test_parse_segment() {
        let segment = parse_segment("0,0,10,5").unwrap();
        assert_eq!(segment.end, Point::new(10.0, 5.0));
    }

    #[test]
    fn test_default_output() {
        let out = default_output(Path::new("/tmp/shot.png"), ExportFormat::Jpeg);
        assert_eq!(out, PathBuf::from("/tmp/shot-annotated.jpg"));
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "inkframe",
            "shot.png",
            "--rect",
            "1,2,3,4",
            "--rect",
            "5,6,7,8",
            "--color",
            "#00ff00",
            "--format",
            "jpeg",
        ])
        .unwrap();
        assert_eq!(args.rects.len(), 2);
        assert_eq!(args.color, Rgba::rgb(0, 255, 0));
        assert_eq!(args.format, Some(ExportFormat::Jpeg));
    }

    #[test]
    fn test_run_writes_annotated_copy() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("shot.png");
        image::RgbaImage::from_pixel(64, 32, image::Rgba([255, 255, 255, 255]))
            .save(&input)
            .unwrap();
        let settings = dir.path().join("settings.toml");
        Settings::default().save_to_file(&settings).unwrap();

        let output = dir.path().join("out.png");
        let args = Args::try_parse_from([
            OsStr::new("inkframe"),
            input.as_os_str(),
            OsStr::new("--rect"),
            OsStr::new("4,4,20,20"),
            OsStr::new("--crop"),
            OsStr::new("0,0,32,16"),
            OsStr::new("--settings"),
            settings.as_os_str(),
            OsStr::new("-o"),
            output.as_os_str(),
        ])
        .unwrap();
        run(args).unwrap();

        let written = image::open(&output).unwrap().to_rgba8();
        assert_eq!(written.dimensions(), (32, 16));
        assert_eq!(written.get_pixel(4, 10).0, [255, 0, 0, 255]);
    }
}
