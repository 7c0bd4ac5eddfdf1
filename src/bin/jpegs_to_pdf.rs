//! Bundle JPEG files into a PDF
//!
//! Each input becomes one page, sized so the image shows at the chosen
//! resolution. The JPEG data is embedded unchanged.
//!
//! Usage:
//!   cargo run --release --bin jpegs_to_pdf -- -o scans.pdf page1.jpg page2.jpg
//!   cargo run --release --bin jpegs_to_pdf -- -o scans.pdf --title "Scans" --dpi 300 *.jpg
//!
//! Set `RUST_LOG=debug` to see each page as it is written.

use chrono::{DateTime, Local};
use jpeg_pdf::writer::{DocumentId, JpegImage, PdfWriter, PdfWriterConfig};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process;

struct BundleConfig {
    output: PathBuf,
    title: Option<String>,
    dpi: Option<f64>,
    id_digest: bool,
    inputs: Vec<PathBuf>,
}

impl BundleConfig {
    fn from_args() -> Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();
        let mut output = None;
        let mut title = None;
        let mut dpi = None;
        let mut id_digest = false;
        let mut inputs = Vec::new();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "-o" | "--output" => {
                    i += 1;
                    let value = args.get(i).ok_or("-o requires a path")?;
                    output = Some(PathBuf::from(value));
                },
                "--title" => {
                    i += 1;
                    let value = args.get(i).ok_or("--title requires a value")?;
                    title = Some(value.clone());
                },
                "--dpi" => {
                    i += 1;
                    let value = args.get(i).ok_or("--dpi requires a value")?;
                    let parsed: f64 = value
                        .parse()
                        .map_err(|_| format!("invalid --dpi value: {}", value))?;
                    if !(parsed.is_finite() && parsed > 0.0) {
                        return Err(format!("--dpi must be positive, got {}", value));
                    }
                    dpi = Some(parsed);
                },
                "--id-digest" => {
                    id_digest = true;
                },
                "-h" | "--help" => {
                    return Err(String::new());
                },
                flag if flag.starts_with('-') && flag.len() > 1 => {
                    return Err(format!("unknown option: {}", flag));
                },
                path => inputs.push(PathBuf::from(path)),
            }
            i += 1;
        }

        let output = output.ok_or("missing -o OUT.pdf")?;
        if inputs.is_empty() {
            return Err("no input images".to_string());
        }

        Ok(Self {
            output,
            title,
            dpi,
            id_digest,
            inputs,
        })
    }

    fn writer_config(&self) -> PdfWriterConfig {
        let mut config = PdfWriterConfig::default();
        if let Some(dpi) = self.dpi {
            config = config.with_dpi(dpi);
        }
        if self.id_digest {
            config = config.with_document_id(DocumentId::ContentDigest);
        }
        config
    }

    fn title(&self) -> String {
        self.title.clone().unwrap_or_else(|| {
            self.output
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
    }
}

fn print_usage() {
    eprintln!("Usage: jpegs_to_pdf -o OUT.pdf [--title T] [--dpi N] [--id-digest] IMAGE.jpg...");
}

/// Modification time of the most recently changed input.
fn newest_mtime(inputs: &[PathBuf]) -> DateTime<Local> {
    inputs
        .iter()
        .filter_map(|path| fs::metadata(path).and_then(|m| m.modified()).ok())
        .max()
        .map(DateTime::<Local>::from)
        .unwrap_or_else(Local::now)
}

fn bundle(config: &BundleConfig) -> Result<usize, Box<dyn std::error::Error>> {
    let file = File::create(&config.output)
        .map_err(|e| format!("cannot create {}: {}", config.output.display(), e))?;
    let mut writer = PdfWriter::with_config(BufWriter::new(file), config.writer_config());

    writer.write_info(&config.title(), &newest_mtime(&config.inputs))?;

    for path in &config.inputs {
        let jpeg = read_jpeg(path)?;
        let image =
            JpegImage::probe(&jpeg).map_err(|e| format!("{}: {}", path.display(), e))?;
        writer.write_jpeg_image_page(&image)?;
        log::info!("{}: {}x{} px", path.display(), image.width, image.height);
    }

    let pages = writer.pages().len();
    writer.finish()?;
    Ok(pages)
}

fn read_jpeg(path: &Path) -> Result<Vec<u8>, String> {
    fs::read(path).map_err(|e| format!("cannot read {}: {}", path.display(), e))
}

fn main() {
    env_logger::init();

    let config = match BundleConfig::from_args() {
        Ok(config) => config,
        Err(msg) => {
            if !msg.is_empty() {
                eprintln!("Error: {}", msg);
            }
            print_usage();
            process::exit(1);
        },
    };

    match bundle(&config) {
        Ok(pages) => {
            println!("Wrote {} pages to {}", pages, config.output.display());
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        },
    }
}
