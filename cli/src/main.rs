//! pptxhtml CLI - PowerPoint to HTML conversion tool
//!
//! Converts PPTX slides to positioned HTML and normalizes chart XML styling
//! in unpacked presentations.

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use pptxhtml::render::{ImageMode, RenderOptions};
use pptxhtml::PptxConverter;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// PowerPoint slides to HTML/CSS/SVG
#[derive(Parser)]
#[command(
    name = "pptxhtml",
    author = "iyulab",
    version,
    about = "Convert PowerPoint slides to HTML",
    long_about = "pptxhtml - PowerPoint to HTML conversion tool.\n\n\
                  Renders PPTX slides as absolutely positioned HTML/CSS/SVG and\n\
                  fixes chart XML styling in unpacked presentations."
)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a presentation to HTML
    Convert {
        /// Input file path
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// How pictures are referenced
        #[arg(long, default_value = "embed")]
        images: ImageArg,

        /// Prefix for linked image paths
        #[arg(long, default_value = "")]
        image_prefix: String,

        /// Write slide fragments instead of a full HTML document
        #[arg(long)]
        fragments: bool,

        /// Leave chart legends out
        #[arg(long)]
        no_legend: bool,

        /// Desired number of value-axis ticks
        #[arg(long, default_value = "10")]
        ticks: usize,

        /// Convert only this slide (1-based)
        #[arg(long)]
        slide: Option<usize>,
    },

    /// Extract plain text from every slide
    Text {
        /// Input file path
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Normalize chart styling in an unpacked presentation
    #[command(name = "fix-charts")]
    FixCharts {
        /// Directory containing `charts/chartN.xml` (usually `ppt`)
        dir: PathBuf,

        /// Output compact JSON (no indentation)
        #[arg(long)]
        compact: bool,
    },

    /// Show presentation information
    Info {
        /// Input file path
        input: PathBuf,
    },

    /// Extract media parts (images) from a presentation
    Extract {
        /// Input file path
        input: PathBuf,

        /// Output directory for media
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Show version information
    Version,
}

/// Picture reference mode
#[derive(Clone, ValueEnum)]
enum ImageArg {
    /// Inline images as data URIs
    Embed,
    /// Reference images by file name
    Link,
}

impl From<ImageArg> for ImageMode {
    fn from(arg: ImageArg) -> Self {
        match arg {
            ImageArg::Embed => ImageMode::Embed,
            ImageArg::Link => ImageMode::Link,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Convert {
            input,
            output,
            images,
            image_prefix,
            fragments,
            no_legend,
            ticks,
            slide,
        } => {
            let pb = create_spinner("Reading presentation...");

            pptxhtml::detect_format_from_path(&input)?;
            let options = RenderOptions::new()
                .with_image_mode(images.into())
                .with_image_prefix(image_prefix)
                .with_legend(!no_legend)
                .with_tick_count(ticks)
                .with_standalone(!fragments);
            let converter = PptxConverter::open(&input)?.with_options(options);

            pb.set_message("Rendering slides...");
            let html = match slide {
                Some(index) => converter.convert_slide(index)?.html,
                None => converter.convert()?.to_html(),
            };

            pb.finish_and_clear();
            write_output(output.as_deref(), &html)?;

            if let Some(path) = output {
                println!("{} Converted to HTML: {}", "✓".green().bold(), path.display());
            }
        }

        Commands::Text { input, output } => {
            let pb = create_spinner("Extracting text...");
            let text = pptxhtml::extract_text(&input)?;
            pb.finish_and_clear();
            write_output(output.as_deref(), &text)?;
        }

        Commands::FixCharts { dir, compact } => {
            let report = pptxhtml::fix_charts_in_dir(&dir);
            let json = if compact {
                serde_json::to_string(&report)?
            } else {
                serde_json::to_string_pretty(&report)?
            };
            println!("{}", json);
            if !report.success {
                std::process::exit(1);
            }
        }

        Commands::Info { input } => {
            let pb = create_spinner("Analyzing presentation...");

            let format = pptxhtml::detect_format_from_path(&input)?;
            let converter = PptxConverter::open(&input)?;
            let properties = converter.properties();
            let (width, height) = converter.slide_size();
            let media = converter.media_parts().len();

            pb.finish_and_clear();

            println!("{}", "Presentation Information".cyan().bold());
            println!("{}", "─".repeat(40));
            println!(
                "{}: {}",
                "File".bold(),
                input.file_name().unwrap_or_default().to_string_lossy()
            );
            println!("{}: {}", "Format".bold(), format);
            println!("{}: {}", "Slides".bold(), converter.slide_count());
            println!("{}: {} × {} px", "Slide size".bold(), width, height);
            println!("{}: {}", "Media".bold(), media);

            if let Some(ref title) = properties.title {
                println!("{}: {}", "Title".bold(), title);
            }
            if let Some(ref creator) = properties.creator {
                println!("{}: {}", "Author".bold(), creator);
            }
            if let Some(ref modified) = properties.modified {
                println!("{}: {}", "Modified".bold(), modified);
            }
        }

        Commands::Extract { input, output } => {
            let pb = create_spinner("Extracting media...");

            let converter = PptxConverter::open(&input)?;
            fs::create_dir_all(&output)?;

            let mut count = 0;
            for part in converter.media_parts() {
                let Some(name) = Path::new(&part).file_name() else {
                    continue;
                };
                fs::write(output.join(name), converter.read_part_bytes(&part)?)?;
                count += 1;
            }

            pb.finish_and_clear();

            if count > 0 {
                println!(
                    "{} Extracted {} media files to {}",
                    "✓".green().bold(),
                    count,
                    output.display()
                );
            } else {
                println!("{} No media found in presentation", "!".yellow().bold());
            }
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn print_version() {
    println!("{} {}", "pptxhtml".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("PowerPoint slides to positioned HTML/CSS/SVG");
    println!();
    println!("Supported formats: PPTX, PPTM, POTX, PPSX");
    println!("Repository: https://github.com/iyulab/pptxhtml");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn write_output(path: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_fix_charts_args() {
        let cli = Cli::try_parse_from(["pptxhtml", "fix-charts", "ppt", "--compact"]).unwrap();
        assert!(matches!(cli.command, Commands::FixCharts { compact: true, .. }));
    }
}
