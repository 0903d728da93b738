use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use monsterbook_core::BookMetadata;
use monsterbook_cv::buffer::resize;
use monsterbook_cv::transcription::{crop_cells, crop_content, empty_distance};
use monsterbook_cv::utils::{stitch_images, ImageUtils};
use monsterbook_cv::{TemplateLoader, TranscriptionConfig, TranscriptionPipeline};
use std::fs;
use std::path::{Path, PathBuf};

mod assets;
mod builder;
mod report;

use assets::AssetDir;
use report::{build_page_report, BookReport};

#[derive(Parser)]
#[command(
    name = "monsterbook",
    version,
    about = "Transcribe monster book screenshots into card counts"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Transcribe captures and write a JSON report
    Transcribe {
        #[arg(required = true)]
        captures: Vec<PathBuf>,
        #[arg(long, default_value = "assets")]
        assets: PathBuf,
        /// JSON configuration; absent fields use defaults
        #[arg(long)]
        config: Option<PathBuf>,
        /// Report path, stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also save every occupied cell as `<uid>.png`
        #[arg(long)]
        cards_dir: Option<PathBuf>,
    },

    /// Write the content crop of a capture
    Crop {
        capture: PathBuf,
        output: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Write every cell of a capture as `NN.png`
    CropCards {
        capture: PathBuf,
        output_dir: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Crop screenshots, one per page in book order, named by page label
    ReferenceBook {
        source_dir: PathBuf,
        output_dir: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        /// Keep existing reference images
        #[arg(long)]
        no_overwrite: bool,
    },

    /// Tile page images onto one sheet
    StitchPages {
        source_dir: PathBuf,
        output: PathBuf,
        #[arg(long, default_value_t = 6)]
        columns: u32,
    },

    /// Tile card images onto one sheet
    StitchCards {
        source_dir: PathBuf,
        output: PathBuf,
        #[arg(long, default_value_t = 5)]
        columns: u32,
        #[arg(long, default_value = "assets")]
        assets: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print each card's error against the empty cell
        #[arg(long)]
        generate_stats: bool,
    },

    /// Save one cell of the first reference page as `empty/empty.png`
    EmptyCard {
        #[arg(long, default_value = "assets")]
        assets: PathBuf,
        #[arg(long, default_value_t = 4)]
        row: u32,
        #[arg(long, default_value_t = 4)]
        col: u32,
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Build `seed_tags/` by merging the tags of occupied cells around seed locations
    SeedTags {
        source_dir: PathBuf,
        /// Comma-separated `page-slot` seed locations
        #[arg(long, default_value = builder::DEFAULT_LOCATIONS)]
        locations: String,
        #[arg(long, default_value = "assets")]
        assets: PathBuf,
        /// Error against the empty cell above which a cell holds a card
        #[arg(long, default_value_t = 4000)]
        threshold: u64,
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the page metadata table as JSON
    BookMetadata,
}

fn load_config(path: Option<&Path>) -> Result<TranscriptionConfig> {
    match path {
        Some(path) => TranscriptionConfig::from_file(path),
        None => Ok(TranscriptionConfig::default()),
    }
}

fn write_json<T: serde::Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize report")?;
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write JSON to: {:?}", path))?;
            log::info!("Report written to {:?}", path);
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn transcribe(
    captures: &[PathBuf],
    assets: &Path,
    config: Option<&Path>,
    output: Option<&Path>,
    cards_dir: Option<&Path>,
) -> Result<()> {
    let config = load_config(config)?;
    let assets = AssetDir::new(assets);
    let references = assets.load_references(&config)?;
    let entries = assets.load_entries()?;
    let pipeline = TranscriptionPipeline::new(config, references)?;

    if let Some(dir) = cards_dir {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create directory: {:?}", dir))?;
    }

    let mut report = BookReport::default();
    for capture in captures {
        let result = pipeline
            .transcribe(&ImageUtils::load_rgba(capture)?)
            .with_context(|| format!("Failed to transcribe: {:?}", capture))?;
        if let Some(dir) = cards_dir {
            for cell in &result.cells {
                ImageUtils::save_image(&cell.image, dir.join(format!("{}.png", cell.global_offset)))?;
            }
        }
        report
            .data
            .push(build_page_report(&capture.to_string_lossy(), &result, &entries));
    }

    log::info!(
        "Transcribed {} captures, {} cards",
        report.data.len(),
        report.card_count()
    );
    write_json(&report, output)
}

fn crop(capture: &Path, output: &Path, config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let (preset, content) = crop_content(&ImageUtils::load_rgba(capture)?, &config)
        .with_context(|| format!("Failed to crop: {:?}", capture))?;
    log::info!("Cropped {:?} with preset `{}`", capture, preset);
    ImageUtils::save_image(&content, output)
}

fn crop_cards(capture: &Path, output_dir: &Path, config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let (_, content) = crop_content(&ImageUtils::load_rgba(capture)?, &config)
        .with_context(|| format!("Failed to crop: {:?}", capture))?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory: {:?}", output_dir))?;
    for (index, (_, cell)) in crop_cells(&content, &config)?.iter().enumerate() {
        ImageUtils::save_image(cell, output_dir.join(format!("{:02}.png", index)))?;
    }
    Ok(())
}

fn reference_book(source_dir: &Path, output_dir: &Path, config: Option<&Path>, no_overwrite: bool) -> Result<()> {
    let config = load_config(config)?;
    let book = BookMetadata::standard();
    let screenshots = TemplateLoader::new()
        .add_template_dir(source_dir)
        .load_all_templates()?;

    if screenshots.len() > book.len() {
        bail!(
            "{} screenshots in {:?} but the book has {} pages",
            screenshots.len(),
            source_dir,
            book.len()
        );
    }

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory: {:?}", output_dir))?;
    for (screenshot, page) in screenshots.iter().zip(&book.pages) {
        let path = output_dir.join(format!("{}.png", page.label()));
        if no_overwrite && path.exists() {
            log::info!("Keeping existing {:?}", path);
            continue;
        }
        let (_, content) = crop_content(&screenshot.image, &config)
            .with_context(|| format!("Failed to crop screenshot `{}`", screenshot.name))?;
        ImageUtils::save_image(&content, &path)?;
        log::debug!("{} -> {:?}", screenshot.name, path);
    }
    Ok(())
}

fn stitch(source_dir: &Path, output: &Path, columns: u32) -> Result<Vec<monsterbook_cv::Template>> {
    let images = TemplateLoader::new()
        .add_template_dir(source_dir)
        .load_all_templates()?;
    let buffers: Vec<_> = images.iter().map(|template| template.image.clone()).collect();
    let Some(sheet) = stitch_images(&buffers, columns) else {
        bail!("No images to stitch in {:?}", source_dir);
    };
    ImageUtils::save_image(&sheet, output)?;
    log::info!("Stitched {} images into {:?}", images.len(), output);
    Ok(images)
}

fn stitch_cards(
    source_dir: &Path,
    output: &Path,
    columns: u32,
    assets: &Path,
    config: Option<&Path>,
    generate_stats: bool,
) -> Result<()> {
    let cards = stitch(source_dir, output, columns)?;
    if !generate_stats {
        return Ok(());
    }

    let config = load_config(config)?;
    let empty_cell = AssetDir::new(assets).load_empty_cell(&config)?;
    let (width, height) = empty_cell.dimensions();
    for card in &cards {
        let error = empty_distance(&resize(&card.image, width, height), &empty_cell)?;
        let verdict = if error > config.empty_threshold { "occupied" } else { "empty" };
        println!("{}\t{}\t{}", card.name, error, verdict);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match &cli.command {
        Commands::Transcribe {
            captures,
            assets,
            config,
            output,
            cards_dir,
        } => transcribe(
            captures,
            assets,
            config.as_deref(),
            output.as_deref(),
            cards_dir.as_deref(),
        ),
        Commands::Crop {
            capture,
            output,
            config,
        } => crop(capture, output, config.as_deref()),
        Commands::CropCards {
            capture,
            output_dir,
            config,
        } => crop_cards(capture, output_dir, config.as_deref()),
        Commands::ReferenceBook {
            source_dir,
            output_dir,
            config,
            no_overwrite,
        } => reference_book(source_dir, output_dir, config.as_deref(), *no_overwrite),
        Commands::StitchPages {
            source_dir,
            output,
            columns,
        } => stitch(source_dir, output, *columns).map(|_| ()),
        Commands::StitchCards {
            source_dir,
            output,
            columns,
            assets,
            config,
            generate_stats,
        } => stitch_cards(
            source_dir,
            output,
            *columns,
            assets,
            config.as_deref(),
            *generate_stats,
        ),
        Commands::EmptyCard {
            assets,
            row,
            col,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let path = builder::write_empty_card(&AssetDir::new(assets), *row, *col, &config)?;
            log::info!("Wrote {:?}", path);
            Ok(())
        }
        Commands::SeedTags {
            source_dir,
            locations,
            assets,
            threshold,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let locations = builder::parse_locations(locations)?;
            builder::write_seed_tags(source_dir, &AssetDir::new(assets), &locations, *threshold, &config)
                .map(|_| ())
        }
        Commands::BookMetadata => write_json(&BookMetadata::standard(), None),
    }
}
