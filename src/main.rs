use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::info;

use nirs_fold::{
    landmark_specificity, match_channels, read_channels_csv,
    read_fold_xls, Coordinate, FoldFiles, Result, Settings,
};

/// Cross-reference fNIRS optode positions with the fOLD sensitivity tables
#[derive(Parser, Debug)]
#[command(name = "nirs-fold", author, version, about, long_about = None)]
struct Args {
    /// JSON settings file; flags below override it
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Atlas sheet (AAL2, AICHA, Brodmann, Juelich, Loni)
    #[arg(long)]
    atlas: Option<String>,

    /// Template montage (standard_1005, standard_1010)
    #[arg(long)]
    montage: Option<String>,

    /// Measured montage file (.elc or .csv)
    #[arg(long)]
    montage_file: Option<PathBuf>,

    /// Directory holding 10-5.xls and 10-10.xls
    #[arg(long, conflicts_with = "fold_file")]
    fold_dir: Option<PathBuf>,

    /// Explicit fOLD workbook; may be repeated
    #[arg(long)]
    fold_file: Vec<PathBuf>,

    /// Use the closest tabulated optode pair when a channel has no exact entry
    #[arg(long)]
    interpolate: bool,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Closest standard label to a position in metres
    #[command(allow_negative_numbers = true)]
    Locate { x: f64, y: f64, z: f64 },
    /// fOLD rows for every channel of a channel CSV
    Channels {
        #[arg(long)]
        channels: PathBuf,
    },
    /// Landmark specificity for every channel of a channel CSV
    Landmark {
        landmark: String,
        #[arg(long)]
        channels: PathBuf,
    },
    /// Print one atlas sheet of a fOLD workbook
    Table { file: PathBuf },
}

fn settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.settings {
        Some(path) => Settings::from_json_file(path)?,
        None => Settings::default(),
    };

    if let Some(atlas) = &args.atlas {
        settings.atlas = atlas.parse()?;
    }
    if let Some(montage) = &args.montage {
        settings.montage = montage.parse()?;
    }
    if let Some(path) = &args.montage_file {
        settings.montage_file = Some(path.clone());
    }
    if let Some(dir) = &args.fold_dir {
        settings.fold_files = Some(FoldFiles::Directory(dir.clone()));
    } else if !args.fold_file.is_empty() {
        settings.fold_files = Some(FoldFiles::Files(args.fold_file.clone()));
    }
    if args.interpolate {
        settings.interpolate = true;
    }

    Ok(settings)
}

fn run(args: Args) -> Result<()> {
    let settings = settings(&args)?;

    match &args.command {
        Command::Locate { x, y, z } => {
            let reference = settings.reference()?;
            let (location, distance) = reference.nearest(Coordinate::new(*x, *y, *z))?;
            let label = &location.label;
            if args.json {
                println!("{}", serde_json::json!({ "label": label, "distance": distance }));
            } else {
                println!("{} ({:.1} mm)", label, distance * 1e3);
            }
        }
        Command::Channels { channels } => {
            let channels = read_channels_csv(channels)?;
            let fold = settings.load_fold()?;
            let reference = settings.reference()?;
            info!("matching {} channels against {} fOLD rows", channels.len(), fold.len());

            let matches = match_channels(&channels, &reference, &fold, settings.interpolate)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&matches)?);
            } else {
                for m in &matches {
                    println!("{} ({}-{}):", m.channel, m.source_label, m.detector_label);
                    print!("{}", m.table);
                    println!();
                }
            }
        }
        Command::Landmark { landmark, channels } => {
            let channels = read_channels_csv(channels)?;
            let fold = settings.load_fold()?;
            let reference = settings.reference()?;

            let matches = match_channels(&channels, &reference, &fold, settings.interpolate)?;
            let scores = landmark_specificity(&matches, landmark)?;
            if args.json {
                let rows: Vec<_> = channels
                    .iter()
                    .zip(&scores)
                    .map(|(c, s)| serde_json::json!({ "channel": c.name, "specificity": s }))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for (channel, score) in channels.iter().zip(scores) {
                    println!("{}\t{:.2}", channel.name, score);
                }
            }
        }
        Command::Table { file } => {
            let table = read_fold_xls(file, settings.atlas)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&table)?);
            } else {
                let (rows, cols) = table.shape();
                println!("{} atlas: {} rows x {} columns\n", settings.atlas, rows, cols);
                print!("{}", table);
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
