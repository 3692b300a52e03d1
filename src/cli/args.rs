use clap::{Args, Parser, Subcommand};

/// CLI arguments parser.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = r#"Prepare Options:
    --source, -s <SOURCE>  Keypoint file, directory of keypoint files, or workout directory
    --format, -f <FORMAT>  Source layout: canonical, mediapipe, or mmfit [default: mediapipe]
    --output, -o <OUTPUT>  Output directory for dataset artifacts [default: data]
    --seed <SEED>          Augmentation RNG seed [default: 42]
    --window <WINDOW>      Temporal smoothing window, odd [default: 3]
    --no-smooth            Disable temporal smoothing
    --no-augment           Disable augmentation
    --verbose              Show verbose output

Examples:
    pose-dataset prepare --source training/keypoints --format mediapipe
    pose-dataset prepare --source data/mm-fit --format mmfit --output data/processed
    pose-dataset prepare -s squat_keypoints.json -f mediapipe --seed 7 --no-augment"#)]
pub struct Cli {
    #[command(subcommand)]
    /// Subcommand to execute.
    pub command: Commands,
}

/// Commands for the CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a normalized, augmented training dataset from keypoint sources
    Prepare(PrepareArgs),
}

/// Arguments for the prepare command.
#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// Keypoint file, directory of keypoint files, or workout directory
    #[arg(short, long)]
    pub source: String,

    /// Source layout: canonical, mediapipe, or mmfit
    #[arg(short, long, default_value = "mediapipe")]
    pub format: String,

    /// Output directory for dataset artifacts
    #[arg(short, long, default_value = "data")]
    pub output: String,

    /// Augmentation RNG seed
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Temporal smoothing window (odd)
    #[arg(long, default_value_t = 3)]
    pub window: usize,

    /// Disable temporal smoothing
    #[arg(long, default_value_t = false)]
    pub no_smooth: bool,

    /// Disable augmentation
    #[arg(long, default_value_t = false)]
    pub no_augment: bool,

    /// Show verbose output
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_prepare_args_defaults() {
        let args = Cli::parse_from(["app", "prepare", "--source", "keypoints/"]);
        match args.command {
            Commands::Prepare(prepare_args) => {
                assert_eq!(prepare_args.source, "keypoints/");
                assert_eq!(prepare_args.format, "mediapipe");
                assert_eq!(prepare_args.output, "data");
                assert_eq!(prepare_args.seed, 42);
                assert_eq!(prepare_args.window, 3);
                assert!(!prepare_args.no_smooth);
                assert!(!prepare_args.no_augment);
                assert!(prepare_args.verbose);
            }
        }
    }

    #[test]
    fn test_prepare_args_custom() {
        let args = Cli::parse_from([
            "app",
            "prepare",
            "--source",
            "data/mm-fit",
            "--format",
            "mmfit",
            "--seed",
            "7",
            "--no-augment",
            "--verbose",
            "false",
        ]);
        match args.command {
            Commands::Prepare(prepare_args) => {
                assert_eq!(prepare_args.source, "data/mm-fit");
                assert_eq!(prepare_args.format, "mmfit");
                assert_eq!(prepare_args.seed, 7);
                assert!(prepare_args.no_augment);
                assert!(!prepare_args.verbose);
            }
        }
    }
}
