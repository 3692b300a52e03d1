use clap::Parser;

use pose_dataset::cli::args::{Cli, Commands};
use pose_dataset::cli::{logging, prepare};

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Prepare(args) => {
            logging::set_verbose(args.verbose);
            prepare::run_prepare(&args);
        }
    }
}
