use clap::Parser;
use log::{error, info};
use std::path::Path;

use vid2tfrecord::{process_dataset, Args};

fn main() {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if !Path::new(&args.data_dir).exists() {
        error!("The specified data_dir does not exist: {}", args.data_dir);
        std::process::exit(1);
    }
    if let Err(e) = args.validate() {
        error!("{}", e);
        std::process::exit(1);
    }

    info!("Starting the conversion process...");

    match process_dataset(&args) {
        Ok(stats) => {
            if stats.failed_examples > 0 {
                std::process::exit(1);
            }
            info!("Conversion process completed successfully.");
        }
        Err(e) => {
            error!("Failed to process dataset: {}", e);
            std::process::exit(1);
        }
    }
}
