mod platform;

use clap::Parser;

fn main() -> Result<(), platform::AppError> {
    let cli = platform::Cli::parse();
    platform::run_app(cli)
}
