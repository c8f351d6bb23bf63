use clap::Parser;
use querystat::cli::{self, Cli};

fn main() {
    let args = Cli::parse();

    if let Err(code) = cli::run(args) {
        std::process::exit(code);
    }
}
