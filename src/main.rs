use clap::Parser;
use swingbot::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
