#![forbid(unsafe_code)]

fn main() {
    if let Err(error) = sortkit_cli::run_from_env() {
        eprintln!("sortkit: {error}");
        std::process::exit(error.exit_code());
    }
}
