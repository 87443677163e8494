fn main() {
    if let Err(e) = waypost_cli::run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
