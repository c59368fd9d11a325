fn main() {
    if let Err(err) = csv_autoreport::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
