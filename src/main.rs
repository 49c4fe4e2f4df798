fn main() {
    if let Err(error) = localnote::run() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}
