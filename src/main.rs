fn main() {
    if let Err(err) = well_explorer::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
