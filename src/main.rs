fn main() {
    if let Err(err) = dtable_cells::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
