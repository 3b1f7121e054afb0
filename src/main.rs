fn main() {
    if let Err(err) = inventory_etl::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
