fn main() {
    if let Err(error) = market_desk_lib::run() {
        eprintln!("market-desk: {error}");
        std::process::exit(1);
    }
}
