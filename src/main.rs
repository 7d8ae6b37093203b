fn main() {
    if let Err(err) = supply_board::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
