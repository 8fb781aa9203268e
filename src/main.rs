fn main() {
    if let Err(err) = duet::cli::main() {
        eprintln!("❌ Error: {err}");
        std::process::exit(1);
    }
}
