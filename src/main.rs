fn main() {
    if let Err(err) = sungear_rs::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
