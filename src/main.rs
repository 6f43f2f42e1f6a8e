fn main() {
    if let Err(err) = vidseg_eval_lib::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
