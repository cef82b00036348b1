fn main() {
    #[cfg(feature = "cli")]
    akbtool::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("akbtool: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
