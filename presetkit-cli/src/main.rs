use structopt::StructOpt;

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = presetkit_cli::PresetKitArgs::from_args();
    if let Err(e) = presetkit_cli::run(&args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
