use HydroBurn::Examples::sdc_examples::sdc_examples;
use HydroBurn::Examples::shock_examples::shock_examples;
use HydroBurn::Utils::logger::init_logger;
use HydroBurn::settings::RunSettings;
use log::{LevelFilter, error};

pub fn main() {
    // an optional settings file as the first argument sets the log level
    let settings = match std::env::args().nth(1) {
        Some(path) => match RunSettings::from_file(&path) {
            Ok(settings) => settings,
            Err(e) => {
                init_logger(LevelFilter::Error);
                error!("{}", e);
                return;
            }
        },
        None => RunSettings::default(),
    };
    init_logger(settings.level_filter().unwrap_or(LevelFilter::Info));

    let task: usize = 0;
    if let Err(e) = shock_examples(task) {
        error!("{}", e);
    }
    if let Err(e) = sdc_examples(task) {
        error!("{}", e);
    }
}
