use clap::Parser;

use colorcube::config::{ConfigError, ViewerConfig};
use colorcube::logging::{init_logging, LoggingConfig};

mod app;
mod args;

use app::{App, AppError};
use args::Args;

fn main() {
    // clion needs help in trait annotation
    let args = <Args as Parser>::parse();

    init_logging(LoggingConfig {
        env_filter: args.log_filter.clone(),
        ..Default::default()
    });

    if let Err(e) = run(args) {
        log::error!("{e}");
        std::process::exit(-1);
    }
}

fn run(args: Args) -> Result<(), MainError> {
    let mut config = match &args.config {
        Some(path) => {
            log::info!("reading config from {:?}", path);
            ViewerConfig::load_from_path(path)?
        }
        None => ViewerConfig::default(),
    };

    args.apply(&mut config);
    config.validate()?;

    let app = App::new(&config, args.capture)?;

    app.run()?;

    Ok(())
}

#[derive(Debug, thiserror::Error)]
enum MainError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    App(#[from] AppError),
}
