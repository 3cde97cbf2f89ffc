use ais_stream::{cli::Args, settings::Settings, startup::App, telemetry::init_tracer};
use clap::Parser;
use std::process::ExitCode;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let settings = match Settings::new(args.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{e}: {e:?}");
            return ExitCode::FAILURE;
        }
    };

    init_tracer(&settings.log_level);

    let app = App::build(settings);

    match app.run(args.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}: {e:?}");
            ExitCode::FAILURE
        }
    }
}
