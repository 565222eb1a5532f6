use clap::Parser;
use klinema::{App, AppResult, Settings, telemetry};

#[derive(Debug, Parser)]
#[command(version, about = "Streams klines and reports a trailing moving average per pair")]
struct Cli {
    #[arg(short, long, default_value = "configs/default.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();
    let settings = Settings::load_from(&cli.config)?;
    telemetry::init(&settings.telemetry)?;
    let app = App::new(settings);
    app.run().await
}
