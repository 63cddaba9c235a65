use clap::Parser;

use typed_cursor::cli::Args;
use typed_cursor::commands::Context;
use typed_cursor::config::{resolve_database, ConfigFile};
use typed_cursor::convert::Converter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = ConfigFile::load()?;
    let ctx = Context {
        database: resolve_database(args.db.as_deref(), config.as_ref())?,
        converter: Converter::new(config.map(|c| c.conversion).unwrap_or_default()),
    };

    let output = args.command.run(&ctx, args.format)?;
    println!("{}", output);
    Ok(())
}
