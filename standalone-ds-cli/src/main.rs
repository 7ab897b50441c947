use std::env;

use anyhow::{Context, Result};
use standalone_ds::{logging, merge_all, ProcessSnapshot, Settings};

fn main() {
    if let Err(err) = real_main() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn real_main() -> Result<()> {
    // Capture process state once; everything below reads this snapshot
    let args: Vec<String> = env::args().skip(1).collect();
    let snapshot = ProcessSnapshot::capture(&args);
    let props = merge_all(&args, &snapshot);

    let settings = Settings::from_props(&props).context("Invalid arguments")?;
    logging::init_logging(settings.verbose, settings.quiet)?;
    tracing::debug!(?settings, "resolved settings");

    let extraction = standalone_ds::extract_datasource(
        &settings.standalone_file,
        settings.datasource.as_deref(),
    )
    .with_context(|| {
        format!(
            "Failed to extract datasource from {}",
            settings.standalone_file.display()
        )
    })?;

    let rendered = standalone_ds::render(&extraction, settings.output)?;
    println!("{}", rendered.trim_end());
    Ok(())
}
