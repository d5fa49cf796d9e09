use std::env;
use std::path::PathBuf;

use firesynth_core::ConfigBuilder;
use firesynth_generate::GenerationEngine;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = env::args().skip(1);
    let mut builder = ConfigBuilder::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--out" => builder.output_dir = args.next().map(PathBuf::from).ok_or("missing --out value")?,
            "--seed" => builder.rng_seed = Some(args.next().ok_or("missing --seed value")?.parse()?),
            "--incidents" => {
                builder.incident_count = args.next().ok_or("missing --incidents value")?.parse()?
            }
            _ => return Err(format!("unexpected argument '{arg}'").into()),
        }
    }

    let result = GenerationEngine::new(builder.build()?).run()?;
    for file in &result.files {
        println!("{}={} rows", file.path.display(), file.rows);
    }
    Ok(())
}
