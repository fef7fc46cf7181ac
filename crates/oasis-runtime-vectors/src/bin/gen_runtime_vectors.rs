//! Print the runtime transaction test vectors as JSON on stdout.

use anyhow::{anyhow, Context, Result};
use oasis_runtime_vectors::{generate_runtime_vectors, init_logging, write_json, GeneratorConfig};

fn main() -> Result<()> {
    init_logging().map_err(|e| anyhow!(e))?;

    let config = GeneratorConfig::default();
    let vectors = generate_runtime_vectors(&config).context("generating runtime vectors")?;
    write_json(std::io::stdout().lock(), &vectors).context("writing runtime vectors")?;
    Ok(())
}
