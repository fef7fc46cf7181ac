//! Print the consensus accounts test vectors in the older format.

use anyhow::{anyhow, Context, Result};
use oasis_runtime_vectors::{generate_legacy_vectors, init_logging, write_json, LegacyConfig};

fn main() -> Result<()> {
    init_logging().map_err(|e| anyhow!(e))?;

    let vectors = generate_legacy_vectors(&LegacyConfig::default())
        .context("generating consensus accounts vectors")?;
    write_json(std::io::stdout().lock(), &vectors).context("writing consensus accounts vectors")?;
    Ok(())
}
