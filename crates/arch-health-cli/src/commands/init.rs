//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use crate::config_resolver::PROJECT_CONFIG_NAMES;

const DEFAULT_CONFIG: &str = r##"# arch-health configuration

[analyzer]
# Project base; module ids are paths relative to it
root = "."

# Directories to scan, relative to root
sources = ["src"]

# Directory names or glob patterns to skip
exclude = ["node_modules", "dist", "build", "coverage", ".git", ".next", "out"]

# Extensions to analyze
extensions = ["ts", "tsx", "js", "jsx", "mjs", "cjs"]

# Import prefixes that are never resolved (path aliases)
alias_prefixes = ["@/", "~/", "#/"]

# Respect .gitignore files
respect_gitignore = false

# Worker threads for file analysis (default: one per core)
# parallelism = 4

[cycles]
# Report each physical cycle once
dedupe = false

[coupling]
critical_instability = 0.8
critical_total_coupling = 20
critical_distance = 0.7
concerning_instability = 0.6
concerning_distance = 0.4
concerning_total_coupling = 15

# Override which layers each layer may import (itself is always allowed).
# [dependencies]
# presentation = ["business", "infrastructure", "shared"]
# business = ["data", "infrastructure", "shared"]
# data = ["infrastructure", "shared"]
# infrastructure = ["shared"]
# shared = []
# unknown = ["presentation", "business", "data", "infrastructure", "shared"]
"##;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let path = write_config(Path::new("."), force)?;

    println!("Created {}", path.display());
    println!("\nNext steps:");
    println!("  1. Edit {} to match your source layout", PROJECT_CONFIG_NAMES[0]);
    println!("  2. Run: arch-health check");

    Ok(())
}

/// Writes the default config into `dir`.
pub fn write_config(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(PROJECT_CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    Ok(config_path)
}
