//! Production build: write hashed sprite files and generated modules.

use std::fs;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::config::ProjectConfig;
use crate::log;
use crate::sprite::{Collector, template};

/// Build every sprite and the generated source modules into the configured
/// output directory.
pub fn run(config: &ProjectConfig) -> Result<()> {
    let start = Instant::now();

    let mut collector = Collector::new(config, false);
    collector.init();

    let output = &config.build.output;
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    for sprite in collector.sprites() {
        let document = sprite.get_sprite();
        let file_name = sprite.file_name();
        fs::write(output.join(&file_name), &document.markup)
            .with_context(|| format!("Failed to write {file_name}"))?;

        let count = sprite.len();
        log!("build"; "{} ({} symbol{})", file_name, count, if count == 1 { "" } else { "s" });
    }

    write_module(config, template::PATHS_FILE, &template::paths_module(
        &collector,
        &config.build.asset_prefix,
        &config.runtime,
    ))?;
    write_module(config, template::DATA_FILE, &template::data_module(&collector))?;
    write_module(config, template::TYPES_FILE, &template::types_module(&collector))?;

    log!(
        "build";
        "wrote {} sprite{} to {} in {:.2?}",
        collector.sprites().len(),
        if collector.sprites().len() == 1 { "" } else { "s" },
        output.display(),
        start.elapsed()
    );

    Ok(())
}

fn write_module(config: &ProjectConfig, file_name: &str, contents: &str) -> Result<()> {
    fs::write(config.build.output.join(file_name), contents)
        .with_context(|| format!("Failed to write {file_name}"))
}
