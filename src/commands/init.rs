//! `noteo init` command - mark the working directory as a repository root

use std::path::Path;

use noteo_core::error::Result;
use noteo_core::repository::Repository;

/// Execute the init command
pub fn execute(work_dir: &Path) -> Result<()> {
    let config_file = Repository::init(work_dir)?;
    println!(
        "Repository initialized. Configuration file saved at {}",
        config_file.display()
    );
    Ok(())
}
