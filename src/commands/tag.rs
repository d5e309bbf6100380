//! `noteo tag` commands - set, remove and list tags

use std::io;
use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;

use crate::commands::helpers::{file_args, finish_errors, print_errors};
use noteo_core::bail_usage;
use noteo_core::error::Result;
use noteo_core::repository::Repository;

/// Set a tag on every given note. Files that cannot be tagged are reported
/// and skipped.
pub fn set(work_dir: &Path, name: Option<&str>, stdin: bool, files: &[PathBuf]) -> Result<()> {
    let Some(name) = name.filter(|name| !name.is_empty()) else {
        bail_usage!("no name given using -n flag");
    };
    let repo = Repository::for_work_dir(work_dir)?;
    let files = file_args(stdin, files, io::stdin().lock())?;
    for_each_file(&files, |file| repo.tag_file_with(file, name));
    Ok(())
}

/// Remove a tag, given by name or by regular expression, from every given note
pub fn rm(
    work_dir: &Path,
    name: Option<&str>,
    grep: Option<&str>,
    stdin: bool,
    files: &[PathBuf],
) -> Result<()> {
    let name = name.filter(|name| !name.is_empty());
    let grep = grep.filter(|grep| !grep.is_empty());
    if name.is_none() && grep.is_none() {
        bail_usage!("no name given using -n flag or regex with --grep flag");
    }
    let repo = Repository::for_work_dir(work_dir)?;
    let files = file_args(stdin, files, io::stdin().lock())?;
    match (name, grep) {
        (Some(name), _) => for_each_file(&files, |file| repo.untag_file(file, name)),
        (None, Some(grep)) => for_each_file(&files, |file| repo.untag_file_regex(file, grep)),
        (None, None) => {}
    }
    Ok(())
}

/// Print every tag of every note below `dir`
pub async fn ls(dir: &Path) -> Result<()> {
    let repo = Repository::for_work_dir(dir)?;
    let (mut tags, errors) = repo.tags(CancellationToken::new());
    let printers = print_errors(vec![errors]);
    while let Some(tag) = tags.recv().await {
        println!("{}", tag);
    }
    finish_errors(printers).await;
    Ok(())
}

fn for_each_file(files: &[PathBuf], mut update: impl FnMut(&Path) -> Result<bool>) {
    for file in files {
        match update(file) {
            Ok(true) => println!("{} updated", file.display()),
            Ok(false) => {}
            Err(e) => eprintln!("skipping: {}", e),
        }
    }
}
