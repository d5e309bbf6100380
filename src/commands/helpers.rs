//! Helper functions shared across commands

use std::io::BufRead;
use std::path::PathBuf;

use noteo_core::error::{NoteoError, Result};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Print every error arriving on the given channels to stderr.
///
/// Each channel is drained by its own task so that no pipeline stage blocks on
/// a full error channel. Await the handles once the notes are consumed.
pub fn print_errors(receivers: Vec<mpsc::Receiver<NoteoError>>) -> Vec<JoinHandle<()>> {
    receivers
        .into_iter()
        .map(|mut rx| {
            tokio::spawn(async move {
                while let Some(err) = rx.recv().await {
                    eprintln!("{}", err);
                }
            })
        })
        .collect()
}

/// Wait for the error printers started by [`print_errors`]
pub async fn finish_errors(handles: Vec<JoinHandle<()>>) {
    for handle in handles {
        if let Err(e) = handle.await {
            tracing::warn!(error = %e, "error printer failed");
        }
    }
}

/// File arguments, or file names read line by line from `input` when
/// `stdin` is set
pub fn file_args(stdin: bool, files: &[PathBuf], input: impl BufRead) -> Result<Vec<PathBuf>> {
    if !stdin {
        return Ok(files.to_vec());
    }
    let mut read = Vec::new();
    for line in input.lines() {
        let line = line.map_err(|e| NoteoError::io_operation("read", "standard input", e))?;
        let line = line.trim_end_matches('\r');
        if !line.is_empty() {
            read.push(PathBuf::from(line));
        }
    }
    Ok(read)
}
