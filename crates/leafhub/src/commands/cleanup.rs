//! `leafhub cleanup`: detach replicated policies from the hub of hubs.

use std::io::Read;
use std::path::Path;

use tracing::info;

use leafhub_core::cleanup::{clean_objects, cleanup_finalizer};
use leafhub_core::{CoreError, Object};

use crate::cli::CleanupArgs;
use crate::error::CliError;

pub fn handle(args: &CleanupArgs) -> Result<(), CliError> {
    let finalizer = match &args.finalizer {
        Some(name) if name.trim().is_empty() => {
            return Err(CliError::InvalidArgument {
                arg: "--finalizer".into(),
                reason: "must not be empty".into(),
            });
        }
        Some(name) => name.clone(),
        None => cleanup_finalizer(&args.component),
    };

    let (label, raw) = read_input(&args.input)?;
    let mut objects: Vec<Object> =
        serde_json::from_str(&raw).map_err(|source| CliError::Json { input: label, source })?;

    let cleaned = clean_objects(&mut objects, &finalizer);
    info!(cleaned, total = objects.len(), %finalizer, "cleanup finished");

    let mut rendered = serde_json::to_string_pretty(&objects).map_err(CoreError::from)?;
    rendered.push('\n');
    match &args.output {
        Some(path) => std::fs::write(path, rendered).map_err(|e| CliError::io(path, e)),
        None => {
            print!("{rendered}");
            Ok(())
        }
    }
}

fn read_input(path: &Path) -> Result<(String, String), CliError> {
    if path == Path::new("-") {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .map_err(|e| CliError::io("<stdin>", e))?;
        return Ok(("<stdin>".into(), raw));
    }
    let raw = std::fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
    Ok((path.display().to_string(), raw))
}
