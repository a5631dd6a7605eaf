use copypasta_ext::prelude::*;
use tracing::debug;

use crate::error::{CliError, Result};

/// Writes `text` to the system clipboard unchanged.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut context = copypasta_ext::try_context()
        .ok_or_else(|| CliError::Clipboard("no clipboard provider found".to_string()))?;

    context
        .set_contents(text.to_string())
        .map_err(|e| CliError::Clipboard(e.to_string()))?;

    debug!("Copied {} characters to clipboard", text.chars().count());
    Ok(())
}
