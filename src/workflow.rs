use std::io;

use anyhow::Result;

use crate::{clipboard, scene, selector};

/// Drive one extraction run: pick a scene collection, search it for ReaFIR
/// entries, and copy the chunk data only when the result is unambiguous.
pub fn run() -> Result<()> {
    let scenes_dir = selector::scenes_dir()?;
    tracing::debug!("Searching for scenes folder: \"{}\"", scenes_dir.display());

    let files = selector::scan_scene_files(&scenes_dir)?;
    let selected = selector::choose_scene_file(&files, &mut io::stdin().lock())?;
    tracing::debug!("Selected scene file: \"{}\"", selected.display());

    let document = scene::load_scene(selected)?;
    let chunks = scene::find_chunk_data(&document);
    tracing::debug!("Found {} chunk_data entries", chunks.len());

    match chunks.as_slice() {
        [] => tracing::warn!("No ReaFIR chunk_data found"),
        [only] => {
            clipboard::copy_chunk_to_clipboard((*only).to_string())?;
            tracing::info!("chunk_data copied to clipboard");
        }
        many => {
            // An ambiguous result is unsafe to act on; leave the clipboard alone.
            tracing::warn!("{} chunk_data entries found; not copying", many.len());
        }
    }
    Ok(())
}
