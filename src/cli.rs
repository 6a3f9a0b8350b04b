use clap::Parser;

/// chunkyank – copy ReaFIR chunk data from an OBS scene collection to clipboard
///
/// Purely interactive: the per-user OBS scenes folder is scanned and a numeric
/// prompt appears when more than one collection exists. There are no
/// operational flags; clap contributes `--help`/`--version` and rejects stray
/// arguments.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {}
