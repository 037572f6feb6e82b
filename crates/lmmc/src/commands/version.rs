//! Version command

use crate::cli::VersionArgs;
use crate::format::formatter_for;
use crate::version::VersionInfo;
use anyhow::Result;
use lmmc_core::OutputFormat;

pub fn run(args: VersionArgs, format: OutputFormat) -> Result<()> {
    // --json is kept as a shorthand for --output json
    let format = if args.json { OutputFormat::Json } else { format };

    let info = VersionInfo::current();
    println!("{}", formatter_for(format).format(&info)?);

    Ok(())
}
