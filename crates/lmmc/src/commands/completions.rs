//! Shell completions generation

use crate::cli::{Cli, CompletionArgs};
use anyhow::Result;
use clap::CommandFactory;
use clap_complete::generate;
use std::io;

pub fn run(args: CompletionArgs) -> Result<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "lmmc", &mut io::stdout());
    Ok(())
}
