//! Shell completions command

use std::path::PathBuf;

use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};

use crate::output::emit;
use crate::Cli;

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,

    /// Write the completion script to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &CompletionsArgs) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let mut script = Vec::new();
    generate(args.shell, &mut cmd, bin_name, &mut script);
    tracing::debug!("Generated {} completions ({} bytes)", args.shell, script.len());

    emit(&String::from_utf8_lossy(&script), args.output.as_deref())
}
