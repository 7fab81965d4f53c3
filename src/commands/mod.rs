use anyhow::Result;
use clap::Subcommand;
use clap_complete::Shell;

use crate::config::PublishArgs;

pub mod completions;
pub mod publish;

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Emit shell completion scripts (bash/zsh/fish/elvish/powershell)")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Dispatch a subcommand, or run the publish flow when none was given
pub async fn run(cmd: Option<Commands>, args: PublishArgs) -> Result<()> {
    match cmd {
        Some(Commands::Completions { shell }) => completions::run(shell),
        None => publish::run(args).await,
    }
}
