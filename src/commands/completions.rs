//! Shell completions command

use clap::CommandFactory;

use crate::cli::CompletionsArgs;

/// Write completions for the requested shell to stdout
pub fn run(args: &CompletionsArgs) {
    let mut cmd = <crate::cli::Cli as CommandFactory>::command();
    clap_complete::generate(args.shell, &mut cmd, "bundlectl", &mut std::io::stdout().lock());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap_complete::Shell;

    #[test]
    fn test_completions_generate_for_every_shell() {
        for shell in [
            Shell::Bash,
            Shell::Elvish,
            Shell::Fish,
            Shell::PowerShell,
            Shell::Zsh,
        ] {
            run(&CompletionsArgs { shell });
        }
    }
}
