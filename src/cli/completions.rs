use clap::Parser;
use clap_complete::Shell;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    bundlectl completions bash > ~/.bash_completion.d/bundlectl\n\n\
                  Generate zsh completions:\n    bundlectl completions zsh > ~/.zfunc/_bundlectl\n\n\
                  Generate fish completions:\n    bundlectl completions fish > ~/.config/fish/completions/bundlectl.fish")]
pub struct CompletionsArgs {
    /// Shell type
    #[arg(value_enum, ignore_case = true)]
    pub shell: Shell,
}
