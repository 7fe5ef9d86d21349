use clap::Parser;

/// Arguments for the bundle-add command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Install a bundle:\n    bundlectl bundle-add vim\n\n\
                   Install several bundles or an alias:\n    bundlectl bundle-add vim emacs\n\n\
                   Install without the free space check:\n    bundlectl bundle-add vim --skip-diskspace-check")]
pub struct AddArgs {
    /// Bundles or aliases to install
    #[arg(required = true, num_args = 1.., value_name = "BUNDLE")]
    pub bundles: Vec<String>,

    /// Do not check free space before installing
    #[arg(long)]
    pub skip_diskspace_check: bool,

    /// Do not install optional includes
    #[arg(long)]
    pub skip_optional: bool,

    /// Wait for post-update hooks to finish
    #[arg(long)]
    pub wait_for_scripts: bool,
}

#[cfg(test)]
mod tests {
    use super::super::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn test_cli_parsing_add() {
        let cli = Cli::try_parse_from(["bundlectl", "bundle-add", "vim", "emacs"]).unwrap();
        match cli.command {
            Commands::BundleAdd(args) => {
                assert_eq!(args.bundles, vec!["vim".to_string(), "emacs".to_string()]);
                assert!(!args.skip_diskspace_check);
                assert!(!args.skip_optional);
            }
            _ => panic!("Expected BundleAdd command"),
        }
    }

    #[test]
    fn test_cli_parsing_add_requires_a_bundle() {
        assert!(Cli::try_parse_from(["bundlectl", "bundle-add"]).is_err());
    }
}
