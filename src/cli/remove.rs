use clap::Parser;

/// Arguments for the bundle-remove command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Remove a bundle:\n    bundlectl bundle-remove vim\n\n\
                  Remove a bundle and every bundle that requires it:\n    bundlectl bundle-remove editors --force")]
pub struct RemoveArgs {
    /// Bundles to remove
    #[arg(required = true, num_args = 1.., value_name = "BUNDLE")]
    pub bundles: Vec<String>,

    /// Also remove the bundles that require the ones given
    #[arg(long, short = 'x')]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::super::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn test_cli_parsing_remove() {
        let cli = Cli::try_parse_from(["bundlectl", "bundle-remove", "editors", "-x"]).unwrap();
        match cli.command {
            Commands::BundleRemove(args) => {
                assert_eq!(args.bundles, vec!["editors".to_string()]);
                assert!(args.force);
            }
            _ => panic!("Expected BundleRemove command"),
        }
    }
}
