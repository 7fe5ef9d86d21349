use clap::Parser;

/// Arguments for the bundle-list command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  List installed bundles:\n    bundlectl bundle-list\n\n\
                  List every installable bundle:\n    bundlectl bundle-list --all\n\n\
                  Show what a bundle includes:\n    bundlectl bundle-list --deps vim\n\n\
                  Show what requires a bundle:\n    bundlectl bundle-list --has-dep editors --all -v")]
pub struct ListArgs {
    /// List every installable bundle; with --has-dep, search all bundles
    #[arg(long, short = 'a')]
    pub all: bool,

    /// List the bundles BUNDLE includes
    #[arg(long, value_name = "BUNDLE", conflicts_with = "has_dep")]
    pub deps: Option<String>,

    /// List the bundles that require BUNDLE
    #[arg(long, value_name = "BUNDLE")]
    pub has_dep: Option<String>,

    /// Leave optional includes out of --deps
    #[arg(long)]
    pub skip_optional: bool,
}

#[cfg(test)]
mod tests {
    use super::super::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn test_cli_parsing_has_dep() {
        let cli =
            Cli::try_parse_from(["bundlectl", "bundle-list", "--has-dep", "editors", "--all"])
                .unwrap();
        match cli.command {
            Commands::BundleList(args) => {
                assert_eq!(args.has_dep, Some("editors".to_string()));
                assert!(args.all);
                assert_eq!(args.deps, None);
            }
            _ => panic!("Expected BundleList command"),
        }
    }

    #[test]
    fn test_deps_and_has_dep_conflict() {
        assert!(
            Cli::try_parse_from(["bundlectl", "bundle-list", "--deps", "a", "--has-dep", "b"])
                .is_err()
        );
    }
}
