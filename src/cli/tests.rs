#[cfg(test)]
mod cli_tests {
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use clap::error::ErrorKind;

    #[test]
    fn test_missing_subcommand_shows_help() {
        let err = Cli::try_parse_from(["bashgpt"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand);
    }

    #[test]
    fn test_unknown_subcommand_is_an_error() {
        let err = Cli::try_parse_from(["bashgpt", "frobnicate"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
    }

    #[test]
    fn test_help_subcommand_is_a_command() {
        let cli = Cli::try_parse_from(["bashgpt", "help"]).unwrap();
        assert!(matches!(cli.command, Commands::Help));

        let err = Cli::try_parse_from(["bashgpt", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_sh_query_only() {
        let cli = Cli::try_parse_from(["bashgpt", "sh", "find", "large", "files"]).unwrap();
        match cli.command {
            Commands::Sh(cmd) => {
                assert_eq!(cmd.prompt(), "find large files");
                assert!(cmd.command().is_empty());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_sh_query_and_suggested_command() {
        let cli = Cli::try_parse_from([
            "bashgpt", "sh", "list", "everything", "--", "ls", "-la", "/tmp",
        ])
        .unwrap();
        match cli.command {
            Commands::Sh(cmd) => {
                assert_eq!(cmd.prompt(), "list everything");
                assert_eq!(cmd.command(), ["ls", "-la", "/tmp"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_sh_query_with_flags_and_later_delimiters() {
        let cli = Cli::try_parse_from([
            "bashgpt", "sh", "grep", "-r", "todo", "--", "grep", "-r", "--", "TODO", ".",
        ])
        .unwrap();
        match cli.command {
            Commands::Sh(cmd) => {
                assert_eq!(cmd.prompt(), "grep -r todo");
                assert_eq!(cmd.command(), ["grep", "-r", "--", "TODO", "."]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_upgrade_flags() {
        let cli = Cli::try_parse_from(["bashgpt", "upgrade", "--yes"]).unwrap();
        assert!(matches!(cli.command, Commands::Upgrade(ref args) if args.yes && !args.check));

        let cli = Cli::try_parse_from(["bashgpt", "upgrade", "--check"]).unwrap();
        assert!(matches!(cli.command, Commands::Upgrade(ref args) if args.check));

        assert!(Cli::try_parse_from(["bashgpt", "upgrade", "--check", "--yes"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["bashgpt", "version", "--verbose"]).unwrap();
        assert!(cli.verbose);

        let cli = Cli::try_parse_from(["bashgpt", "-q", "version"]).unwrap();
        assert!(cli.quiet);

        assert!(Cli::try_parse_from(["bashgpt", "-q", "-v", "version"]).is_err());
    }
}
