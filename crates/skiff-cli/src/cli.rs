use clap::{ArgAction, Parser, Subcommand, ValueHint};

#[derive(Parser, Debug)]
#[command(
    name = "skiff",
    author,
    version,
    about,
    help_template = "{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}",
    arg_required_else_help = true
)]
pub struct Args {
    /// Set output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress outputs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as json
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Provide custom config file
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<String>,

    /// Use this registry file instead of the configured one
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub registry: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage remotes and reference bindings
    #[command(arg_required_else_help = true)]
    Remote {
        #[clap(subcommand)]
        action: RemoteAction,
    },

    /// Print the configuration file to stdout
    Config,

    /// Generate a default configuration file
    #[clap(name = "defconfig")]
    DefConfig,

    /// Print resolved paths
    Env,
}

#[derive(Subcommand, Debug)]
pub enum RemoteAction {
    /// List remotes in priority order
    #[clap(visible_alias = "ls")]
    List,

    /// Add a remote
    #[command(arg_required_else_help = true)]
    Add {
        /// Name of the remote
        name: String,

        /// URL of the remote
        url: String,

        /// Verify TLS certificates: true/yes or false/no (default: true)
        verify_ssl: Option<String>,

        /// Insert at this position instead of appending (no value means first)
        #[arg(short, long, num_args = 0..=1, default_missing_value = "0")]
        insert: Option<usize>,
    },

    /// Change the URL of a remote, keeping its position
    #[command(arg_required_else_help = true)]
    Update {
        /// Name of the remote
        name: String,

        /// New URL
        url: String,

        /// Verify TLS certificates: true/yes or false/no (unchanged if omitted)
        verify_ssl: Option<String>,
    },

    /// Remove a remote
    #[command(arg_required_else_help = true)]
    #[clap(visible_alias = "rm")]
    Remove {
        /// Name of the remote
        name: String,
    },

    /// List reference bindings
    #[clap(name = "list-ref", alias = "list_ref")]
    ListRef,

    /// Bind a package reference to a remote
    #[command(arg_required_else_help = true)]
    #[clap(name = "add-ref", alias = "add_ref")]
    AddRef {
        /// Package reference, e.g. Pkg/1.0@user/channel
        reference: String,

        /// Name of the remote
        remote: String,
    },

    /// Rebind a package reference to another remote
    #[command(arg_required_else_help = true)]
    #[clap(name = "update-ref", alias = "update_ref")]
    UpdateRef {
        /// Package reference, e.g. Pkg/1.0@user/channel
        reference: String,

        /// Name of the remote
        remote: String,
    },

    /// Remove a reference binding
    #[command(arg_required_else_help = true)]
    #[clap(name = "remove-ref", alias = "remove_ref")]
    RemoveRef {
        /// Package reference
        reference: String,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("skiff").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_add_with_verify_ssl() {
        let args = parse(&["remote", "add", "my-remote", "http://someurl", "FALse"]);
        match args.command {
            Commands::Remote {
                action:
                    RemoteAction::Add {
                        name,
                        url,
                        verify_ssl,
                        insert,
                    },
            } => {
                assert_eq!(name, "my-remote");
                assert_eq!(url, "http://someurl");
                assert_eq!(verify_ssl.as_deref(), Some("FALse"));
                assert_eq!(insert, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_add_insert_without_value_means_first() {
        let args = parse(&["remote", "add", "origin", "https://myurl", "--insert"]);
        assert!(matches!(
            args.command,
            Commands::Remote {
                action: RemoteAction::Add {
                    insert: Some(0),
                    ..
                }
            }
        ));
    }

    #[test]
    fn test_add_insert_with_value() {
        let args = parse(&["remote", "add", "origin3", "https://myurl3", "--insert=1"]);
        assert!(matches!(
            args.command,
            Commands::Remote {
                action: RemoteAction::Add {
                    insert: Some(1),
                    ..
                }
            }
        ));
    }

    #[test]
    fn test_underscore_aliases() {
        let args = parse(&["remote", "list_ref"]);
        assert!(matches!(
            args.command,
            Commands::Remote {
                action: RemoteAction::ListRef
            }
        ));

        let args = parse(&["remote", "update_ref", "Hello1/0.1@user/testing", "remote2"]);
        assert!(matches!(
            args.command,
            Commands::Remote {
                action: RemoteAction::UpdateRef { .. }
            }
        ));
    }

    #[test]
    fn test_global_flags() {
        let args = parse(&["remote", "list", "-vv", "--json", "--registry", "/tmp/r.txt"]);
        assert_eq!(args.verbose, 2);
        assert!(args.json);
        assert_eq!(args.registry.as_deref(), Some("/tmp/r.txt"));
    }
}
