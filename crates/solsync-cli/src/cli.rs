//! CLI argument parsing using clap derive

use clap::{Parser, Subcommand};
use solsync_core::ResourceKind;

/// solsync - Keep local Lua scripts and a solution's remote resources in sync
#[derive(Parser, Debug)]
#[command(name = "solsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

fn parse_resource(s: &str) -> Result<ResourceKind, String> {
    s.parse().map_err(|e: solsync_core::Error| e.to_string())
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Show what differs between local files and the server
    Status {
        /// Limit to one resource type (library or eventhandler)
        #[arg(short, long, value_parser = parse_resource)]
        resource: Option<ResourceKind>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Upload new and modified local files
    Syncup {
        /// Limit to one resource type (library or eventhandler)
        #[arg(short, long, value_parser = parse_resource)]
        resource: Option<ResourceKind>,

        /// Also remove remote items with no local file
        #[arg(long)]
        delete: bool,

        /// Preview changes without applying them
        #[arg(long)]
        dry_run: bool,
    },

    /// Download remote items that have no local file
    Syncdown {
        /// Limit to one resource type (library or eventhandler)
        #[arg(short, long, value_parser = parse_resource)]
        resource: Option<ResourceKind>,

        /// Preview changes without applying them
        #[arg(long)]
        dry_run: bool,
    },

    /// List remote items of a resource type
    List {
        /// Resource type (library or eventhandler)
        #[arg(value_parser = parse_resource)]
        resource: ResourceKind,
    },

    /// Print the content of one remote item
    Fetch {
        /// Resource type (library or eventhandler)
        #[arg(value_parser = parse_resource)]
        resource: ResourceKind,

        /// Alias of the item
        alias: String,
    },

    /// Delete one remote item
    Remove {
        /// Resource type (library or eventhandler)
        #[arg(value_parser = parse_resource)]
        resource: ResourceKind,

        /// Alias of the item
        alias: String,
    },

    /// Print a resolved setting (e.g. solution.id)
    Config {
        /// Dotted setting key
        key: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_no_args() {
        let cli = Cli::parse_from(["solsync"]);
        assert!(!cli.verbose);
        assert!(cli.command.is_none());
    }

    #[test]
    fn parse_syncup_flags() {
        let cli = Cli::parse_from(["solsync", "syncup", "-r", "modules", "--delete", "--dry-run"]);
        assert_eq!(
            cli.command,
            Some(Commands::Syncup {
                resource: Some(ResourceKind::Library),
                delete: true,
                dry_run: true,
            })
        );
    }

    #[test]
    fn parse_syncdown_defaults_to_all_resources() {
        let cli = Cli::parse_from(["solsync", "-v", "syncdown"]);
        assert!(cli.verbose);
        assert_eq!(
            cli.command,
            Some(Commands::Syncdown {
                resource: None,
                dry_run: false,
            })
        );
    }

    #[test]
    fn parse_fetch() {
        let cli = Cli::parse_from(["solsync", "fetch", "eventhandler", "sol_timer_tick"]);
        assert_eq!(
            cli.command,
            Some(Commands::Fetch {
                resource: ResourceKind::EventHandler,
                alias: "sol_timer_tick".into(),
            })
        );
    }

    #[test]
    fn unknown_resource_is_rejected() {
        assert!(Cli::try_parse_from(["solsync", "list", "files"]).is_err());
    }
}
