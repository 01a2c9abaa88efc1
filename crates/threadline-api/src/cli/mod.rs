//! CLI command definitions for the `threadline` binary.
//!
//! Uses clap derive macros for argument parsing. Commands follow a
//! noun-verb pattern (e.g., `threadline user create`, `threadline chat send`).

pub mod chat;
pub mod user;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Chat-turn orchestration backend for hosted language models.
#[derive(Parser)]
#[command(name = "threadline", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on (defaults to `port` in config.toml).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to `host` in config.toml).
        #[arg(long)]
        host: Option<String>,

        /// Export spans through OpenTelemetry (stdout exporter).
        #[arg(long)]
        otel: bool,

        /// Emit logs as JSON lines.
        #[arg(long)]
        log_json: bool,
    },

    /// Manage users and their API keys.
    User {
        #[command(subcommand)]
        action: UserCommand,
    },

    /// Send turns and browse conversations as a user.
    Chat {
        #[command(subcommand)]
        action: ChatCommand,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum UserCommand {
    /// Create a user and print their API key (shown once).
    Create {
        /// Email address; stored lowercase.
        email: String,
    },

    /// Show a user by email.
    Show {
        email: String,
    },
}

#[derive(Subcommand)]
pub enum ChatCommand {
    /// Send one message in the user's latest conversation.
    Send {
        /// Email of the sending user.
        #[arg(long, short = 'u')]
        email: String,

        /// Message text.
        message: String,

        /// Model identifier (defaults to `default_model` in config.toml).
        #[arg(long, short = 'm')]
        model: Option<String>,
    },

    /// List a user's conversations, newest first.
    #[command(alias = "ls")]
    List {
        #[arg(long, short = 'u')]
        email: String,
    },

    /// Print the messages of one conversation.
    History {
        #[arg(long, short = 'u')]
        email: String,

        /// Conversation ID.
        id: String,
    },

    /// Delete a conversation and its messages.
    #[command(alias = "rm")]
    Delete {
        #[arg(long, short = 'u')]
        email: String,

        /// Conversation ID.
        id: String,

        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_chat_send() {
        let cli = Cli::try_parse_from([
            "threadline", "chat", "send", "-u", "a@b.co", "hello", "--model", "gpt-4",
        ])
        .unwrap();
        match cli.command {
            Commands::Chat {
                action: ChatCommand::Send { email, message, model },
            } => {
                assert_eq!(email, "a@b.co");
                assert_eq!(message, "hello");
                assert_eq!(model.as_deref(), Some("gpt-4"));
            }
            _ => panic!("expected chat send"),
        }
    }

    #[test]
    fn test_serve_flags_default_to_config() {
        let cli = Cli::try_parse_from(["threadline", "serve", "--otel"]).unwrap();
        match cli.command {
            Commands::Serve { port, host, otel, log_json } => {
                assert_eq!(port, None);
                assert_eq!(host, None);
                assert!(otel);
                assert!(!log_json);
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["threadline", "user", "show", "a@b.co", "--json", "-vv"])
            .unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
    }
}
