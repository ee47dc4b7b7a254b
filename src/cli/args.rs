//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <path>`: Read configuration from this file
//! - `--debug`: Enable debug logging
//! - `--interactive` / `--no-interactive`: Control prompts
//! - `--quiet` / `-q`: Minimal output

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Triage - command-line client for the Triage call service
#[derive(Parser, Debug)]
#[command(name = "triage")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Read configuration from this file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output; implies --no-interactive
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable interactive prompts
    #[arg(long = "interactive", global = true, conflicts_with = "no_interactive")]
    pub interactive_flag: bool,

    /// Disable interactive prompts
    #[arg(long, global = true)]
    pub no_interactive: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Determine if interactive mode is enabled.
    ///
    /// Returns true if:
    /// - `--interactive` was explicitly set, OR
    /// - Neither `--no-interactive` nor `--quiet` was set AND stdin is a TTY
    pub fn interactive(&self) -> bool {
        if self.interactive_flag {
            true
        } else if self.no_interactive || self.quiet {
            false
        } else {
            std::io::stdin().is_terminal()
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and store the session
    #[command(
        long_about = "Log in with an email address and password.\n\n\
            On success the access and refresh tokens are stored in the configured \
            secret store and reused by later commands. A failed login leaves any \
            existing session untouched.",
        after_help = "\
EXAMPLES:
    # Prompt for email and password
    triage login

    # Scripted login
    echo \"$PASSWORD\" | triage login --email me@example.com --password-stdin"
    )]
    Login {
        /// Email address to log in with
        #[arg(long)]
        email: Option<String>,

        /// Read the password from the first line of stdin
        #[arg(long)]
        password_stdin: bool,
    },

    /// Clear the stored session
    Logout,

    /// Show whether a session is stored
    #[command(
        long_about = "Show whether a session is stored.\n\n\
            With --quiet, prints exactly 'authenticated' or 'not_authenticated'."
    )]
    Status,

    /// Refresh the access token now
    #[command(
        long_about = "Exchange the stored refresh token for a new access token.\n\n\
            If the server rejects the refresh token, or it has expired, the \
            session is cleared and you must log in again."
    )]
    Refresh,

    /// List call records
    Calls,

    /// Generate shell completion scripts
    #[command(
        after_help = "\
EXAMPLES:
    # Bash
    triage completion bash > ~/.local/share/bash-completion/completions/triage

    # Zsh
    triage completion zsh > \"${fpath[1]}/_triage\"

    # Fish
    triage completion fish > ~/.config/fish/completions/triage.fish"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["triage", "status", "--quiet", "--config", "/tmp/c.toml"])
            .unwrap();

        assert!(cli.quiet);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
        assert!(matches!(cli.command, Command::Status));
    }

    #[test]
    fn quiet_disables_interaction() {
        let cli = Cli::try_parse_from(["triage", "-q", "logout"]).unwrap();
        assert!(!cli.interactive());
    }

    #[test]
    fn explicit_interactive_wins() {
        let cli = Cli::try_parse_from(["triage", "--interactive", "-q", "logout"]).unwrap();
        assert!(cli.interactive());
    }

    #[test]
    fn interactive_flags_conflict() {
        let result = Cli::try_parse_from(["triage", "--interactive", "--no-interactive", "status"]);
        assert!(result.is_err());
    }

    #[test]
    fn login_flags() {
        let cli = Cli::try_parse_from([
            "triage",
            "login",
            "--email",
            "a@b.com",
            "--password-stdin",
        ])
        .unwrap();

        match cli.command {
            Command::Login {
                email,
                password_stdin,
            } => {
                assert_eq!(email.as_deref(), Some("a@b.com"));
                assert!(password_stdin);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
