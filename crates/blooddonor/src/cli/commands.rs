//! CLI command definitions.
//!
//! One subcommand per registry page.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Donor registration arguments.
#[derive(Debug, Args)]
pub struct RegisterCommand {
    /// Donor name
    #[arg(long)]
    pub name: String,

    /// Blood group (A+, A-, B+, B-, AB+, AB-, O+, O-)
    #[arg(short, long)]
    pub group: String,

    /// Donor email; registering the same email again updates the record
    #[arg(short, long)]
    pub email: String,

    /// Contact number
    #[arg(long)]
    pub contact: String,

    /// City
    #[arg(long)]
    pub city: String,
}

/// Donor search arguments.
#[derive(Debug, Args)]
pub struct SearchCommand {
    /// Blood group to match
    #[arg(short, long)]
    pub group: String,

    /// City to match
    #[arg(long)]
    pub city: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Urgent blood request arguments.
#[derive(Debug, Args)]
pub struct RequestCommand {
    /// Your name
    #[arg(long)]
    pub name: String,

    /// Needed blood group
    #[arg(short, long)]
    pub group: String,

    /// Your email; donors reply here
    #[arg(short, long)]
    pub email: String,

    /// Your contact number
    #[arg(long)]
    pub contact: String,

    /// City the blood is needed in
    #[arg(long)]
    pub city: String,
}

/// Camp request arguments.
#[derive(Debug, Args)]
pub struct OrganizeCommand {
    /// Event name
    #[arg(long)]
    pub event: String,

    /// Proposed date (e.g. 2024-05-01)
    #[arg(long)]
    pub date: String,

    /// City
    #[arg(long)]
    pub city: String,
}

/// Signup arguments.
#[derive(Debug, Args)]
pub struct SignupCommand {
    /// Display name
    #[arg(short, long)]
    pub username: String,

    /// Login email
    #[arg(short, long)]
    pub email: String,

    /// Password
    #[arg(short, long)]
    pub password: String,
}

/// Login arguments.
#[derive(Debug, Args)]
pub struct LoginCommand {
    /// Login email
    #[arg(short, long)]
    pub email: String,

    /// Password
    #[arg(short, long)]
    pub password: String,
}

/// Profile arguments.
#[derive(Debug, Args)]
pub struct WhoamiCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Admin commands.
#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// List camp requests awaiting a decision
    Pending {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// List decided camp requests
    History {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Approve a camp request
    Approve {
        /// Camp request id
        id: String,

        /// Note to attach to the decision
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Decline a camp request
    Decline {
        /// Camp request id
        id: String,

        /// Note to attach to the decision
        #[arg(short, long)]
        note: Option<String>,
    },
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Aligned table
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_admin_command_debug() {
        let cmd = AdminCommand::Approve {
            id: "abc".to_string(),
            note: None,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Approve"));
        assert!(debug_str.contains("abc"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        assert!(format!("{cmd:?}").contains("Show"));
    }
}
