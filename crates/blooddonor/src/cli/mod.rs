//! Command-line interface for blooddonor.
//!
//! This module provides the CLI structure for the `bdreg` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AdminCommand, ConfigCommand, LoginCommand, OrganizeCommand, OutputFormat, RegisterCommand,
    RequestCommand, SearchCommand, SignupCommand, WhoamiCommand,
};

use crate::logging::Verbosity;

/// bdreg - Local blood donor registry
///
/// Register donors, find them by blood group and city, reach them by email,
/// and run blood camp requests past an admin.
#[derive(Debug, Parser)]
#[command(name = "bdreg")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use a throwaway in-memory registry instead of the database
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register as a donor (or update your registration)
    Register(RegisterCommand),

    /// Find donors by blood group and city
    Search(SearchCommand),

    /// Email every matching donor about an urgent need
    Request(RequestCommand),

    /// Ask an admin to approve a blood camp
    Organize(OrganizeCommand),

    /// Create an account and log in
    Signup(SignupCommand),

    /// Log in
    Login(LoginCommand),

    /// Log out
    Logout,

    /// Show the logged-in user
    Whoami(WhoamiCommand),

    /// List the blood groups
    Groups,

    /// Review camp requests (admins only)
    #[command(subcommand)]
    Admin(AdminCommand),

    /// View configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Trace,
            }
        }
    }
}
