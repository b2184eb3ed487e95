//! Command-line interface for deepblue.
//!
//! This module provides the CLI structure and subcommand definitions for
//! the `bluemate` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AnalyzeCommand, CalcCommand, CertCommand, ChatCommand, ConfigCommand, InventoryCommand,
    RestCommand, StatusCommand,
};

/// bluemate - shipboard compliance and inspection toolkit
///
/// Tracks spare parts, statutory certificates, and rest hours; computes
/// trim, slip, dew point, and time-zone estimates; and runs the hull rust
/// scan on decoded images.
#[derive(Debug, Parser)]
#[command(name = "bluemate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the spare-part inventory
    #[command(subcommand)]
    Inventory(InventoryCommand),

    /// Manage ship certificates
    #[command(subcommand)]
    Certs(CertCommand),

    /// Manage the rest-hour log
    #[command(subcommand)]
    Rest(RestCommand),

    /// Run a maritime calculator
    #[command(subcommand)]
    Calc(CalcCommand),

    /// Estimate rust coverage on a decoded image
    Analyze(AnalyzeCommand),

    /// Talk to the companion
    Chat(ChatCommand),

    /// Show record store status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
