//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Spare-part inventory commands.
#[derive(Debug, Subcommand)]
pub enum InventoryCommand {
    /// List inventory items with stock levels
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Add a new spare part
    Add {
        /// Display name of the part
        name: String,

        /// Units currently on board
        #[arg(short, long, default_value = "0")]
        stock: u32,

        /// Storage capacity for this part
        #[arg(short, long, default_value = "10")]
        max_stock: u32,
    },

    /// Take units out of stock
    Take {
        /// Item identifier
        id: String,

        /// Number of units to take
        #[arg(short = 'n', long, default_value = "1")]
        count: u32,
    },

    /// Put units back into stock
    Put {
        /// Item identifier
        id: String,

        /// Number of units to put back
        #[arg(short = 'n', long, default_value = "1")]
        count: u32,
    },
}

/// Ship certificate commands.
#[derive(Debug, Subcommand)]
pub enum CertCommand {
    /// List certificates with expiry status
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Add a certificate
    Add {
        /// Display name of the certificate
        name: String,

        /// Expiry date (YYYY-MM-DD)
        expires: String,
    },
}

/// Rest-hour log commands.
#[derive(Debug, Subcommand)]
pub enum RestCommand {
    /// Show the 24-hour rest log and compliance state
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Toggle one hour slot between duty and rest
    Toggle {
        /// Hour of day (0-23)
        hour: usize,
    },
}

/// Maritime calculator commands.
#[derive(Debug, Subcommand)]
pub enum CalcCommand {
    /// Vessel trim from fore and aft drafts
    Trim {
        /// Fore draft in meters
        fore: f64,

        /// Aft draft in meters
        aft: f64,
    },

    /// Propeller slip from RPM, pitch, and observed speed
    Slip {
        /// Shaft revolutions per minute
        rpm: f64,

        /// Propeller pitch in meters
        pitch: f64,

        /// Observed speed in knots
        speed: f64,
    },

    /// Dew point estimate and ventilation call
    Dew {
        /// Air temperature in degrees Celsius
        temp: f64,

        /// Relative humidity in percent (10-100)
        humidity: f64,
    },

    /// UTC offset estimate for a longitude
    Timezone {
        /// Longitude in degrees (-180..180)
        longitude: f64,
    },
}

/// Analyze command arguments.
#[derive(Debug, Args)]
pub struct AnalyzeCommand {
    /// Path to a raw RGBA pixel dump (4 bytes per pixel)
    pub file: PathBuf,

    /// Image width in pixels
    #[arg(long)]
    pub width: u32,

    /// Image height in pixels
    #[arg(long)]
    pub height: u32,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Chat command arguments.
#[derive(Debug, Args)]
pub struct ChatCommand {
    /// Message for the companion
    pub message: String,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inventory_command_debug() {
        let cmd = InventoryCommand::Add {
            name: "Gasket".to_string(),
            stock: 2,
            max_stock: 5,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Add"));
        assert!(debug_str.contains("Gasket"));
    }

    #[test]
    fn test_calc_command_debug() {
        let cmd = CalcCommand::Slip {
            rpm: 95.0,
            pitch: 6.8,
            speed: 15.2,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Slip"));
    }

    #[test]
    fn test_analyze_command_debug() {
        let cmd = AnalyzeCommand {
            file: PathBuf::from("hull.rgba"),
            width: 200,
            height: 150,
            json: false,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("hull.rgba"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: true };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
