use clap::{Parser, Subcommand};

/// Command-line interface definition for geoattend
/// CLI client to check in and out of facility assets inside their geofence
#[derive(Parser)]
#[command(
    name = "geoattend",
    version = env!("CARGO_PKG_VERSION"),
    about = "Geofenced attendance: find the asset you are at, then check in or out",
    long_about = None
)]
pub struct Cli {
    /// Override the local store path (useful for tests or a custom location)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Override the backend base URL
    #[arg(global = true, long = "api")]
    pub api: Option<String>,

    /// Current latitude in decimal degrees
    #[arg(global = true, long = "lat", allow_negative_numbers = true, requires = "lon")]
    pub lat: Option<f64>,

    /// Current longitude in decimal degrees
    #[arg(global = true, long = "lon", allow_negative_numbers = true, requires = "lat")]
    pub lon: Option<f64>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the configuration file and local store
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// List assets with their resolved coordinates and distance from you
    Assets,

    /// Find the asset you are at and show today's attendance for it
    Nearby,

    /// Show today's attendance status
    Status {
        #[arg(long = "asset", help = "Asset id (default: the asset you are at)")]
        asset: Option<String>,
    },

    /// Check in at an asset
    Checkin {
        #[arg(long = "asset", help = "Asset id (default: the asset you are at)")]
        asset: Option<String>,
    },

    /// Check out of an asset
    Checkout {
        #[arg(long = "asset", help = "Asset id (default: the asset you are at)")]
        asset: Option<String>,
    },

    /// Show this week's attendance records for an asset
    History {
        #[arg(long = "asset", help = "Asset id (default: the asset you are at)")]
        asset: Option<String>,
    },

    /// Show the last attendance action recorded on this machine
    Last {
        #[arg(long = "clear", help = "Forget the cached last action")]
        clear: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "limit", default_value_t = 20, help = "Number of rows to show")]
        limit: usize,
    },
}
