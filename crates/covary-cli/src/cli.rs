use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "covary",
    about = "Covary: covariant array-store compatibility checks for value-class kinds",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the upcast-permission and store-outcome tables
    Tables {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decide one store into a fresh array of the standard universe
    Store {
        /// Actual array kind: identity, interface, value_class, primitive_value_class
        #[arg(long)]
        array: String,

        /// Actual value kind: null_ref or any array kind
        #[arg(long)]
        value: String,

        /// Declared array kind (defaults to the actual array kind)
        #[arg(long)]
        declared_array: Option<String>,

        /// Declared value kind (defaults to the actual value kind; identity for null)
        #[arg(long)]
        declared_value: Option<String>,

        /// Target slot
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        index: i64,

        /// Array length
        #[arg(long, default_value_t = 2)]
        length: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the exhaustive conformance sweep
    Conformance {
        /// Path to a TOML config (defaults to ./covary.toml when present)
        #[arg(long)]
        config: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check the structural invariants of both tables
    Validate {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
