use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    Serve {
        #[arg(short, long, default_value = "5000")]
        port: u16,

        /// Bind to 0.0.0.0 instead of 127.0.0.1, exposing the server on all network interfaces
        #[arg(long)]
        public: bool,
    },

    /// Run one natural-language product search and print the outcome
    Search { message: String },

    /// Bulk-create products from a JSON array
    Import { path: String },

    /// List the catalog
    Products,
}
