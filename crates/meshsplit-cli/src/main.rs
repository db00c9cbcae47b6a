use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "meshsplit",
    about = "meshsplit — canary traffic splits and analysis queries",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a scaffold meshsplit.toml
    Init {
        /// Directory to write meshsplit.toml into
        #[arg(short, long, default_value = ".")]
        path: String,
        /// Workload name
        #[arg(short, long)]
        name: String,
        /// Workload namespace
        #[arg(long, default_value = "default")]
        namespace: String,
    },
    /// Reconcile the configured target against an in-memory control plane
    /// and print the resulting config entries.
    Plan {
        #[arg(short, long, default_value = "meshsplit.toml")]
        config: String,
        /// Datacenters reported by the catalog, local first (comma separated)
        #[arg(long, value_delimiter = ',')]
        datacenters: Vec<String>,
        /// Primary weight to apply after reconciling
        #[arg(long)]
        primary: Option<u32>,
        /// Canary weight to apply after reconciling
        #[arg(long)]
        canary: Option<u32>,
    },
    /// Print the rendered analysis query for a metric
    Query {
        #[arg(short, long, default_value = "meshsplit.toml")]
        config: String,
        /// Metric kind: request-success-rate or request-duration
        metric: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("meshsplit=info".parse()?)
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            path,
            name,
            namespace,
        } => commands::init::init(&path, &name, &namespace),
        Commands::Plan {
            config,
            datacenters,
            primary,
            canary,
        } => {
            let weights = match (primary, canary) {
                (None, None) => None,
                (p, c) => Some((p.unwrap_or(0), c.unwrap_or(0))),
            };
            commands::plan::plan(&config, &datacenters, weights)
        }
        Commands::Query { config, metric } => commands::query::query(&config, &metric),
    }
}
