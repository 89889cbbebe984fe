/// Cluster lifecycle walkthrough against the Armada container service
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use futures::future::join_all;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stevedore::{Config, ContainerServiceClient, TenantTarget};
use stevedore::containers::models::{ClusterCreateRequest, WorkerAction};

#[derive(Parser)]
#[command(name = "cluster")]
#[command(about = "Manage Armada Kubernetes clusters", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Region the clusters live in
    #[arg(short, long, default_value = "us-south")]
    region: String,

    /// Explicit API endpoint, overriding the regional default
    #[arg(long)]
    endpoint: Option<String>,

    /// Organization ID for the tenant context
    #[arg(long, default_value = "")]
    org: String,

    /// Space ID for the tenant context
    #[arg(long, default_value = "")]
    space: String,

    /// Account ID for the tenant context
    #[arg(long, default_value = "")]
    account: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List clusters in the tenant context
    List,

    /// Show a single cluster
    Find {
        /// Cluster name or ID
        name: String,
    },

    /// Order a new cluster
    Create {
        /// Cluster name
        name: String,

        /// Datacenter to place the workers in
        #[arg(long, default_value = "dal10")]
        datacenter: String,

        /// Worker machine type
        #[arg(long, default_value = "u2c.2x4")]
        machine_type: String,

        /// Number of workers
        #[arg(long, default_value_t = 1)]
        workers: u32,
    },

    /// Delete a cluster
    Delete {
        /// Cluster name or ID
        name: String,
    },

    /// List the workers of every cluster
    Overview,

    /// Reboot a worker
    Reboot {
        /// Cluster name or ID
        cluster: String,
        /// Worker ID
        worker: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("stevedore={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run(&cli).await {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let mut config = Config::new()
        .with_region(&cli.region)
        .with_access_token(
            std::env::var("STEVEDORE_ACCESS_TOKEN")
                .context("STEVEDORE_ACCESS_TOKEN is not set")?,
        )
        .with_refresh_token(std::env::var("STEVEDORE_REFRESH_TOKEN").unwrap_or_default());
    if let Some(endpoint) = &cli.endpoint {
        config = config.with_endpoint(endpoint);
    }

    let client = ContainerServiceClient::new(&config)?;
    let target = TenantTarget {
        org_id: cli.org.clone(),
        space_id: cli.space.clone(),
        account_id: cli.account.clone(),
    };

    match &cli.command {
        Commands::List => {
            let clusters = client.clusters().list(&target).await?;
            if clusters.is_empty() {
                info!("No clusters found in region {}", cli.region);
                return Ok(());
            }
            for cluster in clusters {
                info!(
                    "{} (ID: {}, State: {}, Workers: {}, Version: {})",
                    cluster.name,
                    cluster.id,
                    cluster.state,
                    cluster.worker_count,
                    cluster.master_kube_version
                );
            }
        }
        Commands::Find { name } => {
            let cluster = client.clusters().find(name, &target).await?;
            info!("Name: {}", cluster.name);
            info!("ID: {}", cluster.id);
            info!("State: {}", cluster.state);
            info!("Datacenter: {}", cluster.data_center);
            info!("Master URL: {}", cluster.server_url);
            info!("Ingress: {}", cluster.ingress_hostname);
        }
        Commands::Create {
            name,
            datacenter,
            machine_type,
            workers,
        } => {
            let params = ClusterCreateRequest {
                name: name.clone(),
                datacenter: datacenter.clone(),
                machine_type: machine_type.clone(),
                worker_num: *workers,
                billing: "hourly".to_string(),
                isolation: "public".to_string(),
                ..Default::default()
            };
            let response = client.clusters().create(&params, &target).await?;
            info!("✓ Cluster ordered (ID: {})", response.id);
        }
        Commands::Delete { name } => {
            client.clusters().delete(name, &target).await?;
            info!("✓ Cluster {} deleted", name);
        }
        Commands::Overview => {
            let clusters = client.clusters().list(&target).await?;
            let workers_api = client.workers();
            let lookups = clusters
                .iter()
                .map(|cluster| workers_api.list(&cluster.id, &target));
            let results = join_all(lookups).await;

            for (cluster, workers) in clusters.iter().zip(results) {
                match workers {
                    Ok(workers) => {
                        info!("{} ({} workers):", cluster.name, workers.len());
                        for worker in workers {
                            info!(
                                "  - {} (State: {}, Public IP: {}, Private IP: {})",
                                worker.id, worker.state, worker.public_ip, worker.private_ip
                            );
                        }
                    }
                    Err(e) => info!("{}: could not list workers: {}", cluster.name, e),
                }
            }
        }
        Commands::Reboot { cluster, worker } => {
            client
                .workers()
                .update(cluster, worker, WorkerAction::Reboot, &target)
                .await?;
            info!("✓ Reboot requested for worker {}", worker);
        }
    }

    Ok(())
}
