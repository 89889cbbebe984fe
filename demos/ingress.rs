/// Ingress secret and secrets-manager instance walkthrough
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stevedore::containers::models::{
    InstanceDeleteConfig, InstanceRegisterConfig, SecretCreateConfig, SecretDeleteConfig,
};
use stevedore::{Config, ContainerServiceClient, Service};

#[derive(Parser)]
#[command(name = "ingress")]
#[command(about = "Drive ingress secrets on an Armada cluster", long_about = None)]
struct Cli {
    /// Cluster name or ID
    #[arg(long)]
    cluster: String,

    /// CRN of a certificate to create a TLS secret from
    #[arg(long)]
    cert_crn: Option<String>,

    /// CRN of a secrets-manager instance to register
    #[arg(long)]
    instance_crn: Option<String>,

    /// Region the cluster lives in
    #[arg(short, long, default_value = "us-south")]
    region: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stevedore=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run(&cli).await {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let config = Config::new()
        .with_region(&cli.region)
        .with_access_token(
            std::env::var("STEVEDORE_ACCESS_TOKEN")
                .context("STEVEDORE_ACCESS_TOKEN is not set")?,
        )
        .with_refresh_token(std::env::var("STEVEDORE_REFRESH_TOKEN").unwrap_or_default());
    let client = ContainerServiceClient::with_service(&config, Service::VpcContainers)?;
    let ingress = client.ingress();

    if let Some(crn) = &cli.instance_crn {
        let registered = ingress
            .register_instance(&InstanceRegisterConfig {
                cluster: cli.cluster.clone(),
                crn: crn.clone(),
                ..Default::default()
            })
            .await?;
        info!("Registered instance {}", registered.name);

        let fetched = ingress.get_instance(&cli.cluster, &registered.name).await?;
        info!("Instance status: {}", fetched.status);

        ingress
            .delete_instance(&InstanceDeleteConfig {
                cluster: cli.cluster.clone(),
                name: registered.name,
            })
            .await?;
        info!("✓ Instance deregistered");
    }

    if let Some(crn) = &cli.cert_crn {
        let secret = ingress
            .create_secret(&SecretCreateConfig {
                cluster: cli.cluster.clone(),
                name: "stevedore-demo-secret".to_string(),
                crn: crn.clone(),
                persistence: true,
                ..Default::default()
            })
            .await?;
        info!("Created secret in namespace {}", secret.namespace);

        let fetched = ingress
            .get_secret(&cli.cluster, &secret.name, &secret.namespace)
            .await?;
        info!("Secret status: {}", fetched.status);

        ingress
            .delete_secret(&SecretDeleteConfig {
                cluster: cli.cluster.clone(),
                name: secret.name,
                namespace: secret.namespace,
            })
            .await?;
        info!("✓ Secret deleted");
    }

    Ok(())
}
