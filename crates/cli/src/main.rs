//! `sci`: build and query SCI deployment manifests.

use clap::{Parser, Subcommand};
use eyre::{bail, eyre, WrapErr};
use sci_bindings::namehash;
use sci_constants::{
    DeploymentKey, KnownChains, NetworkConfig, SciDeployment, SignerConfig, ToolkitConfig,
};
use sci_deploy::manifest::{chain_dir, AggregatedManifest, DeploymentManifest};
use sci_ops::PublicList;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Directory holding `chain-<id>` deployment folders [env: SCI_DEPLOYMENTS_DIR]
    #[arg(long, global = true)]
    deployments_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Aggregate every chain's deployed addresses into one manifest
    Manifest {
        /// Write the manifest here instead of stdout
        #[arg(long, short)]
        out: Option<PathBuf>,
        /// Also exclude these chain ids
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<u64>,
        /// Keep chains excluded by default (the local chain)
        #[arg(long)]
        include_local: bool,
    },
    /// Look up a deployed address
    Address {
        /// Chain name or id
        #[arg(long, env = "SCI_CHAIN")]
        chain: String,
        /// Deployment key, e.g. `SciRegistry#SciRegistry`
        key: DeploymentKey,
        /// Use the published addresses instead of the deployments directory
        #[arg(long)]
        published: bool,
    },
    /// Show the network entry configured for a chain
    Network {
        /// Chain name or id
        #[arg(long, env = "SCI_CHAIN")]
        chain: KnownChains,
    },
    /// Print the domain hash of each name
    Hash {
        /// Domain names
        #[arg(required = true)]
        domains: Vec<String>,
    },
    /// Check a public list file and print its domain hashes
    CheckList {
        /// JSON file `{ domain: { address: [chainId] } }`
        file: PathBuf,
    },
}

fn parse_chain(chain: &str) -> eyre::Result<u64> {
    match chain.parse::<KnownChains>() {
        Ok(known) => Ok(known.chain_id()),
        Err(err) => chain.parse::<u64>().map_err(|_| eyre!(err)),
    }
}

fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ToolkitConfig::from_env().wrap_err("invalid SCI environment")?;
    if let Some(dir) = cli.deployments_dir {
        config.deployments_dir = dir;
    }
    debug!(?config, "running");

    match cli.command {
        Command::Manifest { out, exclude, include_local } => {
            if include_local {
                config.excluded_chains.clear();
            }
            config.excluded_chains.extend(exclude);
            let manifest =
                AggregatedManifest::build(&config.deployments_dir, &config.excluded_chains)?;
            match out {
                Some(path) => {
                    manifest.save(&path)?;
                    info!(chains = manifest.len(), path = %path.display(), "manifest written");
                }
                None => println!("{}", serde_json::to_string_pretty(&manifest)?),
            }
        }
        Command::Address { chain, key, published } => {
            let chain_id = parse_chain(&chain)?;
            let address = if published {
                KnownChains::from_chain_id(chain_id)
                    .and_then(SciDeployment::for_chain)
                    .and_then(|deployment| deployment.address_of(&key))
            } else {
                DeploymentManifest::load(&chain_dir(&config.deployments_dir, chain_id))?.get(&key)
            };
            match address {
                Some(address) => println!("{address}"),
                None => bail!("no {key} deployment on chain {chain_id}"),
            }
        }
        Command::Network { chain } => {
            let network = NetworkConfig::from_env(chain)?;
            let signer = match network.signer {
                SignerConfig::PrivateKey(_) => "private key".to_owned(),
                SignerConfig::WalletConnect { ref qr_code_url } => format!("walletconnect ({qr_code_url})"),
            };
            println!("{} ({})", network.chain, network.chain_id());
            println!("rpc:    {}", network.rpc_url);
            println!("signer: {signer}");
        }
        Command::Hash { domains } => {
            for domain in domains {
                println!("{}  {domain}", namehash(&domain));
            }
        }
        Command::CheckList { file } => {
            let list = PublicList::load(&file)?;
            for (domain, contracts) in list.iter() {
                println!("{}  {domain} ({} contracts)", namehash(domain), contracts.len());
            }
        }
    }
    Ok(())
}
