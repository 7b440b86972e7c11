//! MintGate CLI - allowlist proofs and minting from the command line
//!
//! This tool provides commands for:
//! - Building the allowlist Merkle tree and publishing its root
//! - Generating and verifying membership proofs
//! - Reading live contract state through the mint relay
//! - Running a full mint attempt

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mintgate_allowlist::{verify, AllowlistHandle, AllowlistSource, AllowlistTree, MembershipProof};
use mintgate_client::{ContractGateway, GatewayConfig, HttpContractGateway};
use mintgate_orchestrator::{MintOrchestrator, MintOutcome};
use mintgate_primitives::{Address, Hash256};

mod config;

use config::MintgateConfig;

/// MintGate - allowlist proofs and mint orchestration
#[derive(Parser)]
#[command(name = "mintgate")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build allowlist proofs and drive mints against the contract relay", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true, env = "MINTGATE_CONFIG")]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Overrides for the `[gateway]` config section
#[derive(Args, Debug, Default)]
struct GatewayArgs {
    /// Mint relay base URL
    #[arg(long, env = "MINTGATE_RELAY_URL")]
    relay_url: Option<String>,

    /// Mint relay API key
    #[arg(long, env = "MINTGATE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Mint contract address
    #[arg(long, env = "MINTGATE_CONTRACT")]
    contract: Option<String>,

    /// Chain ID
    #[arg(long)]
    chain_id: Option<u64>,
}

impl GatewayArgs {
    fn apply(self, config: &mut GatewayConfig) {
        if let Some(url) = self.relay_url {
            config.base_url = url;
        }
        if let Some(key) = self.api_key {
            config.api_key = Some(key);
        }
        if let Some(contract) = self.contract {
            config.contract_address = contract;
        }
        if let Some(chain_id) = self.chain_id {
            config.chain_id = chain_id;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build the allowlist tree and print its root
    #[command(name = "build-tree")]
    BuildTree {
        /// Allowlist file (one address per line)
        #[arg(short, long)]
        allowlist: Option<PathBuf>,

        /// Write the leaf set and root as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate a membership proof for an address
    Prove {
        /// Address to prove
        address: String,

        /// Allowlist file (one address per line)
        #[arg(short, long)]
        allowlist: Option<PathBuf>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Verify a membership proof against a root
    Verify {
        /// Address the proof is for
        address: String,

        /// Path to the proof JSON produced by `prove`
        #[arg(short = 'f', long)]
        proof: PathBuf,

        /// Expected root (default: the root recorded in the proof file)
        #[arg(short, long)]
        root: Option<String>,
    },

    /// Check whether an address is on the allowlist
    Check {
        /// Address to check
        address: String,

        /// Allowlist file (one address per line)
        #[arg(short, long)]
        allowlist: Option<PathBuf>,
    },

    /// Show live contract state
    Status {
        #[command(flatten)]
        gateway: GatewayArgs,
    },

    /// Mint tokens for a wallet
    Mint {
        /// Wallet address
        address: String,

        /// Number of tokens to mint
        #[arg(short = 'n', long, default_value = "1", allow_negative_numbers = true)]
        quantity: i64,

        /// Allowlist file (one address per line)
        #[arg(short, long)]
        allowlist: Option<PathBuf>,

        #[command(flatten)]
        gateway: GatewayArgs,
    },
}

/// Proof file written by `prove`
#[derive(serde::Serialize, serde::Deserialize)]
struct ProofFile {
    address: Address,
    leaf: Hash256,
    root: Hash256,
    proof: MembershipProof,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = MintgateConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::BuildTree { allowlist, output } => {
            build_tree(&load_allowlist(allowlist, &config)?, output)
        }

        Commands::Prove {
            address,
            allowlist,
            output,
        } => prove(&load_allowlist(allowlist, &config)?, &address, output),

        Commands::Verify {
            address,
            proof,
            root,
        } => verify_proof(&address, &proof, root.as_deref()),

        Commands::Check { address, allowlist } => {
            check(&load_allowlist(allowlist, &config)?, &address)
        }

        Commands::Status { gateway } => {
            let mut gateway_config = config.gateway;
            gateway.apply(&mut gateway_config);
            runtime()?.block_on(status(gateway_config))
        }

        Commands::Mint {
            address,
            quantity,
            allowlist,
            gateway,
        } => {
            let tree = load_allowlist(allowlist, &config)?;
            let mut gateway_config = config.gateway;
            gateway.apply(&mut gateway_config);
            let orchestrator = MintOrchestrator::new(
                HttpContractGateway::try_new(gateway_config)?,
                AllowlistHandle::new(tree),
                config.orchestrator,
            );
            runtime()?.block_on(mint(&orchestrator, &address, quantity))
        }
    }
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
}

fn load_allowlist(path: Option<PathBuf>, config: &MintgateConfig) -> Result<AllowlistTree> {
    let path = path
        .or_else(|| config.allowlist.clone())
        .context("No allowlist given (use --allowlist or set `allowlist` in the config)")?;
    let source = AllowlistSource::from_file(&path)
        .with_context(|| format!("Failed to load allowlist: {}", path.display()))?;
    eprintln!("Loaded {} addresses from {}", source.len(), path.display());
    Ok(source.build_tree())
}

fn parse_address(s: &str) -> Result<Address> {
    Address::parse(s).with_context(|| format!("Invalid address: {s}"))
}

fn write_or_print(output: Option<&Path>, contents: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, contents)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            eprintln!("Written to: {}", path.display());
        }
        None => println!("{}", contents),
    }
    Ok(())
}

fn build_tree(tree: &AllowlistTree, output: Option<PathBuf>) -> Result<ExitCode> {
    eprintln!("Distinct leaves: {}", tree.len());
    eprintln!("Depth: {}", tree.depth());

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&tree.export())?;
        write_or_print(Some(&path), &json)?;
    }
    println!("{}", tree.root());
    Ok(ExitCode::SUCCESS)
}

fn prove(tree: &AllowlistTree, address: &str, output: Option<PathBuf>) -> Result<ExitCode> {
    let address = parse_address(address)?;
    let proof = tree
        .prove_membership(&address)
        .with_context(|| format!("Cannot prove membership of {address}"))?;

    let file = ProofFile {
        address,
        leaf: address.leaf_hash(),
        root: tree.root(),
        proof,
    };
    eprintln!("Proof length: {} nodes", file.proof.len());
    write_or_print(output.as_deref(), &serde_json::to_string_pretty(&file)?)?;
    Ok(ExitCode::SUCCESS)
}

fn verify_proof(address: &str, proof_path: &Path, root: Option<&str>) -> Result<ExitCode> {
    let address = parse_address(address)?;
    let contents = fs::read_to_string(proof_path)
        .with_context(|| format!("Failed to read proof file: {}", proof_path.display()))?;
    let file: ProofFile =
        serde_json::from_str(&contents).context("Failed to parse proof JSON")?;

    let root = match root {
        Some(hex) => Hash256::from_hex(hex).context("Invalid root")?,
        None => file.root,
    };

    if verify(&file.proof, &address, &root) {
        println!("VALID: {} is in the allowlist with root {}", address, root);
        Ok(ExitCode::SUCCESS)
    } else {
        println!("INVALID: proof does not place {} under root {}", address, root);
        Ok(ExitCode::FAILURE)
    }
}

fn check(tree: &AllowlistTree, address: &str) -> Result<ExitCode> {
    let address = parse_address(address)?;
    let handle = AllowlistHandle::new(tree.clone());
    if handle.is_member(&address) {
        println!("{} is on the allowlist (whitelist price)", address);
    } else {
        println!("{} is not on the allowlist (public price)", address);
    }
    Ok(ExitCode::SUCCESS)
}

async fn status(config: GatewayConfig) -> Result<ExitCode> {
    let gateway = HttpContractGateway::try_new(config)?;
    let state = gateway
        .read_state()
        .await
        .context("Failed to fetch contract state")?;

    println!("Minted:           {} / {}", state.current_supply, state.total_supply);
    println!("Whitelist price:  {}", state.whitelist_price);
    println!("Public price:     {}", state.public_price);
    println!("Max per wallet:   {}", state.max_mint_per_wallet);
    println!("Base URI:         {}", state.base_uri);
    Ok(ExitCode::SUCCESS)
}

async fn mint<G: ContractGateway>(
    orchestrator: &MintOrchestrator<G>,
    address: &str,
    quantity: i64,
) -> Result<ExitCode> {
    let address = parse_address(address)?;

    match orchestrator.request_mint(address, quantity).await {
        MintOutcome::Settled(settlement) => {
            println!(
                "Minted {} ({} lane, paid {}) in tx {} at block {}",
                settlement.request.quantity,
                settlement.request.lane,
                settlement.request.cost,
                settlement.receipt.tx_hash,
                settlement.receipt.block_number
            );
            println!(
                "Minted: {} / {}",
                settlement.snapshot.current_supply, settlement.snapshot.total_supply
            );
            Ok(ExitCode::SUCCESS)
        }
        MintOutcome::Failed(failure) => {
            eprintln!("Mint failed: {}", failure);
            match failure.retry_safety() {
                mintgate_orchestrator::RetrySafety::NothingSubmitted => {
                    eprintln!("No transaction was sent; it is safe to try again.")
                }
                mintgate_orchestrator::RetrySafety::Submitted => {
                    if let Some(tx) = failure.tx_hash() {
                        eprintln!("Transaction {} was sent.", tx);
                    }
                    eprintln!("Check the contract before retrying to avoid minting twice.")
                }
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
