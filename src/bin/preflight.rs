use authenticity_engine::infra::artifact_source::load_artifact;
use authenticity_engine::infra::evm::JsonRpcLedgerReader;
use authenticity_engine::infra::telemetry;
use authenticity_engine::{AuthenticityService, Settings};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight\n\
         \n\
         Reads the same env vars as api_server:\n\
           RPC_URL, CONTRACT_ADDRESS or CONTRACT_ARTIFACT, NETWORK_ID,\n\
           ALLOW_DEV_NETWORK_FALLBACK, DATABASE_URL or CODES_FILE\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    let settings = Settings::from_env()?;
    println!("> Preflight:");
    println!("  RPC_URL={}", settings.rpc_url);
    println!("  CONTRACT_ARTIFACT={}", settings.contract_artifact.display());
    if let Some(dev) = settings.dev_network_fallback {
        println!("  Development fallback network ENABLED: {}", dev);
    }

    // Basic RPC connectivity
    let reader = JsonRpcLedgerReader::new(settings.rpc_url.clone(), settings.ledger_timeout)?;
    let chain_id = reader.chain_id().await?;
    println!("  Node chain id: {}", chain_id);
    if let Some(configured) = settings.network_id {
        if configured != chain_id {
            eprintln!("  Warning: NETWORK_ID={} but node reports {}.", configured, chain_id);
        }
    }

    // Contract resolution + deployed code
    let artifact = load_artifact(&settings.contract_artifact).await?;
    let contract = AuthenticityService::resolve_contract(&settings, artifact.as_ref(), &reader).await?;
    println!("  Contract address: {}", contract);
    let code = reader.get_code(contract).await?;
    if code.is_empty() {
        return Err(anyhow::anyhow!(
            "No contract code at {} on {}. Deploy the contract or fix CONTRACT_ADDRESS.",
            contract,
            settings.rpc_url
        ));
    }
    println!("  Contract code present ({} bytes).", code.len());

    // Code store
    let store = AuthenticityService::open_store(&settings).await?;
    store.ping().await?;
    println!("  Short-code store reachable.");

    println!("> Preflight OK.");
    Ok(())
}
