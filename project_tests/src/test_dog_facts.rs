//! # Dog Facts Live Data Test
//!
//! Loads facts from the public API through the full gateway stack, with
//! write-through into an in-memory cache, then reads them back from the cache.

use std::sync::Arc;

use lib_facts::{FactsConfig, GatewayConfiguration, LoggerLocal};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let logger = Arc::new(LoggerLocal::new("dog_facts_test".to_string(), None));
    let config = FactsConfig::default();
    let gateway = config.build_gateway(Arc::clone(&logger))?;

    println!("[*] Requesting {} facts from {}...", config.facts_count, config.base_url);

    match gateway.load(GatewayConfiguration::remote(config.facts_count, true)).await {
        Ok(facts) => {
            println!("\n[SUCCESS] {} facts received:", facts.len());
            println!("-----------------------------------------------");
            for fact in &facts {
                println!("{}", fact.text());
            }
            println!("-----------------------------------------------");

            let cached = gateway.load(GatewayConfiguration::cache(config.facts_count)).await?;
            println!("[INFO] Cache now holds {} facts", cached.len());
            assert_eq!(cached, facts, "cache does not match the fetched facts");
        }
        Err(e) => {
            eprintln!("\n[ERROR] Facts retrieval failed:");
            eprintln!(">>> {}", e);
            eprintln!("{}", serde_json::to_string_pretty(&e)?);
            std::process::exit(1);
        }
    }

    Ok(())
}
