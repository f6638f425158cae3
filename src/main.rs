//! DEX Short Book - Binary Entry Point
//!
//! Loads a small demo book through genesis import and walks it with both
//! pagination modes.

use dex_shortbook::genesis::{export_pair, import_genesis, GenesisPackage, GenesisState};
use dex_shortbook::types::{Allocation, BookRecord, OrderEntry, Price, TradingPair};
use dex_shortbook::{paginate, BookConfig, OrderBookStore, PageRequest, Result};

fn demo_genesis(pair: &TradingPair) -> GenesisState {
    let records = (1..=5)
        .map(|i| {
            let entry = OrderEntry::new(
                Price::from(i),
                Price::from(2 * i),
                vec![
                    Allocation::new("abc|c|", Price::from(i)),
                    Allocation::new("def|c|", Price::from(i)),
                ],
                pair,
            );
            BookRecord::new(entry)
        })
        .collect();
    GenesisState::new(records)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("===========================================");
    println!("  DEX Short Book");
    println!("===========================================");
    println!();

    let config = BookConfig::default();
    let pair = TradingPair::new("USDC", "ATOM")?;
    let mut store = OrderBookStore::from_config(&config);

    let package = GenesisPackage::new(demo_genesis(&pair))?;
    println!("Genesis checksum: {}", package.checksum);
    let loaded = import_genesis(&mut store, &package.into_state()?)?;
    println!("Imported {} records for {}", loaded, pair);
    println!();

    println!("Offset paging (limit 2):");
    let mut offset = 0;
    loop {
        let page = paginate(&store, &pair, &PageRequest::offset(offset, 2), &config)?;
        if page.records.is_empty() {
            break;
        }
        let prices: Vec<String> = page.records.iter().map(|r| r.price.to_string()).collect();
        println!("  offset {:>2}: [{}]", offset, prices.join(", "));
        offset += page.records.len() as u64;
    }
    println!();

    println!("Cursor paging (limit 2, with total):");
    let mut cursor = None;
    loop {
        let request = PageRequest::cursor(cursor.take(), 2).with_total();
        let page = paginate(&store, &pair, &request, &config)?;
        let prices: Vec<String> = page.records.iter().map(|r| r.price.to_string()).collect();
        println!("  [{}] total={:?}", prices.join(", "), page.total);
        match page.next_key {
            Some(key) => {
                println!("  next key: {}", key);
                cursor = Some(key);
            }
            None => break,
        }
    }
    println!();

    let exported = export_pair(&store, &pair)?;
    println!("Exported {} records", exported.len());
    println!("State root: {}", store.state_root_hex()?);
    Ok(())
}
