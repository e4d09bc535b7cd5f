//! Query Store - ask a tracker where to upload and what it knows.
//!
//! This example demonstrates:
//! - Building a `TcpPool` and a `Tracker` from configuration
//! - Picking an upload target, with or without a group
//! - Listing groups and their storage servers
//!
//! # Running
//!
//! ```text
//! RUST_LOG=fdfs_tracker=debug cargo run --example query_store -- 10.0.0.5:22122 group1
//! ```
//!
//! The tracker address defaults to `FDFS_TRACKER` or `127.0.0.1:22122`.

use std::time::Duration;

use fdfs_tracker::config::{PoolConfig, TrackerConfig};
use fdfs_tracker::transport::TcpPool;
use fdfs_tracker::Tracker;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = std::env::args().skip(1);
    let addr = args
        .next()
        .or_else(|| std::env::var("FDFS_TRACKER").ok())
        .unwrap_or_else(|| "127.0.0.1:22122".to_string());
    let group = args.next();

    let pool = TcpPool::new(
        addr,
        PoolConfig::default().with_connect_timeout(Duration::from_secs(3)),
    );
    let config = TrackerConfig::default().with_network_timeout(Duration::from_secs(10));
    let tracker = Tracker::with_config(pool, config);

    tracker.active_test().await?;

    let target = match &group {
        Some(group) => tracker.query_store_with_group_one(group).await?,
        None => tracker.query_store_without_group_one().await?,
    };
    println!("upload target: {}", serde_json::to_string_pretty(&target)?);

    for group in tracker.list_groups().await? {
        println!("group: {}", serde_json::to_string_pretty(&group)?);
        for server in tracker.list_servers(&group.name, None).await? {
            println!(
                "  {} {} {:?} {} MB free",
                server.id, server.ip_addr, server.status, server.free_mb
            );
        }
    }

    Ok(())
}
