//! Command-line client.
//!
//! One-shot commands for scripting, sequential batch drivers for simple
//! benchmarks, and an interactive REPL for manual poking:
//!
//! ```text
//! kv-cli <addr> put <key> <value>
//! kv-cli <addr> get <key>
//! kv-cli <addr> batch_put <key_prefix> <value> <count>
//! kv-cli <addr> batch_get <key> <count>
//! kv-cli <addr>
//! ```
//!
//! Exits 0 on success, 1 on an RPC failure or a rejected write.

use std::io::{BufRead, Write};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;

use kv_cluster::node::protocol::{
    GetRequest, GetResponse, PutRequest, PutResponse, ENDPOINT_GET, ENDPOINT_PUT,
};

struct KvClient {
    http: reqwest::Client,
    base_url: String,
}

impl KvClient {
    fn connect(address: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()?;
        Ok(Self {
            http,
            base_url: format!("http://{}", address),
        })
    }

    async fn put(&self, key: &str, value: &str) -> Result<PutResponse> {
        let request = PutRequest {
            key: key.to_string(),
            value: value.to_string(),
            is_internal: false,
            version: None,
        };
        let response = self
            .http
            .post(format!("{}{}", self.base_url, ENDPOINT_PUT))
            .json(&request)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn get(&self, key: &str) -> Result<GetResponse> {
        let request = GetRequest {
            key: key.to_string(),
            is_internal: false,
        };
        let response = self
            .http
            .post(format!("{}{}", self.base_url, ENDPOINT_GET))
            .json(&request)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}

async fn run_put(client: &KvClient, key: &str, value: &str) -> ExitCode {
    match client.put(key, value).await {
        Err(_) => {
            eprintln!("PUT RPC failed");
            ExitCode::from(1)
        }
        Ok(response) if !response.success => {
            eprintln!("PUT rejected (acks < W)");
            ExitCode::from(1)
        }
        Ok(_) => {
            println!("PUT ok");
            ExitCode::SUCCESS
        }
    }
}

async fn run_get(client: &KvClient, key: &str) -> ExitCode {
    match client.get(key).await {
        Err(_) => {
            eprintln!("GET RPC failed");
            ExitCode::from(1)
        }
        Ok(response) if !response.found => {
            println!("Key not found");
            ExitCode::SUCCESS
        }
        Ok(response) => {
            println!("Got value: {}", response.value);
            ExitCode::SUCCESS
        }
    }
}

// Sequential batch PUTs used by simple benchmark drivers.
async fn run_batch_put(client: &KvClient, key_prefix: &str, value: &str, count: usize) -> ExitCode {
    for i in 0..count {
        let key = format!("{}_{}", key_prefix, i);
        match client.put(&key, value).await {
            Ok(response) if response.success => {}
            _ => {
                eprintln!("batch_put failed at i={}", i);
                return ExitCode::from(1);
            }
        }
    }
    ExitCode::SUCCESS
}

// Sequential batch GETs used by simple benchmark drivers.
async fn run_batch_get(client: &KvClient, key: &str, count: usize) -> ExitCode {
    for i in 0..count {
        if client.get(key).await.is_err() {
            eprintln!("batch_get failed at i={}", i);
            return ExitCode::from(1);
        }
    }
    ExitCode::SUCCESS
}

// Interactive loop for manual testing and ad-hoc commands.
async fn run_repl(client: &KvClient) -> ExitCode {
    let stdin = std::io::stdin();
    let mut line = String::new();

    loop {
        print!("kv> ");
        let _ = std::io::stdout().flush();

        line.clear();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        let mut parts = line.split_whitespace();
        let Some(cmd) = parts.next() else {
            continue;
        };

        match cmd {
            "exit" | "quit" => break,
            "put" => {
                let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
                    println!("Usage: put <key> <value>");
                    continue;
                };
                match client.put(key, value).await {
                    Err(_) => println!("PUT RPC failed"),
                    Ok(response) if !response.success => println!("PUT rejected (acks < W)"),
                    Ok(_) => println!("PUT ok"),
                }
            }
            "get" => {
                let Some(key) = parts.next() else {
                    println!("Usage: get <key>");
                    continue;
                };
                match client.get(key).await {
                    Err(_) => println!("GET RPC failed"),
                    Ok(response) if !response.found => println!("Key not found"),
                    Ok(response) => println!("{}", response.value),
                }
            }
            _ => println!("Unknown command"),
        }
    }

    ExitCode::SUCCESS
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  kv-cli <addr> put <key> <value>");
    eprintln!("  kv-cli <addr> get <key>");
    eprintln!("  kv-cli <addr> batch_put <key_prefix> <value> <count>");
    eprintln!("  kv-cli <addr> batch_get <key> <count>");
    eprintln!("  kv-cli <addr>");
}

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    let client = match KvClient::connect(&args[1]) {
        Ok(client) => client,
        Err(error) => {
            eprintln!("failed to build client: {}", error);
            return ExitCode::from(1);
        }
    };

    // REPL mode
    if args.len() == 2 {
        return run_repl(&client).await;
    }

    match args[2].as_str() {
        "put" => {
            let (Some(key), Some(value)) = (args.get(3), args.get(4)) else {
                eprintln!("put requires <key> <value>");
                return ExitCode::from(1);
            };
            run_put(&client, key, value).await
        }
        "get" => {
            let Some(key) = args.get(3) else {
                eprintln!("get requires <key>");
                return ExitCode::from(1);
            };
            run_get(&client, key).await
        }
        "batch_put" => {
            let (Some(prefix), Some(value), Some(count)) = (args.get(3), args.get(4), args.get(5))
            else {
                eprintln!("batch_put requires <key_prefix> <value> <count>");
                return ExitCode::from(1);
            };
            let Ok(count) = count.parse::<usize>() else {
                eprintln!("count must be a non-negative integer");
                return ExitCode::from(1);
            };
            run_batch_put(&client, prefix, value, count).await
        }
        "batch_get" => {
            let (Some(key), Some(count)) = (args.get(3), args.get(4)) else {
                eprintln!("batch_get requires <key> <count>");
                return ExitCode::from(1);
            };
            let Ok(count) = count.parse::<usize>() else {
                eprintln!("count must be a non-negative integer");
                return ExitCode::from(1);
            };
            run_batch_get(&client, key, count).await
        }
        other => {
            eprintln!("Unknown command: {}", other);
            ExitCode::from(1)
        }
    }
}
