use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use url::Url;

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Command-line client for a running printer relay", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "https://localhost:9443")]
    url: Url,

    /// Accept the relay's self-signed certificate.
    #[arg(short = 'k', long)]
    insecure: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the relay itself is running
    Health,
    /// Check whether a printer is reachable through the relay
    Status {
        #[arg(short, long)]
        printer_url: String,
    },
    /// Upload a GCode file and start printing it
    Upload {
        #[arg(short, long)]
        printer_url: String,
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::builder()
        .danger_accept_invalid_certs(cli.insecure)
        .build()?;

    let res = match cli.command {
        Commands::Health => client.get(cli.url.join("health")?).send().await?,
        Commands::Status { printer_url } => {
            client
                .get(cli.url.join("status")?)
                .query(&[("printerUrl", printer_url)])
                .send()
                .await?
        }
        Commands::Upload { printer_url, file } => {
            let filename = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or("file path has no file name")?;
            let bytes = tokio::fs::read(&file).await?;
            let form = Form::new().part("file", Part::bytes(bytes).file_name(filename));

            client
                .post(cli.url.join("upload")?)
                .query(&[("printerUrl", printer_url)])
                .multipart(form)
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    let pretty = serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|json| serde_json::to_string_pretty(&json).ok())
        .unwrap_or(text);

    if !status.is_success() {
        eprintln!("Error: relay returned status {}", status);
        eprintln!("{}", pretty);
        std::process::exit(1);
    }

    println!("{}", pretty);
    Ok(())
}
