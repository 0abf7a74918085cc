use clap::Parser;
use dbchat::{AppConfig, AppContext};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "dbchat")]
#[command(about = "Ask natural-language questions against a SQL data warehouse")]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "dbchat.toml")]
    config: PathBuf,

    /// Ask a single question and exit
    #[arg(short, long)]
    question: Option<String>,

    /// Include the generated SQL and raw results in replies
    #[arg(short, long)]
    details: bool,
}

#[tokio::main]
async fn main() -> dbchat::Result<()> {
    dotenvy::dotenv().ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .try_init();

    let args = Args::parse();

    let config = AppConfig::load(&args.config)?;
    let context = AppContext::init(config).await?;
    info!("Ready to answer questions");

    if let Some(question) = args.question {
        println!("{}", context.handler.handle(&question, args.details).await);
        return Ok(());
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("question> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        println!("{}\n", context.handler.handle(line, args.details).await);
    }

    Ok(())
}
