use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Fill the grocery store with sample categories and items")]
struct Args {
    #[arg(long, env = "REDIS_URL", default_value = "redis://127.0.0.1:6379")]
    redis_url: String,

    /// Drop existing categories and items first
    #[arg(long)]
    reset: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    grocery_seed::run(&args.redis_url, args.reset).await
}
