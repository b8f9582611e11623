//! CLI entry point for blogsmith

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "blogsmith")]
#[command(version)]
#[command(about = "Incremental markdown blog builder", long_about = None)]
struct Cli {
    /// Render every post page even if no source changed
    #[arg(long)]
    force: bool,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blogsmith=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .init();

    let base_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            tracing::error!("Critical error: cannot determine working directory: {}", e);
            std::process::exit(1);
        }
    };

    let blog = blogsmith::Blog::new(&base_dir, cli.force);
    tracing::info!("Building blog in {:?}", base_dir);

    match blog.build() {
        Ok(summary) => {
            println!("\nBuild complete!");
            println!("   Built: {}", summary.built);
            println!("   Skipped: {}", summary.skipped);
            println!("   Total: {}", summary.total);
        }
        Err(e) => {
            tracing::error!("Critical error: {:#}", anyhow::Error::from(e));
            std::process::exit(1);
        }
    }
}
