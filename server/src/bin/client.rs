use clap::{Parser, Subcommand};
use psort_server::{
    client::{generate_batch, run_self_test, SortClient},
    processing::Strategy,
};

#[derive(Parser)]
#[command(about = "Test client for the psort service")]
struct Args {
    /// Service base URL
    #[arg(short, long, default_value = "http://127.0.0.1:8000")]
    url: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Send the sample batch to /process-single and verify it (default)
    Smoke,
    /// Send one generated batch to both routes and compare their timings
    Compare {
        /// Number of arrays in the batch
        #[arg(short, long, default_value_t = 64)]
        arrays: usize,
        /// Values per array
        #[arg(short, long, default_value_t = 10_000)]
        len: usize,
        /// Generator seed
        #[arg(short, long, default_value_t = 1)]
        seed: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let client = SortClient::new(args.url)?;

    match args.command.unwrap_or(Command::Smoke) {
        Command::Smoke => {
            let resp = run_self_test(&client).await?;
            println!("ok: {:?} in {} ns", resp.sorted_arrays, resp.time_ns);
        }
        Command::Compare { arrays, len, seed } => {
            let batch = generate_batch(arrays, len, seed);
            let sequential = client.sort(Strategy::Sequential, &batch).await?;
            let concurrent = client.sort(Strategy::Concurrent, &batch).await?;

            if sequential.sorted_arrays != concurrent.sorted_arrays {
                anyhow::bail!("strategies disagree on the sorted output");
            }

            println!("batch: {arrays} arrays x {len} values (seed {seed})");
            println!("{:<12} {:>14} ns", Strategy::Sequential, sequential.time_ns);
            println!("{:<12} {:>14} ns", Strategy::Concurrent, concurrent.time_ns);
            if concurrent.time_ns > 0 {
                println!(
                    "speedup: {:.2}x",
                    sequential.time_ns as f64 / concurrent.time_ns as f64
                );
            }
        }
    }

    Ok(())
}
