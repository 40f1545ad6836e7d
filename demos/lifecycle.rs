//! Demo walking a counter through its whole lifecycle.
//!
//! Run with:
//! ```bash
//! RUST_LOG=trace cargo run --example lifecycle --features demo -- --initial 42 --steps 2
//! ```

use clap::Parser;
use contatore::{Counter, CounterError};
use tracing_subscriber::EnvFilter;

/// Initialize a counter, increment it, read it back and destroy it.
#[derive(Debug, Parser)]
#[command(name = "lifecycle", version, about)]
struct Args {
    /// Initial value (negative values are rejected)
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    initial: i32,

    /// Number of increments to perform
    #[arg(short, long, default_value_t = 1)]
    steps: u32,
}

fn run(args: &Args) -> Result<(), CounterError> {
    let mut counter: Counter = Counter::new();
    println!("created:     {counter}");

    counter.initialize(args.initial)?;
    println!("initialized: {counter}");

    for step in 1..=args.steps {
        if let Err(err) = counter.increment() {
            println!("step {step}: {err}");
            break;
        }
        println!("step {step}:      {counter}");
    }

    println!("read:        {}", counter.read()?);

    counter.destroy();
    match counter.read() {
        Ok(value) => println!("read after destroy: {value}"),
        Err(err) => println!("read after destroy: {err}"),
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
