mod sim;

use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use mbim_phonebook::{ActionRunner, ActionSelector, PhonebookOptions, SessionContext};
use sim::SimulatedPhonebook;

#[derive(Parser, Debug)]
#[command(author, version, about = "MBIM phonebook control tool", long_about = None)]
struct Args {
    /// Query the phonebook configuration
    #[arg(long)]
    phonebook_query_configuration: bool,

    /// Read the phonebook entry with the given index
    #[arg(long, value_name = "INDEX", value_parser = clap::value_parser!(u32).range(1..))]
    phonebook_read: Option<u32>,

    /// Read all phonebook entries
    #[arg(long)]
    phonebook_read_all: bool,

    /// Add a new phonebook entry, given as "<Name>,<Number>"
    #[arg(long, value_name = "NAME,NUMBER")]
    phonebook_write: Option<String>,

    /// Update a phonebook entry, given as "<Name>,<Number>,<Index>"
    #[arg(long, value_name = "NAME,NUMBER,INDEX")]
    phonebook_entry_update: Option<String>,

    /// Delete the phonebook entry with the given index
    #[arg(long, value_name = "INDEX", value_parser = clap::value_parser!(u32).range(1..))]
    phonebook_delete: Option<u32>,

    /// Delete all phonebook entries
    #[arg(long)]
    phonebook_delete_all: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn phonebook_options(&self) -> PhonebookOptions {
        PhonebookOptions {
            query_configuration: self.phonebook_query_configuration,
            read_index: self.phonebook_read,
            read_all: self.phonebook_read_all,
            write: self.phonebook_write.clone(),
            entry_update: self.phonebook_entry_update.clone(),
            delete_index: self.phonebook_delete,
            delete_all: self.phonebook_delete_all,
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(if args.verbose {
                    tracing::Level::DEBUG.into()
                } else {
                    tracing::Level::WARN.into()
                })
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let selector = ActionSelector::new(args.phonebook_options());
    let raw = match selector.select() {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            eprintln!("error: no phonebook action requested");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    // Device opening is outside the executor's scope. This tool ships a
    // simulated backend; a real MBIM stack plugs in through the same
    // PhonebookDevice trait.
    info!("using simulated phonebook device");
    let device = Arc::new(SimulatedPhonebook::with_sample_entries());

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("interrupt received, cancelling pending operation");
            signal_cancel.cancel();
        }
    });

    let ctx = SessionContext::new(device, cancel);
    let outcome = ActionRunner::new(ctx).run(raw).await;

    std::process::exit(if outcome.is_success() { 0 } else { 1 });
}
