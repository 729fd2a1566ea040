#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![allow(clippy::as_conversions, clippy::mod_module_files)]

use std::{error, path::PathBuf, process, time::Duration};

mod app;

use app::Mode;

use clap::{Args, Parser};
use log::{error, trace};
use osdel::SearchOptions;

const DEFAULT_URL: &str = "http://solr.osdelnet.gr/solr/index.php";

fn main() {
    let Cli {
        search,
        output,
        connection,
        global_opts: GlobalOpts { verbosity, quiet },
    } = Cli::parse();

    if let Err(err) = setup_errlog(verbosity as usize, quiet) {
        eprintln!("{err}");
        process::exit(2);
    }

    if let Err(err) = try_main(search, output, connection, verbosity > 0) {
        error!("{err:#}");
        process::exit(2);
    }
}

fn try_main(
    search: SearchArgs,
    output: OutputArgs,
    connection: ConnectionArgs,
    verbose: bool,
) -> eyre::Result<()> {
    let mode = Mode::from_args(search);
    trace!("Running in {mode:?} mode");

    // Price tracking output is always the compact projection.
    let compact = output.compact || mode.is_price_tracking();
    let base = connection.into_options();

    app::run(mode, &base, output.csv.as_deref(), compact, verbose)
}

fn setup_errlog(verbosity: usize, quiet: bool) -> Result<(), Box<dyn error::Error>> {
    // if quiet then ignore verbosity but still show errors
    let verbosity = if quiet { 1 } else { verbosity + 2 };

    stderrlog::new().verbosity(verbosity).init()?;
    Ok(())
}

#[derive(Parser)]
#[clap(name = "osdel")]
#[clap(about = "Search the OSDEL book catalog by ISBN or publisher and export the results as CSV")]
#[clap(version, author)]
struct Cli {
    #[clap(flatten)]
    search: SearchArgs,

    #[clap(flatten)]
    output: OutputArgs,

    #[clap(flatten)]
    connection: ConnectionArgs,

    #[clap(flatten)]
    global_opts: GlobalOpts,
}

#[derive(Debug, Args)]
struct SearchArgs {
    /// A CSV file of `isbn,price_tracking` rows to search for, one request per row
    ///
    /// The first row is a header and is always skipped.
    #[clap(short, long, parse(from_os_str), conflicts_with_all = &["isbn", "publisher"])]
    file: Option<PathBuf>,

    /// An ISBN-13 to search for, a prefix can be used too
    ///
    /// e.g. 978-960-451-482 instead of the full ISBN-13 978-960-451-482-3
    #[clap(long, conflicts_with = "publisher")]
    isbn: Option<String>,

    /// A publisher to search for
    #[clap(long)]
    publisher: Option<String>,

    /// Number of rows to fetch, batch searches always fetch one row per ISBN
    #[clap(long, default_value_t = 10)]
    rows: u64,

    /// Only search for ISBNs flagged for price tracking and write the compact CSV
    ///
    /// Needs a --file to read the flags from.
    #[clap(long, requires = "file")]
    price: bool,
}

#[derive(Debug, Args)]
struct OutputArgs {
    /// The CSV file to write results to, standard output is used when not set
    #[clap(long, parse(from_os_str))]
    csv: Option<PathBuf>,

    /// Write only the identity and pricing columns
    #[clap(long)]
    compact: bool,
}

#[derive(Args)]
struct ConnectionArgs {
    /// Base URL of the search service
    #[clap(long, default_value = DEFAULT_URL)]
    url: String,

    /// Username for the search service
    #[clap(long, env = "OSDELNET_USER", default_value = "")]
    user: String,

    /// Password for the search service
    #[clap(long, env = "OSDELNET_PASSWORD", hide_env_values = true, default_value = "")]
    password: String,

    /// Number of retries after a failed request [default: 3]
    #[clap(long)]
    retries: Option<u32>,

    /// Milliseconds to wait before the first retry [default: 1000]
    #[clap(long, value_name = "MS")]
    retry_wait_ms: Option<u64>,

    /// Most milliseconds to wait between two attempts [default: 5000]
    #[clap(long, value_name = "MS")]
    max_retry_wait_ms: Option<u64>,
}

impl ConnectionArgs {
    fn into_options(self) -> SearchOptions {
        SearchOptions {
            max_retry_count: self.retries,
            retry_wait_time: self.retry_wait_ms.map(Duration::from_millis),
            max_retry_wait_time: self.max_retry_wait_ms.map(Duration::from_millis),
            ..SearchOptions::new(self.url).with_credentials(self.user, self.password)
        }
    }
}

#[derive(Debug, Args)]
struct GlobalOpts {
    /// How chatty the program is when performing commands
    ///
    /// The number of times this flag is used will increase how chatty
    /// the program is. Using it at least once also logs every record found.
    #[clap(short, long, parse(from_occurrences))]
    verbosity: u8,

    /// Only log warnings and errors.
    #[clap(short, long)]
    quiet: bool,
}
