mod render;
mod terminal;

use anyhow::{bail, Result};
use appart_core::screens::{DeleteOutcome, SubmitOutcome};
use appart_core::{Api, ApartmentsScreen, StatsScreen, UreqTransport};
use clap::builder::TypedValueParser;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::terminal::TerminalNotifier;

const DEFAULT_BASE_URL: &str = "https://backendappartement.onrender.com";

#[derive(Debug, Parser)]
#[command(name = "appart", version, about = "Manage rental apartments from the terminal")]
struct Cli {
    /// Base URL of the apartments service.
    #[arg(long, global = true, env = "APPART_API_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every apartment with its rent tier.
    List,
    /// Create an apartment.
    Add {
        #[arg(long)]
        num_app: String,
        #[arg(long)]
        design: String,
        /// Rent, as typed; it must parse as a number.
        #[arg(long)]
        loyer: String,
    },
    /// Edit an apartment; omitted fields keep their current value.
    Edit {
        id: i64,
        #[arg(long)]
        num_app: Option<String>,
        #[arg(long)]
        design: Option<String>,
        #[arg(long)]
        loyer: Option<String>,
    },
    /// Delete an apartment after confirmation.
    Delete {
        id: i64,
        /// Skip the confirmation prompt.
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Show total, minimal and maximal rent.
    Stats {
        /// Width of the longest bar, in cells.
        #[arg(
            long,
            default_value_t = 40,
            value_parser = clap::value_parser!(u16).range(1..=render::MAX_BAR_WIDTH as i64).map(usize::from)
        )]
        width: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    debug!(base_url = %cli.base_url, "using apartments service");
    let api = Api::connect(&cli.base_url);

    match cli.command {
        Command::List => {
            let mut screen = ApartmentsScreen::new(api, TerminalNotifier::new(false));
            if !screen.mount() {
                bail!("could not load apartments from {}", cli.base_url);
            }
            print_apartments(&screen);
        }
        Command::Add {
            num_app,
            design,
            loyer,
        } => {
            let mut screen = ApartmentsScreen::new(api, TerminalNotifier::new(false));
            screen.mount();
            let form = screen.form_mut();
            form.num_app = num_app;
            form.design = design;
            form.loyer = loyer;
            submit(&mut screen)?;
        }
        Command::Edit {
            id,
            num_app,
            design,
            loyer,
        } => {
            let mut screen = ApartmentsScreen::new(api, TerminalNotifier::new(false));
            if !screen.mount() {
                bail!("could not load apartments from {}", cli.base_url);
            }
            if !screen.edit(id) {
                bail!("apartment {id} not found");
            }
            let form = screen.form_mut();
            if let Some(num_app) = num_app {
                form.num_app = num_app;
            }
            if let Some(design) = design {
                form.design = design;
            }
            if let Some(loyer) = loyer {
                form.loyer = loyer;
            }
            submit(&mut screen)?;
        }
        Command::Delete { id, yes } => {
            let mut screen = ApartmentsScreen::new(api, TerminalNotifier::new(yes));
            if !screen.mount() {
                bail!("could not load apartments from {}", cli.base_url);
            }
            match screen.delete(id) {
                DeleteOutcome::Deleted => print_apartments(&screen),
                DeleteOutcome::Cancelled => println!("suppression annulée"),
                DeleteOutcome::NotFound => bail!("apartment {id} not found"),
                DeleteOutcome::Failed => bail!("could not delete apartment {id}"),
            }
        }
        Command::Stats { width } => {
            let mut screen = StatsScreen::new(api);
            if !screen.mount(0) {
                bail!("could not load stats from {}", cli.base_url);
            }
            print_stats(&screen, width);
        }
    }
    Ok(())
}

fn submit(screen: &mut ApartmentsScreen<UreqTransport, TerminalNotifier>) -> Result<()> {
    match screen.submit() {
        SubmitOutcome::Saved(apartment) => {
            println!("enregistré: {}", render::apartment_line(&apartment));
            print_apartments(screen);
            Ok(())
        }
        SubmitOutcome::Rejected(err) => bail!("invalid input: {err}"),
        SubmitOutcome::Failed => bail!("the service refused the apartment"),
    }
}

fn print_apartments(screen: &ApartmentsScreen<UreqTransport, TerminalNotifier>) {
    let apartments = screen.state().apartments();
    if apartments.is_empty() {
        println!("aucun appartement");
        return;
    }
    for apartment in apartments {
        println!("{}", render::apartment_line(apartment));
    }
}

fn print_stats(screen: &StatsScreen<UreqTransport>, width: usize) {
    let (Some(summaries), Some(chart)) = (screen.summaries(), screen.chart()) else {
        return;
    };
    println!("Statistiques des Loyers");
    for line in summaries {
        println!("  {line}");
    }
    println!();
    println!("Graphique des loyers");
    for line in render::bar_chart(&chart, width) {
        println!("  {line}");
    }
}
