use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use prettytable::{Cell, Row, Table, row};
use rollpoint_desk::{
    config::Config,
    raffle::{CustomerRoll, PickStrategy, RecordView, ViewerRole, build_export_rows},
    server::{DrawRequest, RollPointServer},
};
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rollpoint", about = "Roll-point raffle desk", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a chat log (file or stdin), pick winners and record the draw
    Draw {
        /// Chat log file; reads stdin when omitted
        #[arg(long)]
        log: Option<PathBuf>,
        #[arg(long, default_value = "")]
        staff: String,
        #[arg(long, default_value = "")]
        service: String,
        /// Slot count
        #[arg(long)]
        amount: u32,
        #[arg(long, default_value_t = 0)]
        money: u64,
        #[arg(long)]
        refusal: Option<String>,
        /// max or min
        #[arg(long, default_value = "max")]
        strategy: PickStrategy,
        #[arg(long)]
        winners: Option<u32>,
    },
    /// List records as a manager, staff member or guest sees them
    Records {
        #[arg(long, default_value = "manager")]
        role: ViewerRole,
        #[arg(long)]
        viewer: Option<String>,
    },
    /// Per staff/service totals
    Stats,
    /// Write the stats export as CSV
    Export {
        #[arg(long, default_value = "rollpoint_stats.csv")]
        out: PathBuf,
    },
    /// Remove one record by id
    Remove { id: String },
    /// Remove every record
    Clear {
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = Config::load()?;
    let server = RollPointServer::new(cfg).await?;

    match cli.command {
        Command::Draw {
            log,
            staff,
            service,
            amount,
            money,
            refusal,
            strategy,
            winners,
        } => {
            let log = match log {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let outcome = server
                .draw(DrawRequest {
                    log,
                    staff_id: staff,
                    service_name: service,
                    amount,
                    money,
                    refusal_type: refusal,
                    pick_strategy: strategy,
                    winner_count: winners,
                })
                .await?;
            println!("{}", outcome.message);
            println!("(record {})", outcome.record.id);
        }
        Command::Records { role, viewer } => {
            let listing = server.records(role, viewer.as_deref()).await?;
            print_views(&listing.views);
            if let Some(hint) = listing.did_you_mean {
                println!("No records for that staff id. Did you mean `{hint}`?");
            }
        }
        Command::Stats => {
            let stats = server.stats().await?;
            let mut table = Table::new();
            for cells in build_export_rows(&stats) {
                table.add_row(Row::new(cells.iter().map(|c| Cell::new(&c.to_string())).collect()));
            }
            table.printstd();
        }
        Command::Export { out } => {
            let rows = server.export_csv_to(&out).await?;
            println!("Wrote {rows} stat row(s) to {}", out.display());
        }
        Command::Remove { id } => {
            let removed = server.remove_record(&id).await?;
            println!("Removed {}", removed.id);
        }
        Command::Clear { yes } => {
            if !yes {
                anyhow::bail!("refusing to clear all records without --yes");
            }
            let count = server.clear_records().await?;
            println!("Cleared {count} record(s)");
        }
    }
    Ok(())
}

fn print_views(views: &[RecordView]) {
    let mut table = Table::new();
    match views.first() {
        Some(RecordView::Public(_)) => {
            table.add_row(row!["Time", "Customers", "Winners", "Staff", "Service", "Slots", "Money"]);
        }
        Some(_) => {
            table.add_row(row!["Id", "Time", "Staff", "Service", "Slots", "Money", "Winners", "Refusal"]);
        }
        None => {
            println!("No records.");
            return;
        }
    }

    for view in views {
        match view {
            RecordView::Full(r) => {
                let winners = pairs(&r.selected_customers);
                table.add_row(row![r.id, r.time.to_rfc3339(), r.staff_id, r.service_name, r.amount, r.money, winners, r.refusal_type]);
            }
            RecordView::Own(r) => {
                let winners = pairs(&r.selected_customers);
                table.add_row(row![r.id, r.time, r.staff_id, r.service_name, r.amount, r.money, winners, r.refusal_type]);
            }
            RecordView::Public(p) => {
                table.add_row(row![p.time, p.customers, p.winners, p.staff_id, p.service_name, p.amount, p.money]);
            }
        }
    }
    table.printstd();
}

fn pairs(rolls: &[CustomerRoll]) -> String {
    rolls
        .iter()
        .map(CustomerRoll::display_pair)
        .collect::<Vec<_>>()
        .join(", ")
}
