use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use std::{error::Error, fs};

use clap::{Args, Parser, Subcommand};
use ledger::{Actor, Backup, BulkAssignment, Ledger, LedgerError, MoneyCents, Month};

#[derive(Parser, Debug)]
#[command(name = "colletta_admin")]
#[command(about = "Admin utilities for Colletta (years, members, payments)")]
struct Cli {
    /// Directory holding the year documents (also read from `COLLETTA_DATA_DIR`).
    #[arg(long, env = "COLLETTA_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Year(Year),
    Member(Member),
    Payment(Payment),
    Settings(SettingsCmd),
    History(HistoryArgs),
    Export(ExportArgs),
    Backup(BackupArgs),
    Restore(RestoreArgs),
}

#[derive(Args, Debug)]
struct Year {
    #[command(subcommand)]
    command: YearCommand,
}

#[derive(Subcommand, Debug)]
enum YearCommand {
    Create(YearCreateArgs),
    Copy(YearCopyArgs),
    List,
}

#[derive(Args, Debug)]
struct YearCreateArgs {
    #[arg(long)]
    year: i32,
}

#[derive(Args, Debug)]
struct YearCopyArgs {
    #[arg(long)]
    from: i32,
    #[arg(long)]
    to: i32,
}

#[derive(Args, Debug)]
struct Member {
    #[command(subcommand)]
    command: MemberCommand,
}

#[derive(Subcommand, Debug)]
enum MemberCommand {
    Add(MemberArgs),
    Remove(MemberArgs),
}

#[derive(Args, Debug)]
struct MemberArgs {
    #[arg(long)]
    year: i32,
    #[arg(long)]
    name: String,
}

#[derive(Args, Debug)]
struct Payment {
    #[command(subcommand)]
    command: PaymentCommand,
}

#[derive(Subcommand, Debug)]
enum PaymentCommand {
    Mark(PaymentArgs),
    Unmark(PaymentArgs),
}

#[derive(Args, Debug)]
struct PaymentArgs {
    #[arg(long)]
    year: i32,
    #[arg(long)]
    member: String,
    /// Starting month, as a short label (`Jan`) or 1-based number.
    #[arg(long, value_parser = parse_month)]
    month: Month,
    /// How many consecutive months to flag, wrapping past December.
    #[arg(long, default_value_t = 1)]
    months: u32,
}

#[derive(Args, Debug)]
struct SettingsCmd {
    #[command(subcommand)]
    command: SettingsCommand,
}

#[derive(Subcommand, Debug)]
enum SettingsCommand {
    Set(SettingsSetArgs),
}

#[derive(Args, Debug)]
struct SettingsSetArgs {
    #[arg(long)]
    year: i32,
    /// Total subscription price in major units, e.g. `120.00`.
    #[arg(long, value_parser = parse_amount)]
    price: MoneyCents,
    #[arg(long)]
    slots: u32,
}

#[derive(Args, Debug)]
struct HistoryArgs {
    #[arg(long)]
    year: i32,
    #[arg(long)]
    member: Option<String>,
    #[arg(long, default_value_t = 50)]
    limit: usize,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[arg(long)]
    year: i32,
    /// Write the CSV here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct BackupArgs {
    /// Write the backup here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RestoreArgs {
    #[arg(long)]
    input: PathBuf,
}

fn parse_month(raw: &str) -> Result<Month, String> {
    Month::try_from(raw).map_err(|err| err.to_string())
}

fn parse_amount(raw: &str) -> Result<MoneyCents, String> {
    MoneyCents::from_str(raw).map_err(|err| err.to_string())
}

fn or_exit<T>(result: Result<T, LedgerError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

fn write_or_print(
    output: Option<PathBuf>,
    bytes: &[u8],
) -> Result<(), Box<dyn Error + Send + Sync>> {
    match output {
        Some(path) => {
            fs::write(&path, bytes)?;
            println!("wrote {}", path.display());
        }
        None => std::io::stdout().write_all(bytes)?,
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let ledger = or_exit(Ledger::open(cli.data_dir));

    match cli.command {
        Command::Year(Year {
            command: YearCommand::Create(args),
        }) => {
            or_exit(ledger.create_year(args.year));
            println!("created year: {}", args.year);
        }
        Command::Year(Year {
            command: YearCommand::Copy(args),
        }) => {
            let record = or_exit(ledger.copy_members(args.from, args.to));
            println!(
                "copied {} member(s) from {} into {}",
                record.members.len(),
                args.from,
                args.to
            );
        }
        Command::Year(Year {
            command: YearCommand::List,
        }) => {
            for year in or_exit(ledger.available_years()) {
                println!("{year}");
            }
        }
        Command::Member(Member {
            command: MemberCommand::Add(args),
        }) => {
            or_exit(ledger.add_member(args.year, &args.name));
            println!("added member: {}", args.name);
        }
        Command::Member(Member {
            command: MemberCommand::Remove(args),
        }) => {
            or_exit(ledger.remove_member(args.year, &args.name));
            println!("removed member: {}", args.name);
        }
        Command::Payment(Payment { command }) => {
            let (args, paid) = match command {
                PaymentCommand::Mark(args) => (args, true),
                PaymentCommand::Unmark(args) => (args, false),
            };

            let assignments: Vec<BulkAssignment> = Month::sequence_from(args.month, args.months)
                .into_iter()
                .map(|month| BulkAssignment {
                    member: args.member.clone(),
                    month,
                    paid,
                })
                .collect();

            let (_, failures) =
                or_exit(ledger.bulk_set_payments(args.year, &assignments, Actor::Admin));

            for failure in &failures {
                eprintln!("{} {}: {}", failure.member, failure.month, failure.error);
            }

            let applied = assignments.len() - failures.len();
            let verb = if paid { "marked" } else { "cleared" };
            println!("{verb} {applied} payment(s) for {}", args.member);

            if !failures.is_empty() {
                std::process::exit(1);
            }
        }
        Command::Settings(SettingsCmd {
            command: SettingsCommand::Set(args),
        }) => {
            let record = or_exit(ledger.update_settings(args.year, args.price, args.slots));
            println!(
                "settings for {}: {} across {} slot(s)",
                args.year, record.settings.total_price, record.settings.max_slots
            );
        }
        Command::History(args) => {
            let entries = or_exit(ledger.payment_history(
                args.year,
                args.member.as_deref(),
                Some(args.limit),
            ));
            for entry in entries {
                println!(
                    "{} {} {} {} ({})",
                    entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    entry.member,
                    entry.month,
                    entry.action.as_str(),
                    entry.actor.as_str()
                );
            }
        }
        Command::Export(args) => {
            let record = or_exit(ledger.load(args.year));
            let csv = or_exit(ledger::report::year_report_csv(&record));
            write_or_print(args.output, &csv)?;
        }
        Command::Backup(args) => {
            let backup = or_exit(ledger.full_backup());
            let json = serde_json::to_vec_pretty(&backup)?;
            write_or_print(args.output, &json)?;
        }
        Command::Restore(args) => {
            let bytes = fs::read(&args.input)?;
            let backup: Backup = serde_json::from_slice(&bytes)?;

            let outcome = or_exit(ledger.restore_backup(&backup));
            for skipped in &outcome.skipped {
                eprintln!("skipped {skipped}");
            }
            if outcome.restored.is_empty() {
                eprintln!("nothing restored from {}", args.input.display());
                std::process::exit(1);
            }

            let restored: Vec<String> = outcome.restored.iter().map(i32::to_string).collect();
            println!("restored: {}", restored.join(", "));
        }
    }

    Ok(())
}
