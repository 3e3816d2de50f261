use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::application::LedgerService;
use crate::config::{Backend, Config};
use crate::domain::{PaymentEvent, SplitPolicy, format_cents, parse_cents, parse_shares};
use crate::io::ImportOptions;
use crate::storage::LedgerStore;

/// Fairshare - shared expense splitter
#[derive(Parser)]
#[command(name = "fairshare")]
#[command(about = "Track shared expenses and settle who owes whom")]
#[command(version)]
pub struct Cli {
    /// Directory holding the ledger files
    #[arg(long, global = true, default_value = ".")]
    pub data_dir: PathBuf,

    /// Storage backend
    #[arg(long, global = true, value_enum, default_value_t = Backend::Csv)]
    pub backend: Backend,

    /// Whose ledger to work on; every user has a separate ledger
    #[arg(short, long, global = true, default_value = "default")]
    pub user: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Participant management commands
    #[command(subcommand)]
    Participant(ParticipantCommands),

    /// Record a payment and split it among all participants
    Pay {
        /// Amount paid (e.g., "90.00" or "90")
        #[arg(allow_negative_numbers = true)]
        amount: String,

        /// Participant who paid
        #[arg(long)]
        payer: String,

        /// Percentage shares in participant order, summing to 100 (e.g., "50,30,20").
        /// Omit for an equal split.
        #[arg(long)]
        shares: Option<String>,

        /// Description of the payment
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Show raw net balances
    Balances,

    /// Show who should receive and who owes
    Summary {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Remove all participants and delete the stored ledger
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },

    /// Export the ledger as CSV
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import participants and balances from CSV
    Import {
        /// Input file (stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Replace the current ledger instead of merging
        #[arg(long)]
        replace: bool,

        /// Preview without saving
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand)]
pub enum ParticipantCommands {
    /// Add a participant
    Add {
        /// Participant name (must be unique)
        name: String,
    },

    /// Remove a participant and their balance
    Remove {
        /// Participant name
        name: String,
    },

    /// List participants
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

impl Cli {
    pub fn config(&self) -> Config {
        Config {
            data_dir: self.data_dir.clone(),
            backend: self.backend,
            user: self.user.clone(),
            verbose: self.verbose,
        }
    }

    pub async fn run(self, config: Config) -> Result<()> {
        let identity = config.identity()?;
        let store = config.open_store(&identity).await?;
        let mut service = LedgerService::open(store).await?;

        match self.command {
            Commands::Participant(cmd) => run_participant_command(&mut service, cmd).await?,

            Commands::Pay {
                amount,
                payer,
                shares,
                description,
            } => {
                let amount_cents = parse_cents(&amount)
                    .map_err(|e| anyhow::anyhow!("Invalid amount '{}': {}", amount, e))?;
                let policy = match shares {
                    Some(raw) => SplitPolicy::Weighted(
                        parse_shares(&raw).with_context(|| format!("Invalid shares '{}'", raw))?,
                    ),
                    None => SplitPolicy::Equal,
                };

                let mut payment = PaymentEvent::new(payer, amount_cents, policy);
                if let Some(desc) = description {
                    payment = payment.with_description(desc);
                }

                let result = service.record_payment(payment).await?;
                println!(
                    "Recorded payment of {} by {} ({} split)",
                    format_cents(result.payment.amount_cents),
                    result.payment.payer,
                    result.payment.policy.as_str()
                );
                for delta in &result.deltas {
                    println!(
                        "  {:<20} {:>12}",
                        delta.participant,
                        signed(delta.delta)
                    );
                }
            }

            Commands::Balances => run_balances_command(&service),

            Commands::Summary { format } => run_summary_command(&service, format)?,

            Commands::Reset { yes } => {
                if !yes {
                    anyhow::bail!("Reset deletes every participant and balance; pass --yes to confirm");
                }
                service.reset().await?;
                println!("All data for '{}' has been reset", identity);
            }

            Commands::Export { output } => run_export_command(&service, output)?,

            Commands::Import {
                input,
                replace,
                dry_run,
            } => run_import_command(&mut service, input, replace, dry_run).await?,
        }

        Ok(())
    }
}

async fn run_participant_command<S: LedgerStore>(
    service: &mut LedgerService<S>,
    cmd: ParticipantCommands,
) -> Result<()> {
    match cmd {
        ParticipantCommands::Add { name } => {
            service.add_participant(&name).await?;
            println!("Added participant: {}", name);
        }
        ParticipantCommands::Remove { name } => {
            let removed = service.remove_participant(&name).await?;
            println!(
                "Removed participant: {} (balance was {})",
                removed.name,
                format_cents(removed.net_balance)
            );
        }
        ParticipantCommands::List => {
            let names = service.participants();
            if names.is_empty() {
                println!("No participants added yet.");
            } else {
                for name in names {
                    println!("{}", name);
                }
            }
        }
    }
    Ok(())
}

fn run_balances_command<S: LedgerStore>(service: &LedgerService<S>) {
    let balances = service.balances();
    if balances.is_empty() {
        println!("No participants added yet.");
        return;
    }

    println!("{:<20} {:>12}", "PARTICIPANT", "BALANCE");
    println!("{}", "-".repeat(33));
    for (name, balance) in balances {
        println!("{:<20} {:>12}", truncate(&name, 20), format_cents(balance));
    }
}

fn run_summary_command<S: LedgerStore>(
    service: &LedgerService<S>,
    format: OutputFormat,
) -> Result<()> {
    let summary = service.summary()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Table => {
            println!(
                "Total: {}  Participants: {}",
                format_cents(summary.total),
                summary.participant_count
            );
            println!();
            println!(
                "{:<20} {:>12} {:>12} {:>12}  STATUS",
                "PARTICIPANT", "NET", "FAIR SHARE", "BALANCE"
            );
            println!("{}", "-".repeat(78));
            for entry in &summary.entries {
                println!(
                    "{:<20} {:>12} {:>12} {:>12}  {}",
                    truncate(&entry.participant, 20),
                    format_cents(entry.net_balance),
                    format_cents(entry.fair_share),
                    signed(entry.balance),
                    entry.standing
                );
            }
        }
    }

    Ok(())
}

fn run_export_command<S: LedgerStore>(
    service: &LedgerService<S>,
    output: Option<PathBuf>,
) -> Result<()> {
    use std::io::{Write, stdout};

    let blob = service.export()?;
    match output {
        Some(path) => {
            std::fs::write(&path, &blob.bytes)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            eprintln!(
                "Exported {} participants to {}",
                service.ledger().len(),
                path.display()
            );
        }
        None => {
            let mut out = stdout();
            out.write_all(&blob.bytes)?;
            out.flush()?;
        }
    }
    Ok(())
}

async fn run_import_command<S: LedgerStore>(
    service: &mut LedgerService<S>,
    input: Option<PathBuf>,
    replace: bool,
    dry_run: bool,
) -> Result<()> {
    use std::fs::File;
    use std::io::{Read, stdin};

    // Determine input reader
    let reader: Box<dyn Read> = match &input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open input file: {}", path.display()))?;
            Box::new(file)
        }
        None => Box::new(stdin()),
    };

    let result = service
        .import_csv(reader, ImportOptions { replace, dry_run })
        .await?;

    // Display results
    if dry_run {
        println!("Dry run, nothing saved");
    } else {
        println!("Import complete");
    }
    println!("  Imported: {}", result.imported);
    println!("  Skipped:  {}", result.skipped);
    println!("  Errors:   {}", result.errors.len());

    if !result.errors.is_empty() {
        println!("\nErrors:");
        for error in result.errors.iter().take(10) {
            println!("  Line {}: {}", error.line, error.error);
        }
        if result.errors.len() > 10 {
            println!("  ... and {} more errors", result.errors.len() - 10);
        }
    }

    Ok(())
}

fn signed(cents: i64) -> String {
    if cents > 0 {
        format!("+{}", format_cents(cents))
    } else {
        format_cents(cents)
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
