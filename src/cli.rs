use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// TOML file overriding the matching thresholds and word lists
    #[arg(long, global = true, env = "LEADGATE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Classify leads against every block list and write a JSON report
    Check(CheckArgs),
    /// Export how each DNC registry name is normalized and split
    Variants(VariantsArgs),
    /// List companies that are currently in cooldown
    Cooldown(CooldownArgs),
    /// Append a send attempt to the send log (and the suppression list when sent)
    Record(RecordArgs),
}

#[derive(Args, Debug)]
pub struct DncArgs {
    /// Do-Not-Contact registry (xlsx with a 'Niet Benaderen' sheet, or csv)
    #[arg(long, env = "DNC_PATH", default_value = "data/Niet Benaderen.xlsx")]
    pub dnc: PathBuf,
}

#[derive(Args, Debug)]
pub struct LogArgs {
    /// Suppression list of addresses that already received a mail
    #[arg(long, env = "SUPPRESSION_PATH", default_value = "output/suppression.csv")]
    pub suppression: PathBuf,

    /// Send log with one row per send attempt
    #[arg(long, env = "SEND_LOG_PATH", default_value = "output/send_log.csv")]
    pub send_log: PathBuf,
}

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Contact history workbook; cooldowns are skipped when absent
    #[arg(long, env = "RECENT_CONTACTS_PATH")]
    pub recent_contacts: Option<PathBuf>,

    /// Evaluate as of this date (YYYY-MM-DD) instead of today
    #[arg(long)]
    pub now: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Leads file (csv or xlsx) with 'Company' and 'Email' columns
    pub leads: PathBuf,

    /// Output file path
    #[arg(short, long, default_value = "output/leadgate-report.json")]
    pub output_file: PathBuf,

    #[command(flatten)]
    pub dnc: DncArgs,

    #[command(flatten)]
    pub logs: LogArgs,

    #[command(flatten)]
    pub history: HistoryArgs,
}

#[derive(Args, Debug)]
pub struct VariantsArgs {
    #[command(flatten)]
    pub dnc: DncArgs,

    /// Output CSV path
    #[arg(short, long, default_value = "output/dnc_alle_resultaten.csv")]
    pub output_file: PathBuf,
}

#[derive(Args, Debug)]
pub struct CooldownArgs {
    #[command(flatten)]
    pub history: HistoryArgs,
}

#[derive(Args, Debug)]
pub struct RecordArgs {
    #[command(flatten)]
    pub logs: LogArgs,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub company: String,

    /// Send status (SENT, DRY RUN, ERROR)
    #[arg(long, default_value = "SENT")]
    pub status: String,

    #[arg(long, default_value = "")]
    pub first_name: String,

    #[arg(long, default_value = "")]
    pub job_title: String,

    #[arg(long, default_value = "")]
    pub consultant: String,

    #[arg(long, default_value = "")]
    pub vestiging: String,

    #[arg(long, default_value = "")]
    pub message_id: String,

    #[arg(long, default_value = "")]
    pub error: String,

    #[arg(long, default_value = "")]
    pub subject: String,
}
