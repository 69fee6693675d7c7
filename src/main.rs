use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use clap::Parser;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use log::{debug, info, warn};
use serde_json::to_string_pretty;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use leadgate::cli::{CheckArgs, Cli, Command, CooldownArgs, RecordArgs, VariantsArgs};
use leadgate::models::{
    ExtraData, Header, LEADGATE_OUTPUT_FORMAT_VERSION, LeadReport, Output, Summary,
};
use leadgate::sources::{
    SendLogRecord, dnc_variant_rows, load_contacted_companies, load_dnc_names,
    load_do_not_contact, load_leads, load_optional_recent_contacts, load_recent_contacts,
    load_suppression, record_send, write_variant_rows,
};
use leadgate::{LeadGate, MatchConfig};

fn main() -> std::io::Result<()> {
    if let Err(err) = run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let multi_progress = MultiProgress::new();
    init_logging(&multi_progress)?;

    let config = match &cli.config {
        Some(path) => MatchConfig::from_toml_file(path)?,
        None => MatchConfig::default(),
    };

    match cli.command {
        Command::Check(args) => run_check(args, &config, &multi_progress),
        Command::Variants(args) => run_variants(args, &config),
        Command::Cooldown(args) => run_cooldown(args, &config),
        Command::Record(args) => run_record(args),
    }
}

fn init_logging(multi_progress: &MultiProgress) -> Result<()> {
    let logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).build();
    let level = logger.filter();
    LogWrapper::new(multi_progress.clone(), logger)
        .try_init()
        .context("Failed to initialize logging")?;
    log::set_max_level(level);
    Ok(())
}

fn evaluation_time(now: Option<NaiveDate>) -> NaiveDateTime {
    match now {
        Some(date) => NaiveDateTime::new(date, NaiveTime::MIN),
        None => Local::now().naive_local(),
    }
}

fn run_check(args: CheckArgs, config: &MatchConfig, multi_progress: &MultiProgress) -> Result<()> {
    let start_time = Utc::now();
    let now = evaluation_time(args.history.now);

    // The registry goes first: nothing else runs without it.
    let registry = load_do_not_contact(&args.dnc.dnc, config)?;
    let suppressed = load_suppression(&args.logs.suppression)?;
    let contacted = load_contacted_companies(&args.logs.send_log)?;
    let history = load_optional_recent_contacts(args.history.recent_contacts.as_deref(), now)?;
    if args.history.recent_contacts.is_none() {
        warn!("No contact history configured; cooldown checks are skipped.");
    }

    let leads = load_leads(&args.leads)?;

    let mut gate = LeadGate::new(&registry, &suppressed, &contacted, config, now);
    if let Some(history) = &history {
        gate = gate.with_cooldown_history(history);
    }

    let progress_bar = multi_progress.add(create_progress_bar(leads.len()));
    let decisions = gate.classify_all(&leads, &progress_bar);
    progress_bar.finish_with_message("Classification complete!");

    for (lead, decision) in leads.iter().zip(&decisions) {
        if decision.blocked {
            debug!(
                "{} <{}>: {} ({})",
                lead.company, lead.email, decision.reason, decision.detail
            );
        }
    }

    let summary = Summary::from_decisions(&decisions);
    log_summary(&summary);

    let extra_data = ExtraData {
        leads_path: args.leads.display().to_string(),
        dnc_path: args.dnc.dnc.display().to_string(),
        dnc_variants_count: registry.len(),
        suppressed_emails_count: suppressed.len(),
        contacted_companies_count: contacted.len(),
        cooldown_companies_count: history.as_ref().map(|h| h.len()),
    };
    let errors = leads
        .iter()
        .filter(|lead| lead.email.is_empty())
        .map(|lead| format!("{}: no valid email address", lead.company))
        .collect();
    let reports = leads
        .iter()
        .zip(decisions)
        .map(|(lead, decision)| LeadReport::new(lead, decision))
        .collect();
    let output = create_output(
        start_time,
        Utc::now(),
        now,
        extra_data,
        summary,
        errors,
        reports,
    );
    write_output(&args.output_file, &output)?;

    info!("JSON output written to {}", args.output_file.display());
    Ok(())
}

fn run_variants(args: VariantsArgs, config: &MatchConfig) -> Result<()> {
    let names = load_dnc_names(&args.dnc.dnc)?;
    let rows = dnc_variant_rows(&names, config);
    write_variant_rows(&args.output_file, &rows)?;
    info!(
        "{} companies exported to {}",
        rows.len(),
        args.output_file.display()
    );
    Ok(())
}

fn run_cooldown(args: CooldownArgs, config: &MatchConfig) -> Result<()> {
    let Some(path) = args.history.recent_contacts.as_deref() else {
        bail!("No contact history configured. Set RECENT_CONTACTS_PATH or pass --recent-contacts.");
    };
    let now = evaluation_time(args.history.now);
    let history = load_recent_contacts(path, now)?;

    let blocked = history.blocked_companies(now, config);
    for (company, block) in &blocked {
        println!("{}: {}", company, block);
    }
    info!(
        "{} of {} companies currently in cooldown.",
        blocked.len(),
        history.len()
    );
    Ok(())
}

fn run_record(args: RecordArgs) -> Result<()> {
    let record = SendLogRecord {
        email: args.email,
        company: args.company,
        first_name: args.first_name,
        job_title: args.job_title,
        consultant: args.consultant,
        vestiging: args.vestiging,
        status: args.status,
        message_id: args.message_id,
        error: args.error,
        subject: args.subject,
        ..SendLogRecord::default()
    };
    let summary = format!(
        "{} for {} <{}>",
        record.status.trim(),
        record.company.trim(),
        record.email.trim()
    );

    let suppressed = record_send(&args.logs.send_log, &args.logs.suppression, record)?;
    info!("Recorded {}", summary);
    if suppressed {
        info!("Address added to {}", args.logs.suppression.display());
    }
    Ok(())
}

fn create_progress_bar(total_leads: usize) -> ProgressBar {
    let progress_bar = ProgressBar::new(total_leads as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} leads classified ({eta})")
    {
        progress_bar.set_style(style.progress_chars("#>-"));
    }
    progress_bar
}

fn log_summary(summary: &Summary) {
    info!("[GATE] {} leads evaluated:", summary.total);
    info!("       DNC:                      {}", summary.dnc);
    info!("       Already emailed:          {}", summary.suppressed_email);
    info!("       Company contacted before: {}", summary.contacted_company);
    info!("       In cooldown:              {}", summary.cooldown);
    info!("       Ready to send:            {}", summary.sendable);
}

fn create_output(
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    evaluated_at: NaiveDateTime,
    extra_data: ExtraData,
    summary: Summary,
    errors: Vec<String>,
    reports: Vec<LeadReport>,
) -> Output {
    let duration = (end_time - start_time).num_nanoseconds().unwrap_or(0) as f64 / 1_000_000_000.0;

    Output {
        headers: vec![Header {
            start_timestamp: start_time.to_rfc3339(),
            end_timestamp: end_time.to_rfc3339(),
            duration,
            evaluated_at: evaluated_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
            extra_data,
            errors,
            output_format_version: LEADGATE_OUTPUT_FORMAT_VERSION.to_string(),
        }],
        summary,
        leads: reports,
    }
}

fn write_output(output_file: &Path, output: &Output) -> Result<()> {
    let json_output = to_string_pretty(output)?;
    if let Some(parent) = output_file.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let mut file = File::create(output_file)
        .with_context(|| format!("Failed to create {}", output_file.display()))?;
    file.write_all(json_output.as_bytes())?;
    Ok(())
}
