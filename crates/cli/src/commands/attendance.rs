//! Check-in, listing, summary and export

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rollcall_attendance::{AttendanceFilter, ServiceContext};
use rollcall_core::{RosterQuery, Scope, ScopeDescriptor, ValidationOutcome};
use rollcall_reports::{AttendanceReport, ExportFormat, SummaryReport};
use std::path::PathBuf;

use crate::CheckinArgs;

pub async fn check_in(ctx: &ServiceContext, args: CheckinArgs) -> Result<()> {
    let query = RosterQuery::new(args.id.as_deref(), args.name.as_deref(), args.token.as_deref());

    match ctx.validator().validate(&query).await? {
        ValidationOutcome::Invalid => println!("❌ No roster match"),
        ValidationOutcome::Valid(check_in) => {
            let scope = match &check_in.scope {
                ScopeDescriptor::Session { session } => format!("session #{} {}", session.id, session.label),
                ScopeDescriptor::Day { date } => format!("day {}", date),
            };
            match (check_in.timestamp, check_in.reason) {
                (Some(at), _) => println!(
                    "✅ {} ({}) checked in at {} [{}]",
                    check_in.participant.display_name, check_in.participant.id, at, scope
                ),
                (None, reason) => println!(
                    "⚠️  {} ({}) not logged: {} [{}]",
                    check_in.participant.display_name,
                    check_in.participant.id,
                    reason.map(|r| r.as_str()).unwrap_or("already logged"),
                    scope
                ),
            }
        }
    }
    Ok(())
}

pub async fn list(
    ctx: &ServiceContext,
    session: Option<i64>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    limit: Option<u32>,
) -> Result<()> {
    let filter = AttendanceFilter {
        session_id: session,
        date_from: from,
        date_to: to,
    };
    let records = ctx
        .attendance()
        .query(&filter, limit.unwrap_or(0))
        .await?;

    println!(
        "{:<20} {:<12} {:<28} {:<8} Token",
        "Timestamp", "ID", "Name", "Session"
    );
    println!("{}", "-".repeat(90));
    for r in &records {
        println!(
            "{:<20} {:<12} {:<28} {:<8} {}",
            r.recorded_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            r.participant_id,
            r.display_name,
            r.scope_id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string()),
            r.secondary_token
        );
    }
    println!("\n{} records", records.len());
    Ok(())
}

pub async fn summary(
    ctx: &ServiceContext,
    session: Option<i64>,
    date: Option<NaiveDate>,
    format: ExportFormat,
) -> Result<()> {
    let scope = match (session, date) {
        (Some(id), _) => Scope::Session(id),
        (None, Some(date)) => Scope::Day(date),
        (None, None) => anyhow::bail!("provide --session or --date"),
    };

    let summary = ctx.attendance().summarize(&scope).await?;
    print!("{}", format.exporter().export(&SummaryReport::new(summary)));
    Ok(())
}

pub async fn export(
    ctx: &ServiceContext,
    format: ExportFormat,
    output: Option<PathBuf>,
    session: Option<i64>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<()> {
    let filter = AttendanceFilter {
        session_id: session,
        date_from: from,
        date_to: to,
    };
    let records = ctx.attendance().query_all(&filter).await?;
    let report = AttendanceReport::from_records("Attendance", &records).with_generated_at(ctx.now());
    let content = format.exporter().export(&report);

    match output {
        Some(path) => {
            std::fs::write(&path, content)
                .with_context(|| format!("Failed to write {:?}", path))?;
            println!("✅ Exported {} records ({}) to {:?}", records.len(), format, path);
        }
        None => print!("{}", content),
    }
    Ok(())
}
