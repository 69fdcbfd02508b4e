//! Database and context setup

use anyhow::{Context, Result};
use rollcall_attendance::{load_roster_file, LedgerSettings, RosterStore, ServiceContext};
use rollcall_config::RollcallConfig;
use rollcall_persistence::Database;
use std::sync::Arc;

/// Create the database file and schema
pub async fn init(config: &RollcallConfig) -> Result<()> {
    let db = Database::open(&config.storage.database)
        .await
        .context("Failed to initialize database")?;
    db.close().await;
    println!("✅ Database initialized at {:?}", config.storage.database);
    Ok(())
}

/// Open the database, load the roster, and wire the engine
pub async fn context(config: &RollcallConfig) -> Result<ServiceContext> {
    let db = Database::open(&config.storage.database)
        .await
        .with_context(|| format!("Failed to open database {:?}", config.storage.database))?;

    let participants = load_roster_file(&config.storage.roster)
        .with_context(|| format!("Failed to read roster {:?}", config.storage.roster))?;
    let roster = RosterStore::from_participants(participants).context("Invalid roster")?;

    let settings = LedgerSettings {
        default_limit: config.attendance.default_limit,
        session_label_prefix: config.attendance.session_label_prefix.clone(),
    };

    Ok(ServiceContext::new(db.pool().clone(), Arc::new(roster))
        .with_settings(settings)
        .with_roster_file(&config.storage.roster))
}

pub async fn show_status(config: &RollcallConfig) -> Result<()> {
    if !config.storage.database.exists() {
        println!("❌ Database not found at {:?}", config.storage.database);
        println!("   Run 'rollcall init' to create the database");
        return Ok(());
    }

    let ctx = context(config).await?;
    let records = ctx.attendance().count().await?;
    let sessions = ctx.sessions().list_sessions().await?;
    let active = ctx.sessions().active_session().await?;

    println!("📊 Rollcall Status");
    println!("   Database: {:?}", config.storage.database);
    println!("   Roster:   {:?}", config.storage.roster);
    println!();
    println!("   Participants: {}", ctx.roster().len());
    println!("   Sessions:     {}", sessions.len());
    println!("   Check-ins:    {}", records);
    match active {
        Some(s) => println!("   Active:       #{} {} (since {})", s.id, s.label, s.opened_at),
        None => println!("   Active:       none (day scope)"),
    }
    Ok(())
}
