//! Roster commands

use anyhow::{Context, Result};
use rollcall_attendance::ServiceContext;
use rollcall_core::Participant;

use crate::RosterAction;

pub async fn handle(ctx: &ServiceContext, action: RosterAction) -> Result<()> {
    let admin = ctx.roster_admin();

    match action {
        RosterAction::List => {
            let snapshot = admin.list();
            println!("{:<12} {:<30} Token", "ID", "Name");
            println!("{}", "-".repeat(60));
            for p in snapshot.participants() {
                println!("{:<12} {:<30} {}", p.id, p.display_name, p.token_or_empty());
            }
            println!("\n{} participants", snapshot.len());
        }
        RosterAction::Import { file } => {
            let count = admin
                .import(&file)
                .await
                .with_context(|| format!("Failed to import {:?}", file))?;
            println!("✅ Imported {} participants", count);
        }
        RosterAction::Add { id, name, token } => {
            let mut participant = Participant::new(&id, &name);
            if let Some(token) = token.as_deref() {
                participant = participant.with_token(token);
            }
            let added = admin.add(participant).await.context("Failed to add participant")?;
            println!("✅ Added {} ({})", added.display_name, added.id);
        }
    }

    Ok(())
}
