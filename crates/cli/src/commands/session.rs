//! Session commands

use anyhow::Result;
use rollcall_attendance::ServiceContext;
use rollcall_core::Session;

use crate::SessionAction;

fn describe(s: &Session) -> String {
    match s.closed_at {
        Some(closed) => format!("#{} {} ({} - {})", s.id, s.label, s.opened_at, closed),
        None => format!("#{} {} (open since {})", s.id, s.label, s.opened_at),
    }
}

pub async fn handle(ctx: &ServiceContext, action: SessionAction) -> Result<()> {
    let sessions = ctx.sessions();

    match action {
        SessionAction::Open { label } => {
            let session = sessions.open_session(label.as_deref()).await?;
            println!("✅ Session started: {}", describe(&session));
        }
        SessionAction::Close => match sessions.close_session().await? {
            Some(session) => println!("✅ Session ended: {}", describe(&session)),
            None => println!("No active session to end"),
        },
        SessionAction::Show => match sessions.active_session().await? {
            Some(session) => println!("{}", describe(&session)),
            None => println!("No active session; check-ins are scoped to the day"),
        },
        SessionAction::List => {
            for session in sessions.list_sessions().await? {
                println!("{}", describe(&session));
            }
        }
    }

    Ok(())
}
