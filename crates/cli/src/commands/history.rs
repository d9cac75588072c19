//! Browse and manage past generations.

use clap::Subcommand;

use eqori_client::EqoriClient;
use eqori_client::generation::DEFAULT_HISTORY_LIMIT;
use eqori_core::{GenerationId, GenerationPatch};

use crate::commands::{CommandError, confirm};
use crate::screen;

#[derive(Debug, Subcommand)]
pub enum HistoryAction {
    /// List past generations, newest first
    List {
        /// Records to skip (pagination)
        #[arg(long, default_value_t = 0)]
        skip: u32,

        /// Maximum records to list
        #[arg(long, default_value_t = DEFAULT_HISTORY_LIMIT)]
        limit: u32,
    },
    /// Show one generation in full
    Show {
        /// Generation ID
        id: i64,
    },
    /// Star a generation
    Favorite {
        /// Generation ID
        id: i64,
    },
    /// Unstar a generation
    Unfavorite {
        /// Generation ID
        id: i64,
    },
    /// Save edited copy back onto a generation
    Edit {
        /// Generation ID
        id: i64,

        /// Replacement product description
        #[arg(long)]
        description: Option<String>,

        /// Replacement ad copy (repeat the flag for each variant)
        #[arg(long = "ad")]
        ad_copy: Vec<String>,

        /// Replacement email blurb
        #[arg(long = "email-blurb")]
        email_blurb: Option<String>,
    },
    /// Delete a generation
    Delete {
        /// Generation ID
        id: i64,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

pub async fn run(client: &EqoriClient, action: &HistoryAction) -> Result<(), CommandError> {
    let state = screen::resolve_session(client).await;
    screen::gate_authenticated(&state)?;

    match action {
        HistoryAction::List { skip, limit } => {
            let records = client.generation().history(*skip, *limit).await?;
            if records.is_empty() {
                println!("No generations yet. Try `eqori generate --name \"...\"`.");
                return Ok(());
            }
            for record in &records {
                screen::print_record_row(record);
            }
        }
        HistoryAction::Show { id } => {
            let record = client.generation().get(GenerationId::new(*id)).await?;
            screen::print_record(&record);
        }
        HistoryAction::Favorite { id } => {
            let record = client
                .generation()
                .set_favorite(GenerationId::new(*id), true)
                .await?;
            println!("Starred #{}.", record.id);
        }
        HistoryAction::Unfavorite { id } => {
            let record = client
                .generation()
                .set_favorite(GenerationId::new(*id), false)
                .await?;
            println!("Unstarred #{}.", record.id);
        }
        HistoryAction::Edit {
            id,
            description,
            ad_copy,
            email_blurb,
        } => {
            let patch = GenerationPatch {
                is_favorite: None,
                description: description.clone(),
                ad_copy: if ad_copy.is_empty() {
                    None
                } else {
                    Some(ad_copy.clone())
                },
                email_blurb: email_blurb.clone(),
            };
            // Inline validation: an empty patch never issues a request.
            if patch.is_empty() {
                eprintln!("Nothing to change: pass --description, --ad, or --email-blurb.");
                return Err(CommandError::Refused("empty edit".to_string()));
            }
            let record = client.generation().update(GenerationId::new(*id), patch).await?;
            println!("Updated #{}.", record.id);
        }
        HistoryAction::Delete { id, yes } => {
            if !*yes && !confirm(&format!("Delete generation #{id}? This cannot be undone."))? {
                return Err(CommandError::Aborted);
            }
            client.generation().delete(GenerationId::new(*id)).await?;
            println!("Deleted #{id}.");
        }
    }
    Ok(())
}
