//! Chat CLI commands: send a turn, list conversations, print history, delete.
//!
//! Every command acts on behalf of the user named by `--email`; ownership
//! rules are the same as over HTTP.

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Confirm;
use threadline_core::chat::orchestrator::TurnRequest;
use threadline_types::chat::MessageRole;
use uuid::Uuid;

use crate::state::AppState;

fn parse_conversation_id(id: &str) -> Result<Uuid> {
    id.parse::<Uuid>()
        .with_context(|| format!("Invalid conversation ID: {id}"))
}

pub async fn send(
    state: &AppState,
    email: &str,
    message: String,
    model: Option<String>,
    json: bool,
) -> Result<()> {
    let user = state.identity.find_by_email(email).await?;
    let cancel = state.shutdown.child_token();

    let reply = state
        .orchestrator
        .send(user.id, TurnRequest { model, message }, &cancel)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
    } else {
        println!();
        println!("{}", reply.content);
        println!();
        println!(
            "  {}",
            style(format!(
                "conversation {} · {} tokens",
                reply.conversation_id, reply.token_count
            ))
            .dim()
        );
    }
    Ok(())
}

pub async fn list(state: &AppState, email: &str, json: bool) -> Result<()> {
    let user = state.identity.find_by_email(email).await?;
    let conversations = state.conversations.list(&user.id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&conversations)?);
        return Ok(());
    }

    if conversations.is_empty() {
        println!();
        println!("  No conversations yet for {}.", style(&user.email).cyan());
        println!(
            "  Start one with: {}",
            style(format!("threadline chat send -u {} \"hello\"", user.email)).yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Title").fg(Color::White),
        Cell::new("Created").fg(Color::White),
    ]);

    for conversation in &conversations {
        table.add_row(vec![
            Cell::new(conversation.id).fg(Color::DarkGrey),
            Cell::new(&conversation.title),
            Cell::new(conversation.created_at.format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}

pub async fn history(state: &AppState, email: &str, id: &str, json: bool) -> Result<()> {
    let user = state.identity.find_by_email(email).await?;
    let id = parse_conversation_id(id)?;
    let messages = state.conversations.messages(&user.id, &id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
        return Ok(());
    }

    println!();
    for message in &messages {
        let who = match message.role {
            MessageRole::User => style("you").cyan().bold(),
            MessageRole::Assistant => style(message.model.as_str()).magenta().bold(),
        };
        println!(
            "  {} {}",
            who,
            style(message.created_at.format("%H:%M:%S")).dim()
        );
        println!("  {}", message.content);
        println!();
    }
    Ok(())
}

pub async fn delete(state: &AppState, email: &str, id: &str, force: bool, json: bool) -> Result<()> {
    let user = state.identity.find_by_email(email).await?;
    let id = parse_conversation_id(id)?;
    let conversation = state.conversations.get(&user.id, &id).await?;

    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Permanently delete conversation '{}' and all its messages?",
                style(&conversation.title).red().bold()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    state.conversations.delete(&user.id, &id).await?;

    if json {
        println!("{}", serde_json::json!({"deleted": true, "id": id}));
    } else {
        println!(
            "  {} Conversation '{}' deleted.",
            style("✓").red().bold(),
            conversation.title
        );
    }
    Ok(())
}
