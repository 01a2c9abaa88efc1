//! User CLI commands: create, show.

use anyhow::Result;
use console::style;

use crate::state::AppState;

/// Create a user and print the freshly issued API key.
///
/// The key is only ever shown here; the database keeps its hash.
pub async fn create_user(state: &AppState, email: &str, json: bool) -> Result<()> {
    let issued = state.identity.create_user(email).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "user": issued.user,
                "api_key": issued.api_key,
            }))?
        );
        return Ok(());
    }

    println!();
    println!(
        "  {} User {} created.",
        style("✓").green().bold(),
        style(&issued.user.email).cyan()
    );
    println!();
    println!(
        "  {} API key (save this -- it won't be shown again):",
        style("🔑").bold()
    );
    println!();
    println!("  {}", style(&issued.api_key).yellow().bold());
    println!();
    Ok(())
}

pub async fn show_user(state: &AppState, email: &str, json: bool) -> Result<()> {
    let user = state.identity.find_by_email(email).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&user)?);
        return Ok(());
    }

    println!();
    println!("  {}    {}", style("Email").bold(), user.email);
    println!("  {}       {}", style("ID").bold(), style(user.id).dim());
    println!(
        "  {}  {}",
        style("Created").bold(),
        user.created_at.format("%Y-%m-%d %H:%M UTC")
    );
    println!();
    Ok(())
}
