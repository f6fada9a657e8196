#[cfg(test)]
#[path = "console_test.rs"]
mod tests;

use std::io::Write;

use anyhow::Result;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use yansi::Paint;

use super::cli;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Citation;
use crate::domain::models::Message;
use crate::domain::models::Rating;
use crate::domain::models::SlashCommand;
use crate::domain::models::UserRole;
use crate::domain::services::ChatSession;

/// The part of `content` that hasn't been printed yet. Content only ever grows
/// while an answer streams, so `printed` is always a char boundary.
pub fn render_delta(content: &str, printed: usize) -> &str {
    return content.get(printed..).unwrap_or_default();
}

pub fn format_greeting(username: &str, role: Option<UserRole>) -> String {
    let role_text = match role {
        Some(role) => format!("Answers are tailored for: {}.", role.backend_value()),
        None => "Answers are kept general.".to_string(),
    };

    return format!("Hey {username}! Ask me anything about the documentation. {role_text} Type /help for commands.");
}

pub fn format_sources(citations: &[Citation]) -> String {
    if citations.is_empty() {
        return "".to_string();
    }

    let lines = citations
        .iter()
        .enumerate()
        .map(|(idx, citation)| {
            if citation.title.is_empty() || citation.url.is_empty() {
                return format!("  {}. {}", idx + 1, citation.label());
            }
            return format!("  {}. {} ({})", idx + 1, citation.title, citation.url);
        })
        .collect::<Vec<String>>()
        .join("\n");

    return format!("Sources:\n{lines}");
}

pub fn format_suggestions(queries: &[String]) -> String {
    if queries.is_empty() {
        return "".to_string();
    }

    let lines = queries
        .iter()
        .map(|query| return format!("  - {query}"))
        .collect::<Vec<String>>()
        .join("\n");

    return format!("You might also ask:\n{lines}");
}

/// Everything shown under an answer once it finished streaming.
pub fn format_footer(message: &Message) -> String {
    let mut sections = vec![];
    if let Some(citations) = &message.citations {
        sections.push(format_sources(citations));
    }
    if let Some(queries) = &message.suggested_queries {
        sections.push(format_suggestions(queries));
    }

    return sections
        .into_iter()
        .filter(|section| return !section.is_empty())
        .collect::<Vec<String>>()
        .join("\n\n");
}

fn flush_print(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{text}")?;
    stdout.flush()?;
    return Ok(());
}

/// Sends `text` and prints the answer as it streams in.
async fn ask(session: &mut ChatSession, text: &str) -> Result<()> {
    let mut rx = session.subscribe();
    let mut printed = 0;

    {
        let send = session.send_message(text);
        tokio::pin!(send);

        loop {
            tokio::select! {
                _ = &mut send => break,
                changed = rx.changed() => {
                    if changed.is_err() {
                        break;
                    }

                    let content = rx
                        .borrow_and_update()
                        .last_assistant()
                        .map(|msg| return msg.content.to_string())
                        .unwrap_or_default();
                    flush_print(render_delta(&content, printed))?;
                    printed = content.len();
                }
            }
        }
    }

    let transcript = session.transcript();
    if let Some(answer) = transcript.last_assistant() {
        flush_print(render_delta(&answer.content, printed))?;
        println!();

        let footer = format_footer(answer);
        if !footer.is_empty() {
            println!("\n{}", Paint::cyan(footer));
        }
    }
    println!();

    return Ok(());
}

async fn rate(session: &mut ChatSession, rating: Rating, args: &[String]) {
    let comment = args.join(" ").trim().to_string();
    let comment = if comment.is_empty() {
        None
    } else {
        Some(comment)
    };

    match session.submit_feedback(rating, comment).await {
        Ok(_) => println!("{}\n", Paint::green("Thanks for the feedback!")),
        Err(err) => println!("{}\n", Paint::yellow(err)),
    }
}

pub async fn start(mut session: ChatSession) -> Result<()> {
    if let Err(err) = session.health_check().await {
        tracing::warn!(error = ?err, "Backend health check failed");
        println!(
            "{}\n",
            Paint::yellow(format!(
                "Warning: {err}. Questions will likely fail until {} is reachable.",
                Config::get(ConfigKey::BackendURL)
            ))
        );
    }

    let username = Config::get(ConfigKey::Username);
    println!(
        "{}\n",
        format_greeting(&username, session.user_role())
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        flush_print(&format!("{} ", Paint::new(format!("{username}>")).bold()))?;

        let line = match lines.next_line().await? {
            Some(line) => line,
            None => break,
        };

        if let Some(cmd) = SlashCommand::parse(&line) {
            if cmd.is_quit() {
                break;
            }
            if cmd.is_help() {
                println!("{}\n", cli::help_text());
                continue;
            }
            if cmd.is_thumbs_up() {
                rate(&mut session, Rating::ThumbsUp, &cmd.args).await;
                continue;
            }
            if cmd.is_thumbs_down() {
                rate(&mut session, Rating::ThumbsDown, &cmd.args).await;
                continue;
            }
        }

        if line.trim().is_empty() {
            continue;
        }

        println!();
        ask(&mut session, &line).await?;
    }

    tracing::debug!(session_id = %session.id(), "Chat session ended");
    return Ok(());
}
