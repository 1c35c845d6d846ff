//! Chat commands - terminal front end for the chat session

use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::domain::{ChatSnapshot, Message, SubmitOutcome, SubmitRejection, QUICK_QUESTIONS};

/// Arguments for the ask command
#[derive(Args, Clone, Debug)]
pub struct AskArgs {
    /// Question to ask
    pub question: String,
}

/// One line of terminal input
#[derive(Debug, Clone, PartialEq, Eq)]
enum ChatInput {
    Quit,
    Help,
    Quick(&'static str),
    Question(String),
    Unknown(String),
}

fn parse_input(line: &str) -> ChatInput {
    let line = line.trim();

    match line {
        "/quit" | "/exit" => ChatInput::Quit,
        "/help" => ChatInput::Help,
        _ if line.starts_with('/') => {
            let quick = line[1..]
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| QUICK_QUESTIONS.get(i).copied());

            match quick {
                Some(question) => ChatInput::Quick(question),
                None => ChatInput::Unknown(line.to_string()),
            }
        }
        _ => ChatInput::Question(line.to_string()),
    }
}

fn render_message(message: &Message) -> String {
    format!("you> {}\nbot> {}", message.question, message.answer)
}

fn usage_line(snapshot: &ChatSnapshot) -> String {
    format!(
        "{}/{} questions used",
        snapshot.usage_count, snapshot.usage_limit
    )
}

fn help_text() -> String {
    let mut text = String::from("Type a question, or pick one:\n");
    for (i, question) in QUICK_QUESTIONS.iter().enumerate() {
        text.push_str(&format!("  /{}  {}\n", i + 1, question));
    }
    text.push_str("  /quit to leave");
    text
}

const BLOCKED_NOTICE: &str =
    "You've reached the question limit for this session. Thanks for chatting!";

/// Run the interactive chat loop on stdin/stdout
pub async fn run() -> anyhow::Result<()> {
    let config = super::load_config();
    super::init_logging(&config);

    let store = super::open_store(&config)?;
    let handle = super::build_session(&config, store)?.spawn();

    let snapshot = handle.snapshot();
    for message in &snapshot.messages {
        println!("{}", render_message(message));
    }
    println!("{}", help_text());
    println!("{}", usage_line(&snapshot));
    if snapshot.is_blocked() {
        println!("{}", BLOCKED_NOTICE);
    }

    let mut shown = snapshot.messages.len();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let outcome = match parse_input(&line) {
            ChatInput::Quit => break,
            ChatInput::Help => {
                println!("{}", help_text());
                continue;
            }
            ChatInput::Unknown(command) => {
                println!("Unknown command {}, try /help", command);
                continue;
            }
            ChatInput::Quick(question) => handle.quick_submit(question).await?,
            ChatInput::Question(question) => {
                handle.set_input(question).await?;
                handle.submit().await?
            }
        };

        if let SubmitOutcome::Rejected(reason) = outcome {
            print_rejection(reason);
            continue;
        }

        let snapshot = handle.settled().await?;
        shown = print_new_messages(&snapshot, shown);

        if let Some(error) = &snapshot.last_error {
            println!("error: {}", error);
        }
        println!("{}", usage_line(&snapshot));
        if snapshot.is_blocked() {
            println!("{}", BLOCKED_NOTICE);
        }
    }

    info!("Chat session ended");
    Ok(())
}

/// Ask one question through the session and print the answer
pub async fn ask(args: AskArgs) -> anyhow::Result<()> {
    let config = super::load_config();
    super::init_logging(&config);

    let store = super::open_store(&config)?;
    let mut session = super::build_session(&config, store)?;

    session.set_input(args.question);
    match session.submit().await {
        SubmitOutcome::Answered(message) => {
            println!("{}", message.answer);
            println!("{}", usage_line(&session.snapshot()));
            Ok(())
        }
        SubmitOutcome::Failed(error) => anyhow::bail!(error),
        SubmitOutcome::Rejected(reason) => anyhow::bail!(reason),
        SubmitOutcome::Pending => anyhow::bail!("Question is still pending"),
    }
}

fn print_rejection(reason: SubmitRejection) {
    match reason {
        SubmitRejection::Blocked => println!("{}", BLOCKED_NOTICE),
        other => println!("{}", other),
    }
}

fn print_new_messages(snapshot: &ChatSnapshot, shown: usize) -> usize {
    for message in snapshot.messages.iter().skip(shown) {
        println!("{}", render_message(message));
    }
    snapshot.messages.len()
}
