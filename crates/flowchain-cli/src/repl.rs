use anyhow::Result;
use console::style;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use flowchain::agent::{Agent, TurnOutcome};
use flowchain::models::message::Message;
use flowchain::models::recommendation::Recommendation;
use flowchain::prompt::system_prompt;
use flowchain::session::Session;

const GREETING: &str = "Welcome to the Flowchain action recommendation assistant! \
Tell me the task you are trying to complete, and I will recommend actions to take.";

/// Sentinel inputs that end the conversation
fn is_exit(input: &str) -> bool {
    matches!(input.to_lowercase().as_str(), "exit" | "quit")
}

/// Run the interactive loop: one line in, one turn through the agent, the
/// recommendation rendered out.
pub async fn run(agent: Agent) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    let mut session = Session::new(&system_prompt()?);

    println!("{}\n", style(GREETING).cyan());

    loop {
        let line = match editor.readline("> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if is_exit(input) {
            break;
        }
        let _ = editor.add_history_entry(input);

        match agent
            .reply(&mut session, Message::user().with_text(input))
            .await
        {
            Ok(TurnOutcome::Answered(text)) => render(&text),
            Ok(TurnOutcome::Empty) => {
                println!("{}", style("The assistant had nothing to add.").dim());
            }
            // A gateway failure aborts the turn but not the conversation
            Err(e) => eprintln!("{} {}", style("error:").red().bold(), e),
        }
        println!();
    }

    Ok(())
}

/// Structured replies get the response plus a numbered action list; anything
/// else prints as-is.
fn render(text: &str) {
    match Recommendation::parse(text) {
        Some(recommendation) => {
            println!("{}", style(&recommendation.response).bold());
            for action in &recommendation.actions {
                println!("  {action}");
            }
        }
        None => println!("{text}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_sentinels() {
        assert!(is_exit("exit"));
        assert!(is_exit("QUIT"));
        assert!(!is_exit("exit now"));
        assert!(!is_exit("help"));
    }
}
