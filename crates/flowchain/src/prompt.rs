use anyhow::Result;
use chrono::{Local, NaiveDate};
use tera::{Context, Tera};

/// The default system prompt, dated so the model can resolve relative times.
/// The text is configuration as far as the dispatch loop is concerned; front
/// ends may substitute their own.
pub fn system_prompt() -> Result<String> {
    system_prompt_for(Local::now().date_naive())
}

pub fn system_prompt_for(today: NaiveDate) -> Result<String> {
    let mut context = Context::new();
    context.insert("today", &today.format("%Y-%m-%d").to_string());
    let rendered = Tera::one_off(include_str!("prompts/system.md"), &context, false)?;
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_carries_date() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let prompt = system_prompt_for(date).unwrap();
        assert!(prompt.starts_with("Today's date is 2024-06-03."));
        assert!(prompt.contains("\"Actions\""));
    }

    #[test]
    fn test_prompt_mentions_builtin_tools() {
        let prompt = system_prompt().unwrap();
        for tool in ["get_shortcuts", "run_shortcut", "generate_and_run_script", "run_command"] {
            assert!(prompt.contains(tool), "prompt missing {tool}");
        }
    }
}
