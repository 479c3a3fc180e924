use anyhow::{anyhow, bail, Result};
use std::path::PathBuf;

pub const HELP: &str = "\
Commands:
  search <query>          search the knowledge base
  select <n|title>        switch the visible result group
  chat <message>          ask the AI assistant
  cite <message> <doc>    open a cited document (1-based indices)
  reset                   clear the chat history
  interview <topic>       start a structured interview
  answer <text>           answer the current question
  skip                    skip the current question
  retry                   retry a failed summarization
  restart                 start a new interview after the summary
  summary                 show the interview summary
  gaps                    list knowledge gaps
  analyze <topic>         analyze gaps for one topic
  upload <path> <topic>   upload a file under a topic
  recommend               show recommended documents
  close                   close the summary overlay
  help                    show this help
  quit                    exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Select(String),
    Chat(String),
    Cite { message: usize, document: usize },
    Reset,
    Interview(String),
    Answer(String),
    Skip,
    Retry,
    Restart,
    Summary,
    Gaps,
    Analyze(String),
    Upload { path: PathBuf, topic: String },
    Recommend,
    Close,
    Help,
    Quit,
}

/// Parses one input line; `Ok(None)` for a blank line.
pub fn parse(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "search" | "s" => Command::Search(rest.to_string()),
        "select" => Command::Select(required(rest, "select <n|title>")?),
        "chat" | "c" => Command::Chat(rest.to_string()),
        "cite" => {
            let mut parts = rest.split_whitespace();
            let message = index(parts.next(), "message")?;
            let document = index(parts.next(), "document")?;
            Command::Cite { message, document }
        }
        "reset" => Command::Reset,
        "interview" => Command::Interview(rest.to_string()),
        "answer" | "a" => Command::Answer(rest.to_string()),
        "skip" => Command::Skip,
        "retry" => Command::Retry,
        "restart" => Command::Restart,
        "summary" => Command::Summary,
        "gaps" => Command::Gaps,
        "analyze" => Command::Analyze(rest.to_string()),
        "upload" => {
            let (path, topic) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| anyhow!("usage: upload <path> <topic>"))?;
            Command::Upload {
                path: PathBuf::from(path),
                topic: topic.trim().to_string(),
            }
        }
        "recommend" => Command::Recommend,
        "close" => Command::Close,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => bail!("unknown command '{}', try 'help'", other),
    };

    Ok(Some(command))
}

fn required(rest: &str, usage: &str) -> Result<String> {
    if rest.is_empty() {
        bail!("usage: {}", usage);
    }
    Ok(rest.to_string())
}

fn index(raw: Option<&str>, what: &str) -> Result<usize> {
    let raw = raw.ok_or_else(|| anyhow!("usage: cite <message> <doc>"))?;
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => bail!("{} index must be a positive number, got '{}'", what, raw),
    }
}
