mod command;
mod render;

use std::sync::Arc;

use anyhow::Result;
use command::{Command, HELP};
use knowledge_explorer::{
    upload_file, CitationAction, ClientConfig, ConversationDriver, DisplayState, GapExplorer,
    HttpBackend, InterviewDriver, KnowledgeBackend, SearchDriver, SummaryViewer,
};
use tokio::io::{AsyncBufReadExt, BufReader};

struct Session {
    backend: Arc<HttpBackend>,
    search: SearchDriver,
    chat: ConversationDriver,
    interview: InterviewDriver,
    gaps: GapExplorer,
    viewer: SummaryViewer,
}

impl Session {
    fn new(backend: Arc<HttpBackend>) -> Self {
        Self {
            search: SearchDriver::new(backend.clone()),
            chat: ConversationDriver::new(backend.clone()),
            interview: InterviewDriver::new(backend.clone()),
            gaps: GapExplorer::new(backend.clone()),
            viewer: SummaryViewer::new(),
            backend,
        }
    }

    /// Returns `false` when the user asked to quit.
    async fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Search(query) => report(self.search.search(&query)),
            Command::Select(key) => {
                let key = resolve_group(self.search.state(), &key).unwrap_or(key);
                match self.search.select_group(&key) {
                    Ok(()) => render::search(&self.search),
                    Err(e) => println!("! {}", e),
                }
            }
            Command::Chat(text) => {
                if self.chat.send_message(&text).is_some() {
                    self.print_last_messages(2);
                }
            }
            Command::Cite { message, document } => self.cite(message, document),
            Command::Reset => {
                self.chat.reset();
                println!("Chat cleared");
            }
            Command::Interview(topic) => {
                report(self.interview.start(&topic));
                render::interview(&self.interview);
            }
            Command::Answer(text) => {
                report(self.interview.answer(&text).map(|_| ()));
                render::interview(&self.interview);
            }
            Command::Skip => {
                report(self.interview.skip().map(|_| ()));
                render::interview(&self.interview);
            }
            Command::Retry => report(self.interview.retry_summary()),
            Command::Restart => {
                report(self.interview.reset());
                render::interview(&self.interview);
            }
            Command::Summary => match &self.interview.session().summary {
                Some(summary) => {
                    self.viewer.show(summary);
                    render::viewer(&self.viewer);
                }
                None => println!("No summary yet"),
            },
            Command::Gaps => self.gaps.refresh(),
            Command::Analyze(topic) => report(self.gaps.analyze(&topic)),
            Command::Upload { path, topic } => {
                match upload_file(self.backend.as_ref(), &topic, &path).await {
                    Ok(()) => println!("Knowledge content uploaded successfully!"),
                    Err(e) => println!("! {}", e),
                }
            }
            Command::Recommend => match self.backend.recommendations().await {
                Ok(docs) => render::recommendations(&docs),
                Err(e) => {
                    log::error!("Recommendations failed: {}", e);
                    println!("! {}", knowledge_explorer::Operation::Recommendations.failure_message());
                }
            },
            Command::Close => self.viewer.dismiss(),
            Command::Help => println!("{}", HELP),
            Command::Quit => return false,
        }
        true
    }

    fn cite(&mut self, message: usize, document: usize) {
        let doc = self
            .chat
            .messages()
            .get(message)
            .and_then(|m| m.context.as_ref())
            .and_then(|c| c.documents.get(document))
            .cloned();

        let Some(doc) = doc else {
            println!("! no such citation");
            return;
        };
        match self.chat.cite_document(&doc, &mut self.viewer) {
            CitationAction::ShowSummary => render::viewer(&self.viewer),
            CitationAction::OpenLink(link) => println!("Open: {}", link),
            CitationAction::Ignored => println!("Nothing to open for '{}'", doc.title),
        }
    }

    fn print_last_messages(&self, count: usize) {
        let messages = self.chat.messages();
        let start = messages.len().saturating_sub(count);
        for (i, message) in messages.iter().enumerate().skip(start) {
            render::chat_message(i, message, self.viewer.sanitizer());
        }
    }
}

fn report(outcome: knowledge_explorer::Result<()>) {
    if let Err(e) = outcome {
        println!("! {}", e);
    }
}

fn resolve_group(state: &DisplayState, raw: &str) -> Option<String> {
    let n: usize = raw.parse().ok()?;
    match state {
        DisplayState::Results { groups, .. } => groups
            .get_index(n.checked_sub(1)?)
            .map(|(key, _)| key.clone()),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // reads .env before the logger looks at RUST_LOG
    let config = ClientConfig::from_env()?;
    env_logger::init();

    let backend = Arc::new(HttpBackend::new(config)?);
    let mut session = Session::new(backend);

    println!("Knowledge Explorer: type 'help' for commands");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match command::parse(&line) {
                    Ok(Some(command)) => {
                        if !session.handle(command).await {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => println!("! {}", e),
                }
            }
            _ = session.search.settle_next() => {
                render::notice(session.search.take_notice());
                render::search(&session.search);
            }
            applied = session.chat.settle_next() => {
                if applied {
                    session.print_last_messages(1);
                }
            }
            outcome = session.interview.settle_next() => {
                if let Some(Err(e)) = &outcome {
                    log::debug!("Interview step failed: {}", e);
                }
                render::notice(session.interview.take_notice());
                render::interview(&session.interview);
            }
            _ = session.gaps.settle_next() => {
                render::notice(session.gaps.take_notice());
                if let Some(report) = session.gaps.report() {
                    render::gaps(report, session.viewer.sanitizer());
                }
            }
        }
    }

    log::info!("Bye");
    Ok(())
}
