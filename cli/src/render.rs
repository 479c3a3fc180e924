use knowledge_explorer::{
    ChatMessage, DisplayState, DocType, GapReport, HtmlSanitizer, InterviewDriver,
    InterviewStage, Notice, Recommendation, SearchDriver, Sender, SummaryViewer,
};

pub fn notice(notice: Option<Notice>) {
    if let Some(notice) = notice {
        println!("! {}", notice.message);
    }
}

pub fn search(driver: &SearchDriver) {
    match driver.state() {
        DisplayState::NotSearched => println!("Please enter a search query"),
        DisplayState::Empty => println!(
            "No results found for \"{}\"",
            driver.last_query().unwrap_or_default()
        ),
        DisplayState::GapList(gaps) => {
            println!(
                "⚠ {} topic{} lack expert advice!",
                gaps.len(),
                if gaps.len() == 1 { "" } else { "s" }
            );
            for gap in gaps {
                match &gap.reason {
                    Some(reason) => println!("  - {}: {}", gap.topic, reason),
                    None => println!("  - {}", gap.topic),
                }
            }
        }
        DisplayState::Results { groups, selected } => {
            for (i, (title, results)) in groups.iter().enumerate() {
                let marker = if title == selected { '>' } else { ' ' };
                println!("{} {}. {} ({})", marker, i + 1, title, results.len());
            }
            if let Some((_, results)) = driver.current_group() {
                println!();
                for result in results {
                    let source = result.original_filename.as_deref().unwrap_or("untitled");
                    let author = result.author.as_deref().unwrap_or("unknown");
                    println!("  [{:.2}] {} by {}", result.score, source, author);
                    match result.doc_type {
                        DocType::Summary => println!("         (summary, open with a chat citation)"),
                        DocType::Document => {
                            if let Some(link) = &result.file_link {
                                println!("         {}", link);
                            }
                            if !result.matched_keywords.is_empty() {
                                println!("         keywords: {}", result.matched_keywords.join(", "));
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn chat_message(index: usize, message: &ChatMessage, sanitizer: &HtmlSanitizer) {
    let who = match message.sender {
        Sender::User => "you",
        Sender::Ai => "ai",
    };
    let time = message.timestamp.format("%H:%M:%S");

    if message.is_loading {
        println!("[{}] {} {}: ...", index + 1, time, who);
        return;
    }
    println!("[{}] {} {}: {}", index + 1, time, who, sanitizer.plain_text(&message.text));

    if let Some(context) = &message.context {
        if !context.relevant_topics.is_empty() {
            println!("    topics: {}", context.relevant_topics.join(", "));
        }
        for (i, doc) in context.documents.iter().enumerate() {
            let kind = match doc.doc_type {
                DocType::Document => "document",
                DocType::Summary => "summary",
            };
            println!("    ({}) {} [{}]", i + 1, doc.title, kind);
        }
    }
}

pub fn interview(driver: &InterviewDriver) {
    let session = driver.session();
    match driver.stage() {
        InterviewStage::Intake if driver.is_busy() => println!("Generating questions..."),
        InterviewStage::Intake => println!("Enter a topic with 'interview <topic>'"),
        InterviewStage::Questioning(i) => {
            println!("Question {} of {}", i + 1, session.questions.len());
            println!("  {}", session.current_question().unwrap_or_default());
        }
        InterviewStage::Summarizing if driver.summary_failed() => {
            println!("Summary failed; use 'retry' to try again")
        }
        InterviewStage::Summarizing => println!("Summarizing {} answers...", session.answers.len()),
        InterviewStage::Summarized => {
            println!("Interview on '{}' summarized; 'summary' to read it", session.topic)
        }
    }
}

pub fn gaps(report: &GapReport, sanitizer: &HtmlSanitizer) {
    if report.gaps.is_empty() {
        println!("No knowledge gaps found. Try analyzing a specific topic.");
        return;
    }
    println!("{}", sanitizer.plain_text(&report.html_content));
}

pub fn recommendations(recommendations: &[Recommendation]) {
    if recommendations.is_empty() {
        println!("No recommendations yet");
        return;
    }
    for doc in recommendations {
        let keywords = if doc.keywords.is_empty() {
            "No keywords".to_string()
        } else {
            doc.keywords.join(", ")
        };
        println!("- {} ({})", doc.title, keywords);
        if let Some(link) = &doc.file_link {
            println!("  {}", link);
        }
    }
}

pub fn viewer(viewer: &SummaryViewer) {
    if let Some(text) = viewer.content_as_text() {
        println!("──── summary ────");
        println!("{}", text);
        println!("──── 'close' to dismiss ────");
    }
}
