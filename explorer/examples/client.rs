use std::sync::Arc;

use knowledge_explorer::{
    ClientConfig, ConversationDriver, DisplayState, HttpBackend, SearchDriver, SummaryViewer,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    let backend = Arc::new(HttpBackend::new(config)?);

    println!("🔍 Testing Knowledge Explorer Client");

    println!("\n📚 Search:");
    let mut search = SearchDriver::new(backend.clone());
    search.search("onboarding")?;
    search.settle_next().await;
    match search.state() {
        DisplayState::Results { groups, selected } => {
            println!("{} groups, showing '{}'", groups.len(), selected);
        }
        DisplayState::GapList(gaps) => println!("{} topics need more content", gaps.len()),
        other => println!("{:?}", other),
    }

    println!("\n💬 Chat:");
    let mut chat = ConversationDriver::new(backend);
    chat.send_message("What are the main topics covered in the onboarding documents?");
    chat.settle_next().await;

    let mut viewer = SummaryViewer::new();
    if let Some(reply) = chat.messages().last() {
        viewer.show(&reply.text);
        println!("{}", viewer.content_as_text().unwrap_or_default());
        if let Some(context) = &reply.context {
            println!("Documents found: {}", context.documents_found);
        }
    }

    println!("\n✅ Client test completed!");
    Ok(())
}
