//! Basic OpenAI client usage example

use openai_client::{ChatRequest, Message, OpenAIClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize from environment
    let client = OpenAIClient::from_env()?;

    let response = client
        .chat_completion(
            ChatRequest::new("gpt-4o-mini")
                .message(Message::system("You are a helpful assistant."))
                .message(Message::user("What is Rust in one sentence?"))
                .temperature(0.7)
                .max_tokens(100),
        )
        .await?;

    match response.content {
        Some(content) => println!("Response: {}", content),
        None => println!("The model returned no text"),
    }

    Ok(())
}
