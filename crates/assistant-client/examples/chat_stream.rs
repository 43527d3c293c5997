use std::io::{Write as _, stdout};

use assistant_client::prelude::*;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ClientError> {
    let prompt = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Say hello".to_string());

    let client = ChatClient::new(ClientConfig::from_env()?)?;
    let mut messages = vec![ChatMessage::new(Role::User, prompt)];
    let mut stream = client
        .stream_completion(&messages, &ChatParams::default())
        .await?;

    let mut reply = String::new();
    while let Some(delta) = stream.next_delta().await {
        let delta = delta?;
        print!("{delta}");
        stdout().flush().ok();
        reply.push_str(&delta);
    }
    println!();

    messages.push(ChatMessage::new(Role::Assistant, reply));
    let mut store = TranscriptStore::new();
    store.save(ChatTranscript::from_messages(uuid::Uuid::new_v4(), messages));
    eprintln!("saved {} transcript(s)", store.all().len());
    Ok(())
}
