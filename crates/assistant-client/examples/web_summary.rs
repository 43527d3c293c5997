use assistant_client::prelude::*;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ClientError> {
    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "https://example.com".to_string());

    let client = ToolClient::new(ClientConfig::from_env()?)?;
    client
        .summarize_web(&WebSummaryRequest { url, prompt: None }, |event| {
            match event {
                ToolEvent::Working { label } => eprintln!("... {label}"),
                ToolEvent::IntermediateOutput { label, content } => {
                    eprintln!("[{label}]\n{content}")
                }
                ToolEvent::Output { content } => println!("{content}"),
                ToolEvent::Error { label, error } => {
                    eprintln!("{label}: {}", error.unwrap_or_default())
                }
                ToolEvent::Finished => eprintln!("done"),
            }
        })
        .await;
    Ok(())
}
