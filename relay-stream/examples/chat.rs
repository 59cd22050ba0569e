//! Example: stream one reply from a Gemini proxy to the terminal.
//!
//! Reads the endpoint from `GEMINI_PROXY_URL` and the prompt from the
//! command line. Press Ctrl-C to stop the reply; the text received so far
//! stays in the conversation.
//!
//! Run with: `GEMINI_PROXY_URL=http://localhost:5001/api/gemini cargo run --example chat -p relay-stream -- "Explain SSE"`

use std::io::Write;

use relay_proxy::ProxyClient;
use relay_stream::Session;
use relay_types::GenerationConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let prompt = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    let prompt = if prompt.trim().is_empty() {
        "Say hello in three languages.".to_string()
    } else {
        prompt
    };

    let config = GenerationConfig::default().temperature(0.7);
    let mut session = Session::new(ProxyClient::from_env()?)
        .config(config)
        .snapshots(true);
    session.send(&prompt).await?;

    let handle = session.current().ok_or("exchange did not start")?;
    let stop = handle.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stop.cancel();
        }
    });

    // Snapshots carry the full text; print only what is new.
    let mut shown = 0;
    while let Some(text) = handle.next_snapshot().await {
        print!("{}", &text[shown..]);
        std::io::stdout().flush()?;
        shown = text.len();
    }
    println!();

    let state = session.wait().await;
    let conversation = session.snapshot().await;
    eprintln!("-- {state:?}, {} turns", conversation.turns.len());
    if let Some(error) = conversation.error {
        eprintln!("error: {error}");
    }
    Ok(())
}
