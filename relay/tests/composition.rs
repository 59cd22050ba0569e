//! Composition tests: the prelude is enough to plug in a custom transport.

use bytes::Bytes;
use relay::prelude::*;
use relay::relay_types::ByteStream;
use tokio_util::sync::CancellationToken;

/// Answers every stream with the same body, three bytes at a time.
struct CannedTransport {
    body: &'static str,
}

impl Transport for CannedTransport {
    fn open_stream(
        &self,
        _request: &ProxyRequest,
        _cancel: CancellationToken,
    ) -> impl Future<Output = Result<ByteStream, ExchangeError>> + Send {
        let chunks: Vec<Result<Bytes, ExchangeError>> = self
            .body
            .as_bytes()
            .chunks(3)
            .map(|c| Ok(Bytes::copy_from_slice(c)))
            .collect();
        async move {
            let stream: ByteStream = Box::pin(futures::stream::iter(chunks));
            Ok(stream)
        }
    }

    fn complete(
        &self,
        request: &ProxyRequest,
    ) -> impl Future<Output = Result<ProxyResponse, ExchangeError>> + Send {
        let reply = ProxyResponse::new(format!("echo: {}", request.prompt), None);
        async move { Ok(reply) }
    }
}

#[tokio::test]
async fn session_over_custom_transport() {
    let body = "data: {\"text\":\"¡Hola, \"}\n\ndata: {\"text\":\"mundo!\"}\n\nevent: done\ndata: {}\n\n";
    let mut session = Session::new(CannedTransport { body });

    session.send("Saluda").await.unwrap();
    assert_eq!(session.wait().await, Some(ExchangeState::Completed));

    session.set_streaming(false);
    session.send("Again").await.unwrap();

    let texts: Vec<String> = session
        .snapshot()
        .await
        .turns
        .into_iter()
        .map(|t| t.text)
        .collect();
    assert_eq!(texts, ["Saluda", "¡Hola, mundo!", "Again", "echo: Again"]);
}

#[test]
fn decoder_is_reachable_from_prelude() {
    let frames = FrameDecoder::new().frames("data: {\"text\":\"x\"}\n\n");
    assert_eq!(frames[0].text_delta(), "x");
    assert_eq!(Utf8Decoder::new().decode("ok".as_bytes()), "ok");
}

#[test]
fn proxy_client_is_reachable_from_prelude() {
    let client = ProxyClient::from_config(ProxyConfig::new("http://localhost:5001/api/gemini"))
        .expect("client should build");
    assert_eq!(client.endpoint_url(), "http://localhost:5001/api/gemini");
}
