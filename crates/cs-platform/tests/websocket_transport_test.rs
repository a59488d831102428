use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use cs_core::{ServerAddress, TransportCommand, TransportEvent, TransportPort, DEFAULT_PORT};
use cs_platform::WebSocketTransport;
use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_async, WebSocketStream};

const WAIT: Duration = Duration::from_secs(5);

async fn local_server() -> Result<(TcpListener, ServerAddress)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    let address = ServerAddress::parse(&format!("127.0.0.1:{port}"), DEFAULT_PORT)?;
    Ok((listener, address))
}

async fn accept(listener: &TcpListener) -> Result<WebSocketStream<TcpStream>> {
    let (stream, _) = listener.accept().await?;
    accept_async(stream).await.context("websocket handshake")
}

async fn next_event(
    events: &mut mpsc::UnboundedReceiver<TransportEvent>,
) -> Result<TransportEvent> {
    timeout(WAIT, events.recv())
        .await
        .context("timed out waiting for transport event")?
        .ok_or_else(|| anyhow!("event channel closed"))
}

#[tokio::test]
async fn frames_flow_in_both_directions() -> Result<()> {
    let (listener, address) = local_server().await?;
    let transport = WebSocketTransport::new(WAIT);

    let (client, server) = tokio::join!(transport.connect(&address), accept(&listener));
    let mut channel = client?;
    let mut server = server?;

    assert_eq!(next_event(&mut channel.events).await?, TransportEvent::Opened);

    let frame = r#"{"type":"clipboard","content":"hello","source":"laptop"}"#;
    channel
        .commands
        .send(TransportCommand::Send(frame.to_string()))?;
    let received = timeout(WAIT, server.next())
        .await?
        .ok_or_else(|| anyhow!("server stream ended"))??;
    assert_eq!(received, Message::Text(frame.to_string()));

    server
        .send(Message::Text(r#"{"type":"ping"}"#.to_string()))
        .await?;
    assert_eq!(
        next_event(&mut channel.events).await?,
        TransportEvent::Message(r#"{"type":"ping"}"#.to_string())
    );
    Ok(())
}

#[tokio::test]
async fn utf8_binary_frames_are_delivered_as_text() -> Result<()> {
    let (listener, address) = local_server().await?;
    let transport = WebSocketTransport::new(WAIT);

    let (client, server) = tokio::join!(transport.connect(&address), accept(&listener));
    let mut channel = client?;
    let mut server = server?;
    next_event(&mut channel.events).await?;

    server.send(Message::Binary(vec![0xff, 0xfe])).await?;
    server
        .send(Message::Binary("héllo".as_bytes().to_vec()))
        .await?;

    assert_eq!(
        next_event(&mut channel.events).await?,
        TransportEvent::Message("héllo".to_string())
    );
    Ok(())
}

#[tokio::test]
async fn server_close_ends_link_with_reason() -> Result<()> {
    let (listener, address) = local_server().await?;
    let transport = WebSocketTransport::new(WAIT);

    let (client, server) = tokio::join!(transport.connect(&address), accept(&listener));
    let mut channel = client?;
    let mut server = server?;
    next_event(&mut channel.events).await?;

    server
        .close(Some(CloseFrame {
            code: CloseCode::Away,
            reason: "server shutting down".into(),
        }))
        .await?;

    assert_eq!(
        next_event(&mut channel.events).await?,
        TransportEvent::Closed("server shutting down".to_string())
    );
    Ok(())
}

#[tokio::test]
async fn dropped_server_ends_link() -> Result<()> {
    let (listener, address) = local_server().await?;
    let transport = WebSocketTransport::new(WAIT);

    let (client, server) = tokio::join!(transport.connect(&address), accept(&listener));
    let mut channel = client?;
    next_event(&mut channel.events).await?;

    drop(server?);

    let event = next_event(&mut channel.events).await?;
    assert!(
        matches!(event, TransportEvent::Closed(_) | TransportEvent::Error(_)),
        "unexpected event {event:?}"
    );
    Ok(())
}

#[tokio::test]
async fn close_command_closes_the_socket() -> Result<()> {
    let (listener, address) = local_server().await?;
    let transport = WebSocketTransport::new(WAIT);

    let (client, server) = tokio::join!(transport.connect(&address), accept(&listener));
    let mut channel = client?;
    let mut server = server?;
    next_event(&mut channel.events).await?;

    channel.commands.send(TransportCommand::Close)?;

    let received = timeout(WAIT, server.next()).await?;
    assert!(matches!(received, Some(Ok(Message::Close(_))) | None));
    assert_eq!(
        next_event(&mut channel.events).await?,
        TransportEvent::Closed("closed locally".to_string())
    );
    Ok(())
}
