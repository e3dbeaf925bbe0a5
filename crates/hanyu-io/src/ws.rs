use futures_util::StreamExt;
use hanyu_types::{AppEvent, CharacterSelection};
use tokio_tungstenite::connect_async;

/// Connect to the page bridge and forward its messages as events.
///
/// Returns once connected; messages are read on a spawned task.
pub async fn start_ws_listener<F>(url: &str, mut on_event: F) -> Result<(), anyhow::Error>
where
    F: FnMut(AppEvent) + Send + 'static,
{
    let (ws_stream, _) = connect_async(url).await?;
    let (_, mut read) = ws_stream.split();

    tokio::spawn(async move {
        while let Some(msg) = read.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket read failed: {}", e);
                    break;
                }
            };
            if !msg.is_text() {
                continue;
            }
            if let Ok(text) = msg.to_text()
                && let Some(event) = parse_message(text)
            {
                on_event(event);
            }
        }
        tracing::info!("WebSocket stream ended");
    });

    Ok(())
}

/// A JSON event from the in-page script, or plain text treated as a selection
pub fn parse_message(text: &str) -> Option<AppEvent> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.starts_with('{') {
        return match serde_json::from_str::<AppEvent>(trimmed) {
            Ok(event) => Some(event),
            Err(e) => {
                tracing::warn!("Ignoring malformed bridge message: {}", e);
                None
            }
        };
    }

    Some(AppEvent::Selection(CharacterSelection::from_text(trimmed)))
}

#[cfg(test)]
mod tests {
    use hanyu_types::{Point, UiEvent};

    use super::*;

    #[test]
    fn plain_text_is_a_selection() {
        assert_eq!(
            parse_message(" 你好 \n"),
            Some(AppEvent::Selection(CharacterSelection::from_text("你好")))
        );
        assert_eq!(parse_message("   "), None);
    }

    #[test]
    fn json_messages_become_events() {
        assert_eq!(
            parse_message(r#"{"type":"pointerDown","x":3.0,"y":4.0}"#),
            Some(AppEvent::PointerDown(Point::new(3.0, 4.0)))
        );
        assert_eq!(
            parse_message(r#"{"type":"ui","event":{"kind":"nextPage"}}"#),
            Some(AppEvent::Ui {
                event: UiEvent::NextPage
            })
        );
        assert_eq!(parse_message(r#"{"type":"teleport"}"#), None);
    }
}
