use std::time::Duration;

use arboard::Clipboard;
use hanyu_types::{AppEvent, CharacterSelection};
use tokio::time;

/// Poll the clipboard every `interval` and report new text as a selection
/// without geometry
pub async fn watch_clipboard<F>(interval: Duration, mut on_event: F) -> Result<(), anyhow::Error>
where
    F: FnMut(AppEvent) + Send + 'static,
{
    let mut clipboard = Clipboard::new()?;
    let mut last_text = String::new();

    let mut interval = time::interval(interval);

    loop {
        interval.tick().await;
        if let Ok(text) = clipboard.get_text()
            && let Some(text) = fresh_text(&mut last_text, text)
        {
            on_event(AppEvent::Selection(CharacterSelection::from_text(text)));
        }
    }
}

/// `candidate` when it is non-empty and differs from the last text seen
fn fresh_text(last: &mut String, candidate: String) -> Option<String> {
    if candidate.trim().is_empty() || candidate == *last {
        return None;
    }
    last.clone_from(&candidate);
    Some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_changes_are_reported() {
        let mut last = String::new();
        assert_eq!(fresh_text(&mut last, "你好".into()), Some("你好".into()));
        assert_eq!(fresh_text(&mut last, "你好".into()), None);
        assert_eq!(fresh_text(&mut last, "  ".into()), None);
        assert_eq!(fresh_text(&mut last, "谢谢".into()), Some("谢谢".into()));
    }
}
