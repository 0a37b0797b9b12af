//! Copy-to-clipboard support for prompt results and namespaces.

use anyhow::Result;
use std::sync::mpsc as std_mpsc;
use std::sync::OnceLock;
use std::time::Duration;

// Manager channel, initialized on first copy.
static CLIPBOARD_SENDER: OnceLock<std_mpsc::Sender<String>> = OnceLock::new();

fn init_manager() -> Result<&'static std_mpsc::Sender<String>> {
    CLIPBOARD_SENDER.get_or_init(|| {
        let (tx, rx) = std_mpsc::channel::<String>();

        // Dedicated thread that processes copies sequentially. Each
        // clipboard instance stays alive for a couple of seconds so
        // Linux clipboard managers can read the contents before drop.
        std::thread::spawn(move || {
            use arboard::Clipboard;

            for text in rx {
                if let Ok(mut clipboard) = Clipboard::new() {
                    if clipboard.set_text(&text).is_ok() {
                        std::thread::sleep(Duration::from_secs(2));
                    }
                }
            }
        });

        tx
    });

    CLIPBOARD_SENDER
        .get()
        .ok_or_else(|| anyhow::anyhow!("clipboard manager unavailable"))
}

/// Queue a copy and return immediately; the manager thread does the
/// blocking work.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let sender = init_manager()?;
    sender
        .send(text.to_string())
        .map_err(|_| anyhow::anyhow!("clipboard manager channel closed"))?;
    Ok(())
}
