//! Console stand-ins for the keypad and the LCD.

use std::time::Duration;

use anyhow::Result;
use futures::future;
use doorlock_hardware::KeypadKey;
use doorlock_hardware::mock::{LcdHandle, MockKeypadHandle};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

/// How often the renderer looks for screen changes.
const RENDER_POLL: Duration = Duration::from_millis(50);

/// Press one key per recognized character of each input line.
///
/// Returns when the input ends.
pub async fn feed_keys<R>(input: R, keys: &MockKeypadHandle) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        for c in line.chars().filter(|c| !c.is_whitespace()) {
            match KeypadKey::from_char(c) {
                Some(key) => {
                    if !keys.send_key(key).await? {
                        warn!(%key, "keypad locked, key ignored");
                    }
                }
                None => warn!("'{}' is not a keypad key", c),
            }
        }
    }
    info!("Keypad input closed");
    Ok(())
}

/// Feed keys from `input`, then wait forever with the keypad still attached
/// so the nodes work through the keys already queued. Returns only on a
/// read error.
pub async fn keypad_input<R>(input: R, keys: &MockKeypadHandle) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    feed_keys(input, keys).await?;
    future::pending().await
}

/// Print the screen every time it changes. Never returns.
pub async fn render_screen(screen: LcdHandle) {
    let mut seen = 0;
    loop {
        let revision = screen.revision();
        if revision != seen {
            seen = revision;
            println!("{}", frame(&screen.lines()));
        }
        tokio::time::sleep(RENDER_POLL).await;
    }
}

/// Draw LCD rows inside a box.
pub fn frame(lines: &[String]) -> String {
    let width = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);
    let border = format!("+{}+", "-".repeat(width));

    let mut out = border.clone();
    for line in lines {
        out.push_str(&format!("\n|{:<width$}|", line, width = width));
    }
    out.push('\n');
    out.push_str(&border);
    out
}
