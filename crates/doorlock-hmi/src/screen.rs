//! Screen texts and layouts of the HMI node.
//!
//! Texts are written for a 16-column display. "Door is Unlocking" is one
//! character wider and loses its last letter on screen, as on the hardware.

use doorlock_hardware::{Display, Result};

pub const ENTER_PASSWORD: &str = "Plz Enter Pass:";
pub const REPEAT_PASSWORD_TOP: &str = "Plz Enter The";
pub const REPEAT_PASSWORD_BOTTOM: &str = "Same Pass:";
pub const MENU_OPEN: &str = "+ : Open Door";
pub const MENU_CHANGE: &str = "- : Change Pass";
pub const DOOR_UNLOCKING: &str = "Door is Unlocking";
pub const DOOR_LOCKING: &str = "Door is Locking";
pub const ALARM: &str = "ERROR";

/// Placeholder shown for each entered digit.
pub const DIGIT_MASK: char = '*';

/// Which password entry is being collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    /// First (or only) entry.
    Enter,
    /// Verification entry of a SetPassword exchange.
    Repeat,
}

/// Clear the screen and draw `prompt`, leaving the cursor where the
/// masked digits go.
pub async fn draw_prompt<D: Display>(display: &mut D, prompt: Prompt) -> Result<()> {
    display.clear().await?;
    match prompt {
        Prompt::Enter => {
            display.write_at(0, 0, ENTER_PASSWORD).await?;
            display.write_at(1, 0, "").await
        }
        Prompt::Repeat => {
            display.write_at(0, 0, REPEAT_PASSWORD_TOP).await?;
            display.write_at(1, 0, REPEAT_PASSWORD_BOTTOM).await
        }
    }
}

pub async fn draw_menu<D: Display>(display: &mut D) -> Result<()> {
    display.clear().await?;
    display.write_at(0, 0, MENU_OPEN).await?;
    display.write_at(1, 0, MENU_CHANGE).await
}

/// Clear the screen and show a single message on the top row.
pub async fn show_message<D: Display>(display: &mut D, message: &str) -> Result<()> {
    display.clear().await?;
    display.write_at(0, 0, message).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use doorlock_hardware::mock::VirtualLcd;

    #[tokio::test]
    async fn test_enter_prompt_cursor() {
        let (mut lcd, handle) = VirtualLcd::new();
        draw_prompt(&mut lcd, Prompt::Enter).await.unwrap();

        assert_eq!(handle.snapshot(), "Plz Enter Pass:|");
        assert_eq!(handle.cursor(), (1, 0));
    }

    #[tokio::test]
    async fn test_repeat_prompt_cursor() {
        let (mut lcd, handle) = VirtualLcd::new();
        draw_prompt(&mut lcd, Prompt::Repeat).await.unwrap();

        assert_eq!(handle.snapshot(), "Plz Enter The|Same Pass:");
        assert_eq!(handle.cursor(), (1, 10));
    }

    #[tokio::test]
    async fn test_menu() {
        let (mut lcd, handle) = VirtualLcd::new();
        show_message(&mut lcd, ALARM).await.unwrap();
        draw_menu(&mut lcd).await.unwrap();

        assert_eq!(handle.snapshot(), "+ : Open Door|- : Change Pass");
    }
}
