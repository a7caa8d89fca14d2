//! Typewriter reveal of assistant replies.
//!
//! Purely cosmetic: the reply is already stored when the reveal starts.

use std::io::{self, Write};
use std::time::Duration;

/// Prints text one character at a time with a fixed delay
#[derive(Debug, Clone, Copy)]
pub struct Typewriter {
    delay: Duration,
}

impl Typewriter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn is_instant(&self) -> bool {
        self.delay.is_zero()
    }

    /// Write `text` followed by a newline.
    pub async fn reveal<W: Write>(&self, out: &mut W, text: &str) -> io::Result<()> {
        if self.is_instant() {
            writeln!(out, "{}", text)?;
            return out.flush();
        }

        for ch in text.chars() {
            write!(out, "{}", ch)?;
            out.flush()?;
            tokio::time::sleep(self.delay).await;
        }
        writeln!(out)?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_instant_reveal_writes_whole_text() {
        let mut out = Vec::new();
        let typewriter = Typewriter::new(Duration::ZERO);
        assert!(typewriter.is_instant());

        typewriter.reveal(&mut out, "Hello, world").await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Hello, world\n");
    }

    #[tokio::test]
    async fn test_delayed_reveal_keeps_multibyte_text_intact() {
        let mut out = Vec::new();
        Typewriter::new(Duration::from_millis(1))
            .reveal(&mut out, "héllo 👋")
            .await
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "héllo 👋\n");
    }
}
