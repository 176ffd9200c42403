use crate::domain::ports::Terminal;
use crate::utils::error::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Holds the terminal open by blocking on one line of stdin so the window
/// stays readable after the launched program exits.
#[derive(Debug, Clone)]
pub struct StdinTerminal {
    prompt: String,
}

impl StdinTerminal {
    pub fn new(prompt: String) -> Self {
        Self { prompt }
    }
}

impl Terminal for StdinTerminal {
    async fn hold_open(&self) -> Result<()> {
        println!();
        println!("{}", self.prompt);

        let mut line = String::new();
        let mut reader = BufReader::new(tokio::io::stdin());
        // EOF 也視為已確認，避免在非互動環境卡住
        reader.read_line(&mut line).await?;

        Ok(())
    }
}
