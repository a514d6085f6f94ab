//! Interactive fallback when extraction yields nothing.

use linkpreview_common::{ImageSource, PageMetadata};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

const DEFAULT_TITLE: &str = "Untitled";
const DEFAULT_DESCRIPTION: &str = "No description provided";

/// One line of user input per question. `None` means the input ended.
#[async_trait::async_trait]
pub trait Prompter: Send {
    async fn ask(&mut self, label: &str) -> Option<String>;
}

pub struct StdinPrompter {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinPrompter {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

#[async_trait::async_trait]
impl Prompter for StdinPrompter {
    async fn ask(&mut self, label: &str) -> Option<String> {
        print!("{label}");
        let _ = std::io::stdout().flush();
        match self.lines.next_line().await {
            Ok(line) => line.map(|l| l.trim().to_string()),
            Err(err) => {
                tracing::warn!(error = %err, "reading stdin failed");
                None
            }
        }
    }
}

/// Canned answers in place of a terminal.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: std::collections::VecDeque<String>,
}

#[cfg(test)]
impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
#[async_trait::async_trait]
impl Prompter for ScriptedPrompter {
    async fn ask(&mut self, _label: &str) -> Option<String> {
        self.answers.pop_front().map(|a| a.trim().to_string())
    }
}

/// Ask whether to enter the metadata by hand. Only `y` or `yes` accepts.
pub async fn offer_manual_entry(prompter: &mut dyn Prompter) -> bool {
    println!("\nAutomatic extraction failed. Would you like to enter the data manually?");
    prompter
        .ask("Enter 'y' for manual input, or any other key to exit: ")
        .await
        .map(|answer| matches!(answer.to_lowercase().as_str(), "y" | "yes"))
        .unwrap_or(false)
}

/// Collect the four fields. `None` when the input ends before all answers.
pub async fn manual_entry(url: &str, prompter: &mut dyn Prompter) -> Option<PageMetadata> {
    println!("\nPlease enter the following information:");
    let title = prompter.ask("Page title: ").await?;
    let description = prompter.ask("Description: ").await?;
    let image = prompter.ask("Image URL (optional, press Enter to skip): ").await?;
    let site_name = prompter.ask("Site name (optional): ").await?;

    let mut meta = PageMetadata::for_url(url);
    meta.title = non_empty(title).unwrap_or_else(|| DEFAULT_TITLE.to_string());
    meta.description = non_empty(description).unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());
    if let Some(image) = non_empty(image) {
        meta.image = Some(image);
        meta.image_source = ImageSource::Manual;
    }
    meta.site_name = non_empty(site_name).unwrap_or_else(|| meta.domain.clone());
    Some(meta)
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn blank_answers_take_defaults() {
        let mut prompter = ScriptedPrompter::new(["", "", "", ""]);
        let meta = manual_entry("https://news.example.com/a", &mut prompter)
            .await
            .unwrap();
        assert_eq!(meta.title, "Untitled");
        assert_eq!(meta.description, "No description provided");
        assert_eq!(meta.image, None);
        assert_eq!(meta.image_source, ImageSource::None);
        assert_eq!(meta.site_name, "news.example.com");
        assert_eq!(meta.full_url, "https://news.example.com/a");
    }

    #[tokio::test]
    async fn answers_are_trimmed_and_used() {
        let mut prompter = ScriptedPrompter::new([
            "  Launch day ",
            "We shipped.",
            "https://cdn.example.com/hero.png",
            "Example",
        ]);
        let meta = manual_entry("https://example.com", &mut prompter).await.unwrap();
        assert_eq!(meta.title, "Launch day");
        assert_eq!(meta.image.as_deref(), Some("https://cdn.example.com/hero.png"));
        assert_eq!(meta.image_source, ImageSource::Manual);
        assert_eq!(meta.site_name, "Example");
    }

    #[tokio::test]
    async fn end_of_input_cancels() {
        let mut prompter = ScriptedPrompter::new(["Only a title"]);
        assert!(manual_entry("https://example.com", &mut prompter).await.is_none());
    }

    #[tokio::test]
    async fn only_yes_accepts_the_offer() {
        for (answer, expected) in [("y", true), ("YES", true), (" yes ", true), ("n", false), ("yep", false)] {
            let mut prompter = ScriptedPrompter::new([answer]);
            assert_eq!(offer_manual_entry(&mut prompter).await, expected, "{answer:?}");
        }
        let mut silent = ScriptedPrompter::default();
        assert!(!offer_manual_entry(&mut silent).await);
    }
}
