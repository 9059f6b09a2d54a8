//! Interactive prompts for seed parameters left off the command line.

use anyhow::{bail, Result};
use chrono::NaiveDate;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

pub struct Prompter {
    editor: DefaultEditor,
    history_path: PathBuf,
}

impl Prompter {
    pub fn new() -> Result<Self> {
        let mut editor = DefaultEditor::new()?;
        let history_path = dirs::cache_dir()
            .map(|d| d.join("incident-seeder").join("prompt_history"))
            .unwrap_or_else(|| PathBuf::from(".incident_seeder_history"));
        let _ = editor.load_history(&history_path);

        Ok(Self {
            editor,
            history_path,
        })
    }

    /// Read one non-empty line. Ctrl-C and Ctrl-D abort the run.
    pub fn line(&mut self, prompt: &str) -> Result<String> {
        loop {
            match self.editor.readline(prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    let _ = self.editor.add_history_entry(trimmed);
                    return Ok(trimmed.to_string());
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    bail!("input cancelled")
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Read a value, asking again until it parses
    pub fn parse<T>(&mut self, prompt: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        loop {
            let line = self.line(prompt)?;
            match line.parse::<T>() {
                Ok(value) => return Ok(value),
                Err(e) => eprintln!("Invalid value {:?}: {}", line, e),
            }
        }
    }

    /// Ask for year, month and day separately, repeating until they form a real date
    pub fn date(&mut self, heading: &str) -> Result<NaiveDate> {
        eprintln!("{}", heading);
        loop {
            let year: i32 = self.parse("Enter Year (YYYY): ")?;
            let month: u32 = self.parse("Enter Month (MM): ")?;
            let day: u32 = self.parse("Enter Day (DD): ")?;
            match date_from_parts(year, month, day) {
                Ok(date) => return Ok(date),
                Err(e) => eprintln!("{}", e),
            }
        }
    }
}

impl Drop for Prompter {
    fn drop(&mut self) {
        if let Some(parent) = self.history_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = self.editor.save_history(&self.history_path);
    }
}

pub fn date_from_parts(year: i32, month: u32, day: u32) -> Result<NaiveDate, String> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| format!("{:04}-{:02}-{:02} is not a valid date", year, month, day))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_from_parts() {
        assert_eq!(
            date_from_parts(2024, 2, 29),
            Ok(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
        );
        assert_eq!(
            date_from_parts(2023, 2, 29),
            Err("2023-02-29 is not a valid date".to_string())
        );
        assert!(date_from_parts(2024, 13, 1).is_err());
    }
}
