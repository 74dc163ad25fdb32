use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{ActionItem, Language};

/// Machine-readable output format
#[derive(Debug, Clone, Serialize)]
pub struct TaskReport {
    /// Extracted items, in document order
    pub tasks: Vec<ActionItem>,
    /// Metadata about the processing
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub language: Language,
    /// Date relative deadlines were resolved against
    pub evaluation_date: NaiveDate,
    pub total_tasks: usize,
    pub heuristics_only: bool,
}

impl TaskReport {
    pub fn new(
        tasks: Vec<ActionItem>,
        language: Language,
        evaluation_date: NaiveDate,
        heuristics_only: bool,
    ) -> Self {
        let metadata = ReportMetadata {
            language,
            evaluation_date,
            total_tasks: tasks.len(),
            heuristics_only,
        };
        Self { tasks, metadata }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize report")
    }

    /// Write to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(file, self).context("Failed to write JSON")?;
        Ok(())
    }
}

/// Human-readable task list
pub struct HumanTaskList<'a> {
    tasks: &'a [ActionItem],
}

impl<'a> HumanTaskList<'a> {
    pub fn new(tasks: &'a [ActionItem]) -> Self {
        Self { tasks }
    }

    /// Format the tasks as a numbered list with one metadata line each
    pub fn format(&self) -> String {
        if self.tasks.is_empty() {
            return "No action items found.\n".to_string();
        }

        let mut output = String::new();

        for (index, task) in self.tasks.iter().enumerate() {
            let wrapped = wrap_text(&task.summary, 76);
            let mut lines = wrapped.lines();
            output.push_str(&format!("{:>2}. {}\n", index + 1, lines.next().unwrap_or_default()));
            for line in lines {
                output.push_str(&format!("    {}\n", line));
            }

            output.push_str(&format!(
                "    assignee: {} | due: {} | priority: {} | confidence: {:.2}\n",
                task.assignee.as_deref().unwrap_or("-"),
                task.due.as_deref().unwrap_or("-"),
                task.priority.as_deref().unwrap_or("-"),
                task.confidence
            ));
            if !task.labels.is_empty() {
                output.push_str(&format!("    labels: {}\n", task.labels.join(", ")));
            }
            output.push('\n');
        }

        output
    }

    /// Write to a text file
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        write!(file, "{}", self.format())?;
        Ok(())
    }
}

/// Wrap text at approximately the given width (in characters)
fn wrap_text(text: &str, width: usize) -> String {
    let mut result = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if line_len + word_len + 1 > width && line_len > 0 {
            result.push('\n');
            line_len = 0;
        }
        if line_len > 0 {
            result.push(' ');
            line_len += 1;
        }
        result.push_str(word);
        line_len += word_len;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> ActionItem {
        let mut task = ActionItem::new("подготовить отчёт к пятнице", 0.65, None);
        task.due = Some("2025-03-14".to_string());
        task.priority = Some("Medium".to_string());
        task.labels = vec!["documentation".to_string(), "sales".to_string()];
        task
    }

    #[test]
    fn test_human_format() {
        let tasks = vec![task()];
        let text = HumanTaskList::new(&tasks).format();

        assert!(text.starts_with(" 1. подготовить отчёт к пятнице\n"));
        assert!(text.contains("assignee: - | due: 2025-03-14 | priority: Medium | confidence: 0.65"));
        assert!(text.contains("labels: documentation, sales"));
        assert_eq!(HumanTaskList::new(&[]).format(), "No action items found.\n");
    }

    #[test]
    fn test_wrap_text_counts_characters() {
        let text = "очень длинная формулировка задачи которую нужно перенести на новую строку";
        let wrapped = wrap_text(text, 20);
        for line in wrapped.lines() {
            assert!(line.chars().count() <= 20);
        }
        assert_eq!(wrapped.split_whitespace().count(), text.split_whitespace().count());
    }

    #[test]
    fn test_report_json() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let report = TaskReport::new(vec![task()], Language::Ru, date, true);
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(json["metadata"]["language"], "ru");
        assert_eq!(json["metadata"]["evaluation_date"], "2025-03-10");
        assert_eq!(json["metadata"]["total_tasks"], 1);
        assert_eq!(json["tasks"][0]["due"], "2025-03-14");
    }

    #[test]
    fn test_write_files() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let tasks = vec![task()];

        let json_path = dir.path().join("tasks.json");
        TaskReport::new(tasks.clone(), Language::Ru, date, false)
            .write_json(&json_path)
            .unwrap();
        let text_path = dir.path().join("tasks.txt");
        HumanTaskList::new(&tasks).write_file(&text_path).unwrap();

        assert!(std::fs::read_to_string(json_path).unwrap().contains("\"summary\""));
        assert!(std::fs::read_to_string(text_path).unwrap().contains("пятнице"));
    }
}
