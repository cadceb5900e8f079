use chrono::Utc;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy)]
pub enum LogLevel {
    Info,
    Error,
}

/// Append-only activity log at `~/.glean/activity.log`. Best-effort: callers
/// are expected to ignore logging failures so a broken log never breaks a
/// scrape.
pub struct ActivityLogger {
    log_path: PathBuf,
}

impl ActivityLogger {
    pub fn new() -> crate::Result<Self> {
        let user_dirs = directories::UserDirs::new().ok_or_else(|| {
            crate::GleanError::Storage("could not determine home directory".into())
        })?;
        let glean_dir = user_dirs.home_dir().join(".glean");
        fs::create_dir_all(&glean_dir)?;

        Ok(Self {
            log_path: glean_dir.join("activity.log"),
        })
    }

    pub fn log(
        &self,
        level: LogLevel,
        host: Option<&str>,
        event: &str,
        details: Option<&str>,
    ) -> crate::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;

        let level_str = match level {
            LogLevel::Info => "🟢",
            LogLevel::Error => "🔴",
        };

        writeln!(
            file,
            "{} {} {} {} {}",
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
            level_str,
            event,
            host.unwrap_or("*"),
            details.unwrap_or("")
        )?;

        Ok(())
    }

    /// Most recent entries first, optionally narrowed to one host or to
    /// errors only.
    pub fn read_logs(&self, host_filter: Option<&str>, errors_only: bool) -> crate::Result<Vec<String>> {
        if !self.log_path.exists() {
            return Ok(vec![]);
        }

        let file = fs::File::open(&self.log_path)?;
        let reader = BufReader::new(file);
        let mut matching_lines = Vec::new();

        for line in reader.lines() {
            let line = line?;
            if errors_only && !line.contains("🔴") {
                continue;
            }
            if let Some(host) = host_filter {
                if !line.contains(host) {
                    continue;
                }
            }
            matching_lines.push(line);
        }

        matching_lines.reverse();
        Ok(matching_lines)
    }

    pub fn info(&self, host: Option<&str>, event: &str, details: Option<&str>) -> crate::Result<()> {
        self.log(LogLevel::Info, host, event, details)
    }

    pub fn error(&self, host: Option<&str>, event: &str, details: Option<&str>) -> crate::Result<()> {
        self.log(LogLevel::Error, host, event, details)
    }
}
