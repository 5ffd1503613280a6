//! Per-folder logger feeding the structured event sink.
//!
//! Each processed folder gets its own logger that:
//! - Emits structured events to an optional subscriber sink
//! - Mirrors events into the `tracing` ecosystem
//! - Maintains a tail buffer of external-tool output for error diagnosis

use std::collections::VecDeque;

use chrono::Local;
use parking_lot::Mutex;

use super::types::{EventSink, LogConfig, LogEvent, LogLevel, MessagePrefix};

/// Logger scoped to one input folder.
pub struct FolderLogger {
    /// Folder name used as event context.
    folder_name: String,
    /// Subscriber sink (UI/CLI layer), if any.
    sink: Option<EventSink>,
    /// Logging configuration.
    config: LogConfig,
    /// Recent external-tool output lines, kept for error diagnosis.
    tail_buffer: Mutex<VecDeque<String>>,
}

impl FolderLogger {
    /// Create a logger for one folder.
    pub fn new(folder_name: impl Into<String>, config: LogConfig, sink: Option<EventSink>) -> Self {
        let tail_capacity = config.error_tail;
        Self {
            folder_name: folder_name.into(),
            sink,
            config,
            tail_buffer: Mutex::new(VecDeque::with_capacity(tail_capacity)),
        }
    }

    /// Folder this logger reports for.
    pub fn folder_name(&self) -> &str {
        &self.folder_name
    }

    /// Log a message at the specified level.
    pub fn log(&self, level: LogLevel, message: &str) {
        if level < self.config.level {
            return;
        }
        self.emit(level, message);
    }

    /// Log an info message.
    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    /// Log a debug message.
    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    /// Log a warning message.
    pub fn warn(&self, message: &str) {
        let msg = MessagePrefix::Warning.format(message);
        self.log(LogLevel::Warn, &msg);
    }

    /// Log an error message.
    pub fn error(&self, message: &str) {
        let msg = MessagePrefix::Error.format(message);
        self.log(LogLevel::Error, &msg);
    }

    /// Log a command being executed.
    pub fn command(&self, command: &str) {
        let msg = MessagePrefix::Command.format(command);
        self.log(LogLevel::Info, &msg);
    }

    /// Log a section marker.
    pub fn section(&self, section_name: &str) {
        let msg = MessagePrefix::Section.format(section_name);
        self.log(LogLevel::Info, &msg);
    }

    /// Log a success message.
    pub fn success(&self, message: &str) {
        let msg = MessagePrefix::Success.format(message);
        self.log(LogLevel::Info, &msg);
    }

    /// Record an output line from an external tool.
    ///
    /// Lines go to the tail buffer only; `show_tail` replays them after a
    /// failure so successful runs stay quiet.
    pub fn output_line(&self, line: &str, is_stderr: bool) {
        let mut buffer = self.tail_buffer.lock();
        if buffer.len() >= self.config.error_tail {
            buffer.pop_front();
        }
        let prefix = if is_stderr { "[stderr] " } else { "" };
        buffer.push_back(format!("{}{}", prefix, line));
    }

    /// Replay the tail buffer (typically after an external tool failed).
    pub fn show_tail(&self, header: &str) {
        let buffer = self.tail_buffer.lock();
        if buffer.is_empty() {
            return;
        }
        self.emit(LogLevel::Error, &format!("[{}/tail]", header));
        for line in buffer.iter() {
            self.emit(LogLevel::Error, line);
        }
    }

    /// Clear the tail buffer (between merge attempts).
    pub fn clear_tail(&self) {
        self.tail_buffer.lock().clear();
    }

    /// Current tail buffer contents.
    pub fn get_tail(&self) -> Vec<String> {
        self.tail_buffer.lock().iter().cloned().collect()
    }

    /// Send a formatted event to the sink and mirror it into tracing.
    fn emit(&self, level: LogLevel, message: &str) {
        let formatted = if self.config.show_timestamps {
            format!("[{}] {}", Local::now().format("%H:%M:%S"), message)
        } else {
            message.to_string()
        };

        match level {
            LogLevel::Trace => tracing::trace!(folder = %self.folder_name, "{}", message),
            LogLevel::Debug => tracing::debug!(folder = %self.folder_name, "{}", message),
            LogLevel::Info => tracing::info!(folder = %self.folder_name, "{}", message),
            LogLevel::Warn => tracing::warn!(folder = %self.folder_name, "{}", message),
            LogLevel::Error => tracing::error!(folder = %self.folder_name, "{}", message),
        }

        if let Some(ref sink) = self.sink {
            sink(&LogEvent {
                level,
                message: formatted,
                context: Some(self.folder_name.clone()),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_sink() -> (EventSink, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        let sink: EventSink = Arc::new(move |_event: &LogEvent| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });
        (sink, count)
    }

    #[test]
    fn events_reach_sink() {
        let (sink, count) = counting_sink();
        let logger = FolderLogger::new("folder_a", LogConfig::default(), Some(sink));

        logger.info("one");
        logger.warn("two");

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn level_filter_drops_low_severity() {
        let (sink, count) = counting_sink();
        let config = LogConfig {
            level: LogLevel::Warn,
            ..LogConfig::default()
        };
        let logger = FolderLogger::new("folder_a", config, Some(sink));

        logger.info("filtered");
        logger.debug("filtered");
        logger.error("kept");

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn events_carry_folder_context() {
        let seen: Arc<Mutex<Vec<LogEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let sink: EventSink = Arc::new(move |event: &LogEvent| {
            seen_clone.lock().push(event.clone());
        });

        let config = LogConfig {
            show_timestamps: false,
            ..LogConfig::default()
        };
        let logger = FolderLogger::new("my_folder", config, Some(sink));
        logger.success("done");

        let events = seen.lock();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].context.as_deref(), Some("my_folder"));
        assert_eq!(events[0].message, "[SUCCESS] done");
    }

    #[test]
    fn tail_buffer_maintains_limit() {
        let config = LogConfig {
            error_tail: 5,
            ..LogConfig::default()
        };
        let logger = FolderLogger::new("folder_a", config, None);

        for i in 0..10 {
            logger.output_line(&format!("Line {}", i), false);
        }

        let tail = logger.get_tail();
        assert_eq!(tail.len(), 5);
        assert_eq!(tail[0], "Line 5");
        assert_eq!(tail[4], "Line 9");
    }

    #[test]
    fn stderr_lines_are_marked() {
        let logger = FolderLogger::new("folder_a", LogConfig::default(), None);
        logger.output_line("broken pipe", true);
        assert_eq!(logger.get_tail(), vec!["[stderr] broken pipe"]);
    }

    #[test]
    fn clear_tail_empties_buffer() {
        let logger = FolderLogger::new("folder_a", LogConfig::default(), None);
        logger.output_line("line", false);
        logger.clear_tail();
        assert!(logger.get_tail().is_empty());
    }
}
