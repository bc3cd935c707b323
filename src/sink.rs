use log::info;

/// Write-only sink for progress and diagnostic lines.
pub trait LogSink {
    fn append(&self, text: &str);
}

/// Forwards progress lines to the `log` facade under the `progress` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggerSink;

impl LogSink for LoggerSink {
    fn append(&self, text: &str) {
        info!(target: "progress", "{}", text.trim_end());
    }
}

#[cfg(test)]
pub mod recording {
    use std::cell::RefCell;

    use super::LogSink;

    #[derive(Default)]
    pub struct RecordingSink {
        pub lines: RefCell<Vec<String>>,
    }

    impl RecordingSink {
        pub fn contains(&self, needle: &str) -> bool {
            self.lines.borrow().iter().any(|line| line.contains(needle))
        }
    }

    impl LogSink for RecordingSink {
        fn append(&self, text: &str) {
            self.lines.borrow_mut().push(text.to_string());
        }
    }
}
