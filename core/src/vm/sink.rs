use std::io::Write;

/// Receiver for the values passed to the module's sink routine.
pub trait ValueSink {
    fn write(&mut self, value: i32);
}

impl ValueSink for Vec<i32> {
    fn write(&mut self, value: i32) {
        self.push(value);
    }
}

/// Prints each value on its own line.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl ValueSink for StdoutSink {
    fn write(&mut self, value: i32) {
        let mut out = std::io::stdout().lock();
        // A closed stdout is not an interpreter failure.
        let _ = writeln!(out, "{}", value);
    }
}
