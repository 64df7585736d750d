use crate::sink::LogSink;

/// Writes each entry to the test harness output
///
/// Uses `println!`, which libtest captures per test and shows only for
/// failing tests. A closed or broken stdout is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct TestOutputSink;

impl LogSink for TestOutputSink {
    fn write(&self, text: &str) {
        let _ = std::panic::catch_unwind(|| println!("{}", text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_does_not_panic() {
        TestOutputSink.write("[Information] (Tests) hello");
    }
}
