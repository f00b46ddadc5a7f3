// Time-series sample domain models

/// One retained sample: millisecond timestamp and value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time_ms: i64,
    pub value: f64,
}

impl Sample {
    pub fn new(time_ms: i64, value: f64) -> Self {
        Self { time_ms, value }
    }

    /// Timestamp truncated to backend-native whole seconds.
    pub fn clock(&self) -> i64 {
        self.time_ms.div_euclid(1000)
    }
}

/// A sample as the backend reports it: whole seconds plus a nanosecond
/// fraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistorySample {
    pub clock: i64,
    pub ns: i64,
    pub value: f64,
}

impl HistorySample {
    pub fn new(clock: i64, ns: i64, value: f64) -> Self {
        Self { clock, ns, value }
    }

    pub fn to_sample(self) -> Sample {
        Sample::new(self.clock * 1000 + self.ns / 1_000_000, self.value)
    }
}
