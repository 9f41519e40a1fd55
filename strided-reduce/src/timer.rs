use std::time::{Duration, Instant};

/// Wall clock marks around a warm-up invocation followed by a timed one.
///
/// The warm-up spans `zero_point..exec_start`, the timed run spans
/// `exec_start..exec_end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppTimer {
    zero_point: Instant,
    exec_start: Instant,
    exec_end: Instant,
}

impl Default for AppTimer {
    fn default() -> Self {
        Self::start()
    }
}

impl AppTimer {
    /// Starts the warm-up span now.
    pub fn start() -> Self {
        let now = Instant::now();
        Self {
            zero_point: now,
            exec_start: now,
            exec_end: now,
        }
    }

    /// Ends the warm-up span and starts the timed one.
    pub fn mark_exec_start(&mut self) {
        self.exec_start = Instant::now();
        self.exec_end = self.exec_start;
    }

    pub fn mark_exec_end(&mut self) {
        self.exec_end = Instant::now();
    }

    pub fn warm_up(&self) -> Duration {
        self.exec_start.saturating_duration_since(self.zero_point)
    }

    pub fn timed(&self) -> Duration {
        self.exec_end.saturating_duration_since(self.exec_start)
    }

    /// e.g. `reduce [64,320,80] over dims [0,1]: warm-up 12.031ms, timed 0.412ms`
    pub fn solving_time(&self, in_lengths: &[usize], reduce_dims: &[usize]) -> String {
        format_solving_time(in_lengths, reduce_dims, self.warm_up(), self.timed())
    }

    pub fn show_solving_time(&self, in_lengths: &[usize], reduce_dims: &[usize]) {
        println!("{}", self.solving_time(in_lengths, reduce_dims));
    }
}

fn format_dims(dims: &[usize]) -> String {
    let dims: Vec<String> = dims.iter().map(|d| d.to_string()).collect();
    format!("[{}]", dims.join(","))
}

fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1e3
}

pub(crate) fn format_solving_time(
    in_lengths: &[usize],
    reduce_dims: &[usize],
    warm_up: Duration,
    timed: Duration,
) -> String {
    format!(
        "reduce {} over dims {}: warm-up {:.3}ms, timed {:.3}ms",
        format_dims(in_lengths),
        format_dims(reduce_dims),
        millis(warm_up),
        millis(timed),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_solving_time() {
        let line = format_solving_time(
            &[64, 320, 80],
            &[0, 1],
            Duration::from_micros(12_031),
            Duration::from_micros(412),
        );
        assert_eq!(
            line,
            "reduce [64,320,80] over dims [0,1]: warm-up 12.031ms, timed 0.412ms"
        );
    }

    #[test]
    fn test_spans_are_ordered() {
        let mut timer = AppTimer::start();
        std::thread::sleep(Duration::from_millis(2));
        timer.mark_exec_start();
        assert!(timer.warm_up() >= Duration::from_millis(2));
        assert_eq!(timer.timed(), Duration::ZERO);
        timer.mark_exec_end();
        assert!(timer.exec_end >= timer.exec_start);
    }
}
