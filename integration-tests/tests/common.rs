use backtop_core::monitor::{Monitor, MonitorConfig};
use integration_tests::harness::{ManualClock, load_fixture};
use std::io::Cursor;

#[allow(dead_code)]
pub fn row(backend: &str, session: &str, url: &str, time: &str, response: &str) -> String {
    format!("{backend:<20} {session:<5} {url:<50} {time:<5} {response}")
        .trim_end()
        .to_string()
}

#[allow(dead_code)]
pub fn header() -> String {
    row("Backend", "Sess", "Url", "Time", "Response")
}

/// Feed a fixture through a monitor driven by a manual clock.
#[allow(dead_code)]
pub fn replay(file: &str, config: MonitorConfig) -> (Monitor<ManualClock>, ManualClock, String) {
    let clock = ManualClock::new();
    let mut monitor = Monitor::with_clock(config, clock.clone());
    let mut out = Vec::new();

    monitor
        .run(Cursor::new(load_fixture(file)), &mut out)
        .expect("replay failed");

    let out = String::from_utf8(out).expect("output is not UTF-8");
    (monitor, clock, out)
}
