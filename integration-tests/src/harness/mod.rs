pub mod clock;
pub mod fixtures;
pub mod tracing;

pub use clock::ManualClock;
pub use fixtures::{fixture_path, load_fixture};
pub use tracing::{CapturedEvent, capture_events};
