use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// Id and creation time handed to a new incident.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamp {
    pub id: String,
    pub created_at: DateTime<Utc>,
}

/// Issues strictly increasing millisecond stamps.
///
/// The id is the stamp's Unix time in milliseconds. When the wall clock has
/// not advanced past the previous stamp (two creates in the same
/// millisecond, or the clock stepping backwards) the previous value plus one
/// is used, so ids never repeat within a process.
#[derive(Debug, Default)]
pub struct IncidentClock {
    last_millis: AtomicI64,
}

impl IncidentClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> Stamp {
        self.next_after(Utc::now().timestamp_millis())
    }

    fn next_after(&self, now_millis: i64) -> Stamp {
        let mut last = self.last_millis.load(Ordering::SeqCst);
        let millis = loop {
            let candidate = now_millis.max(last + 1);
            match self.last_millis.compare_exchange(
                last,
                candidate,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => break candidate,
                Err(current) => last = current,
            }
        };

        Stamp {
            id: millis.to_string(),
            created_at: DateTime::from_timestamp_millis(millis).unwrap_or_else(Utc::now),
        }
    }
}
