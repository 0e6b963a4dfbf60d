//! The append-only human-readable `hingechat.log` sink (§6, §10) — not
//! part of the wire protocol, a plain audit trail alongside structured
//! `tracing` output. Grounded in `guard-core::event_log::EventLog`'s
//! append-on-every-call shape, simplified to a flat text file since
//! nothing here needs the teacher's signed/tamper-evident event chain.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

pub struct EventLog {
    file: Mutex<std::fs::File>,
}

impl EventLog {
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(EventLog { file: Mutex::new(file) })
    }

    /// Appends one line: `<unix-timestamp> <event> <detail>`.
    pub fn append(&self, event: &str, detail: &str) {
        let ts = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let line = format!("{ts} {event} {detail}\n");
        if let Ok(mut f) = self.file.lock() {
            let _ = f.write_all(line.as_bytes());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_a_line_per_call() {
        let dir = std::env::temp_dir().join(format!("dl_relay_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("hingechat.log");
        let log = EventLog::open(&path).unwrap();
        log.append("CONNECTION_REGISTERED", "id=1 nick=alice");
        log.append("CONNECTION_CLOSED", "id=1");
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
        std::fs::remove_dir_all(&dir).ok();
    }
}
