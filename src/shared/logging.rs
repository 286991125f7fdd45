use crate::state::StatePaths;
use std::fs;
use std::io::Write;

pub fn append_console_log(paths: &StatePaths, level: &str, event: &str, message: &str) {
    let payload = serde_json::json!({
        "timestamp": super::time::now_rfc3339(),
        "level": level,
        "event": event,
        "message": message,
    });

    let Ok(line) = serde_json::to_string(&payload) else {
        return;
    };

    let path = paths.console_log_path();
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(mut file) = fs::OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };
    let _ = writeln!(file, "{line}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn log_lines_are_json_objects_with_level_and_event() {
        let dir = tempdir().expect("tempdir");
        let paths = StatePaths::new(dir.path());
        append_console_log(&paths, "info", "session.login", "token stored");
        append_console_log(&paths, "warn", "poll.tick.error", "timeout");

        let raw = fs::read_to_string(paths.console_log_path()).expect("read log");
        let lines: Vec<serde_json::Value> = raw
            .lines()
            .map(|line| serde_json::from_str(line).expect("json line"))
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "session.login");
        assert_eq!(lines[1]["level"], "warn");
        assert!(lines[1]["timestamp"].as_str().is_some());
    }
}
