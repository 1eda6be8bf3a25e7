use lineedit_core::{Config, Session};
use std::path::Path;

pub const SAMPLE: [&str; 6] = ["aaaa", "aaba", "aaca", "akca", "bbb", "ako"];

/// Build a session whose history file lives in `dir`, preloaded with `SAMPLE`.
/// Nothing is read from or written to disk until a test asks for it.
pub fn sample_session(dir: &Path) -> Session {
    let config = Config { history_file: dir.join("history"), ..Config::default() };
    let mut session = Session::new(&config);
    for line in SAMPLE {
        session.history.add(line);
    }
    session
}
