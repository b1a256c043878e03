//! The getattr ignore list (spec §4.3, P7): a small fixed set of
//! well-known desktop-environment probe paths for which getattr
//! short-circuits with a benign, zeroed result without touching disk.
//!
//! Hardcoded; whether it should be configurable is an open question in
//! spec §9, resolved in DESIGN.md by leaving it hardcoded for now.

const IGNORED: &[&str] = &["/.Trash", "/.Trash-1000", "/.xdg-volume-info", "/autorun.inf"];

pub fn is_ignored(client_path: &str) -> bool {
    IGNORED.contains(&client_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_known_paths() {
        assert!(is_ignored("/.Trash"));
        assert!(is_ignored("/.Trash-1000"));
        assert!(is_ignored("/.xdg-volume-info"));
        assert!(is_ignored("/autorun.inf"));
        assert!(!is_ignored("/a.txt"));
    }
}
