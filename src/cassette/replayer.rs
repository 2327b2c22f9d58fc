//! Serves recorded interactions back in order.

use std::collections::{HashMap, VecDeque};

use super::format::{Cassette, Interaction};

/// Replays interactions from a loaded cassette, one queue per port/method pair.
pub struct CassetteReplayer {
    queues: HashMap<(String, String), VecDeque<Interaction>>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<(String, String), VecDeque<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction.clone());
        }
        Self { queues }
    }

    /// Loads a cassette file and builds a replayer from it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: &std::path::Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        let cassette: Cassette = serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))?;
        Ok(Self::new(&cassette))
    }

    /// Number of interactions not yet served for the given port and method.
    #[must_use]
    pub fn remaining(&self, port: &str, method: &str) -> usize {
        self.queues.get(&(port.to_string(), method.to_string())).map_or(0, VecDeque::len)
    }

    /// Take the next interaction for the given port and method.
    ///
    /// # Panics
    ///
    /// Panics if the cassette has no (more) interactions for the pair. The
    /// message lists the pairs that do have interactions left, which is what
    /// you want to see when a replayed test drifts from its recording.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Interaction {
        let key = (port.to_string(), method.to_string());
        if let Some(interaction) = self.queues.get_mut(&key).and_then(VecDeque::pop_front) {
            return interaction;
        }
        let available: Vec<String> = self
            .queues
            .iter()
            .filter(|(_, queue)| !queue.is_empty())
            .map(|((p, m), queue)| format!("{p}::{m} ({})", queue.len()))
            .collect();
        panic!(
            "Cassette exhausted: no interactions left for port={port:?} method={method:?}. \
             Remaining: [{}]",
            available.join(", ")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn invoke(seq: u64, args: &[&str], lines: &[&str]) -> Interaction {
        Interaction {
            seq,
            port: "git".into(),
            method: "invoke".into(),
            input: json!({ "args": args }),
            output: json!({ "ok": lines }),
        }
    }

    fn make_cassette(interactions: Vec<Interaction>) -> Cassette {
        Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions,
        }
    }

    #[test]
    fn serves_interactions_in_recorded_order() {
        let cassette = make_cassette(vec![
            invoke(0, &["branch"], &["* main"]),
            invoke(1, &["branch", "-r"], &["  origin/main"]),
        ]);
        let mut replayer = CassetteReplayer::new(&cassette);
        assert_eq!(replayer.remaining("git", "invoke"), 2);

        assert_eq!(replayer.next_interaction("git", "invoke").seq, 0);
        let second = replayer.next_interaction("git", "invoke");
        assert_eq!(second.output, json!({"ok": ["  origin/main"]}));
        assert_eq!(replayer.remaining("git", "invoke"), 0);
    }

    #[test]
    #[should_panic(expected = "Cassette exhausted")]
    fn exhausted_replayer_panics_with_descriptive_message() {
        let cassette = make_cassette(vec![invoke(0, &["branch"], &[])]);
        let mut replayer = CassetteReplayer::new(&cassette);
        let _ = replayer.next_interaction("git", "invoke");
        let _ = replayer.next_interaction("git", "invoke");
    }

    #[test]
    fn from_path_reports_missing_file() {
        let err = CassetteReplayer::from_path(std::path::Path::new("/nonexistent/x.yaml"))
            .err()
            .unwrap();
        assert!(err.contains("Failed to read cassette file"));
    }
}
