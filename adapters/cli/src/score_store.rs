//! Best-score persistence between runs.

use std::{fs, io::ErrorKind, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Contents of the best-score file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct BestScore {
    /// Highest score reached so far.
    pub(crate) best: u32,
}

impl BestScore {
    /// Reads the file, treating a missing file as no previous score.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(error) => {
                return Err(error)
                    .with_context(|| format!("failed to read best score from {}", path.display()))
            }
        };
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse best score in {}", path.display()))
    }

    /// Records `score`, returning whether it beat the stored best.
    pub(crate) fn submit(&mut self, score: u32) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        true
    }

    pub(crate) fn save(&self, path: &Path) -> Result<()> {
        let encoded = toml::to_string(self).context("failed to encode best score")?;
        fs::write(path, encoded)
            .with_context(|| format!("failed to write best score to {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_means_no_score() {
        let dir = tempfile::tempdir().expect("temp dir");
        let loaded = BestScore::load(&dir.path().join("absent.toml")).expect("load");
        assert_eq!(loaded, BestScore::default());
    }

    #[test]
    fn improved_score_survives_a_round_trip() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("best.toml");

        let mut best = BestScore::default();
        assert!(best.submit(40));
        assert!(!best.submit(30));
        best.save(&path).expect("save");

        assert_eq!(BestScore::load(&path).expect("load").best, 40);
    }

    #[test]
    fn malformed_file_is_reported() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("best.toml");
        fs::write(&path, "best = \"lots\"").expect("write");

        let error = BestScore::load(&path).expect_err("malformed score");
        assert!(error.to_string().contains("failed to parse best score"));
    }
}
