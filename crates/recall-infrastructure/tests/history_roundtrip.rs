//! End-to-end tests: the filtering decorator over the file-backed store.

use std::sync::Arc;

use recall_core::{FilteringHistory, Result};
use recall_infrastructure::FileHistoryStore;
use tempfile::TempDir;

const GENERATED_INSTRUCTIONS: &str = "Generate a comprehensive PR description for my current \
                                      branch changes. Follow these steps:\n\n\
                                      1. Discover the changes\n2. Analyze the code\n3. Generate";

fn filtered_store(temp_dir: &TempDir) -> FilteringHistory {
    let backing = Arc::new(FileHistoryStore::new(temp_dir.path().join("history")).unwrap());
    FilteringHistory::new(backing)
}

fn load_all(history: &FilteringHistory) -> Vec<String> {
    history
        .load_history_strings()
        .collect::<Result<Vec<_>>>()
        .unwrap()
}

#[test]
fn test_only_user_entries_reach_the_file() {
    let temp_dir = TempDir::new().unwrap();
    let history = filtered_store(&temp_dir);

    history.store_string("/help").unwrap();
    history.store_string(GENERATED_INSTRUCTIONS).unwrap();
    history.store_string("explain this code").unwrap();

    assert_eq!(load_all(&history), vec!["/help", "explain this code"]);
}

#[test]
fn test_automated_mode_keeps_injected_input_out_of_the_file() {
    let temp_dir = TempDir::new().unwrap();
    let history = filtered_store(&temp_dir);

    history.store_string("/cd /tmp").unwrap();
    {
        let _guard = history.automated();
        history.store_string("anything sent while automation runs").unwrap();
    }
    history.store_string("what does this function do?").unwrap();

    assert_eq!(
        load_all(&history),
        vec!["/cd /tmp", "what does this function do?"]
    );
}

#[test]
fn test_recall_filters_entries_persisted_before_the_filter_existed() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("history");

    // An unfiltered writer persisted generated text alongside user input.
    {
        use recall_core::HistoryStore;

        let raw = FileHistoryStore::new(&path).unwrap();
        raw.store_string("/help").unwrap();
        raw.store_string(GENERATED_INSTRUCTIONS).unwrap();
        raw.store_string("/cd /tmp").unwrap();
    }

    let history = FilteringHistory::new(Arc::new(FileHistoryStore::new(&path).unwrap()));

    assert_eq!(load_all(&history), vec!["/help", "/cd /tmp"]);
}
