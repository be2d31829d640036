use std::{
    collections::HashMap,
    process::Command,
    sync::Mutex,
};

/// Durable key/value store used for both cache layers.
///
/// Both operations are best-effort: any failure of the backing store maps to
/// `None` on reads and a no-op on writes. A broken store must never break
/// the primary query path.
pub trait StateStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// Reaches the state store by spawning an external command:
/// `<program> state get <key>` and `<program> state set <key> <value>`.
/// `get` expects `key=value` on stdout.
pub struct CommandStateStore {
    program: String,
}

impl CommandStateStore {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl StateStore for CommandStateStore {
    fn get(&self, key: &str) -> Option<String> {
        let output = Command::new(&self.program)
            .args(["state", "get", key])
            .output()
            .ok()?;
        if !output.status.success() {
            return None;
        }
        let stdout = String::from_utf8(output.stdout).ok()?;
        let (_, value) = stdout.trim().split_once('=')?;
        Some(value.to_string())
    }

    fn set(&self, key: &str, value: &str) {
        let _ = Command::new(&self.program)
            .args(["state", "set", key, value])
            .output();
    }
}

/// In-process store backed by a mutex-guarded map. Injected in tests in
/// place of the spawned command.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Default::default()
    }
}

impl StateStore for MemoryStateStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
    }
}

#[test]
fn command_store_swallows_missing_program() {
    let store = CommandStateStore::new("no-such-program-tramvia");
    assert!(store.get("some:key").is_none());
    // Must not panic.
    store.set("some:key", "value");
}

#[test]
fn memory_store_round_trip() {
    let store = MemoryStateStore::new();
    assert!(store.get("k").is_none());
    store.set("k", "v");
    assert_eq!(store.get("k").as_deref(), Some("v"));
}
