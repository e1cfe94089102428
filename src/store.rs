use crate::error::{Result, TodoError};
use crate::todo::{Item, TodoList};
use log::{debug, info, warn};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Owns the JSON file the todos live in, and the `.seq` file next to it
/// holding the next id to hand out.
#[derive(Debug, Clone)]
pub struct Store {
  path: PathBuf,
}

impl Store {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Store { path: path.into() }
  }

  fn seq_path(&self) -> PathBuf {
    let mut name = self.path.as_os_str().to_owned();
    name.push(".seq");
    PathBuf::from(name)
  }

  /// Reads the list, creating an empty file first if there is none.
  pub fn load(&self) -> Result<TodoList> {
    if !self.path.exists() {
      info!("creating empty todo file at {}", self.path.display());
      if let Some(dir) = parent_dir(&self.path) {
        fs::create_dir_all(dir).map_err(|e| TodoError::io(dir, e))?;
      }
      write_atomic(&self.path, b"[]\n")?;
    }

    let raw = fs::read_to_string(&self.path).map_err(|e| TodoError::corrupt(&self.path, e))?;
    let items: Vec<Item> =
      serde_json::from_str(&raw).map_err(|e| TodoError::corrupt(&self.path, e))?;
    let next_id = self.read_seq()?;
    let list = TodoList::from_parts(items, next_id)
      .map_err(|reason| TodoError::corrupt(&self.path, reason))?;

    if list.ids_exhausted() {
      warn!(
        "{} has used every todo id; new todos cannot be added",
        self.path.display()
      );
    }
    debug!(
      "loaded {} todos from {} (next id {})",
      list.len(),
      self.path.display(),
      list.next_id()
    );
    Ok(list)
  }

  /// Replaces the file contents. The sequence file goes first so an
  /// interrupted save can skip ids but never hand one out twice.
  pub fn save(&self, list: &TodoList) -> Result<()> {
    write_atomic(&self.seq_path(), format!("{}\n", list.next_id()).as_bytes())?;

    let mut json = serde_json::to_string_pretty(list.items())
      .map_err(|e| TodoError::io(&self.path, e.into()))?;
    json.push('\n');
    write_atomic(&self.path, json.as_bytes())?;

    debug!("saved {} todos to {}", list.len(), self.path.display());
    Ok(())
  }

  fn read_seq(&self) -> Result<u64> {
    let seq_path = self.seq_path();
    if !seq_path.exists() {
      return Ok(0);
    }
    let raw = fs::read_to_string(&seq_path).map_err(|e| TodoError::corrupt(&seq_path, e))?;
    raw
      .trim()
      .parse::<u64>()
      .map_err(|e| TodoError::corrupt(&seq_path, e))
  }
}

fn parent_dir(path: &Path) -> Option<&Path> {
  path.parent().filter(|dir| !dir.as_os_str().is_empty())
}

/// Writes to a temp file beside `path` and renames it into place.
fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
  let dir = parent_dir(path).unwrap_or_else(|| Path::new("."));
  let mut tmp = NamedTempFile::new_in(dir).map_err(|e| TodoError::io(path, e))?;
  tmp
    .write_all(contents)
    .and_then(|_| tmp.as_file().sync_all())
    .map_err(|e| TodoError::io(path, e))?;
  tmp.persist(path).map_err(|e| TodoError::io(path, e.error))?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn load_creates_missing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("todos.json");
    let store = Store::new(&path);

    let list = store.load().unwrap();
    assert!(list.is_empty());
    assert_eq!(fs::read_to_string(&path).unwrap().trim(), "[]");
  }

  #[test]
  fn save_then_load_round_trips() {
    let dir = tempdir().unwrap();
    let store = Store::new(dir.path().join("todos.json"));

    let mut list = TodoList::default();
    list.add("buy milk").unwrap();
    list.add("walk dog").unwrap();
    list.complete(2).unwrap();
    list.remove(1).unwrap();
    list.add("call mum").unwrap();
    store.save(&list).unwrap();

    assert_eq!(store.load().unwrap(), list);
  }

  #[test]
  fn saved_file_is_two_space_pretty_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("todos.json");
    let store = Store::new(&path);

    let mut list = TodoList::default();
    list.add("a").unwrap();
    store.save(&list).unwrap();

    let expected = "[\n  {\n    \"id\": 1,\n    \"title\": \"a\",\n    \"done\": false\n  }\n]\n";
    assert_eq!(fs::read_to_string(&path).unwrap(), expected);
    assert_eq!(fs::read_to_string(store.seq_path()).unwrap(), "2\n");
  }

  #[test]
  fn removed_newest_id_is_not_reused_across_loads() {
    let dir = tempdir().unwrap();
    let store = Store::new(dir.path().join("todos.json"));

    let mut list = store.load().unwrap();
    list.add("a").unwrap();
    list.add("b").unwrap();
    list.remove(2).unwrap();
    store.save(&list).unwrap();

    let mut list = store.load().unwrap();
    assert_eq!(list.add("c").unwrap().id, 3);
  }

  #[test]
  fn missing_seq_file_falls_back_to_max_id() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("todos.json");
    fs::write(
      &path,
      r#"[{"id": 1, "title": "a", "done": false}, {"id": 5, "title": "b", "done": true}]"#,
    )
    .unwrap();

    let list = Store::new(&path).load().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list.next_id(), 6);
  }

  #[test]
  fn corrupt_files_are_reported_and_left_alone() {
    let cases = [
      "not json",
      r#"{"id": 1}"#,
      r#"[{"id": 1, "done": false}]"#,
      r#"[{"id": "one", "title": "a", "done": false}]"#,
      r#"[{"id": 1, "title": "a", "done": "no"}]"#,
      r#"[{"id": 1, "title": "a", "done": false}, {"id": 1, "title": "b", "done": false}]"#,
    ];
    for contents in cases {
      let dir = tempdir().unwrap();
      let path = dir.path().join("todos.json");
      fs::write(&path, contents).unwrap();

      let err = Store::new(&path).load().unwrap_err();
      assert!(
        matches!(err, TodoError::CorruptStore { .. }),
        "{contents}: {err}"
      );
      assert_eq!(fs::read_to_string(&path).unwrap(), contents);
    }
  }

  #[test]
  fn corrupt_seq_file_is_reported() {
    let dir = tempdir().unwrap();
    let store = Store::new(dir.path().join("todos.json"));
    store.save(&TodoList::default()).unwrap();
    fs::write(store.seq_path(), "lots").unwrap();

    assert!(matches!(
      store.load(),
      Err(TodoError::CorruptStore { .. })
    ));
  }
}
