use crate::error::{Result, TodoError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Item {
  pub id: u64,
  pub title: String,
  pub done: bool,
}

/// Todos in insertion order, plus the next id to hand out.
///
/// `next_id` only ever grows, so an id freed by `remove` is never given
/// to a later item. Once it reaches `u64::MAX` no more ids can be handed
/// out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoList {
  items: Vec<Item>,
  next_id: u64,
}

impl Default for TodoList {
  fn default() -> Self {
    TodoList {
      items: Vec::new(),
      next_id: 1,
    }
  }
}

impl TodoList {
  /// Rebuilds a list from stored items. `next_id` is raised past every
  /// existing id; duplicate ids and blank titles are rejected.
  pub fn from_parts(items: Vec<Item>, next_id: u64) -> Result<Self, String> {
    let mut seen = std::collections::HashSet::new();
    for item in &items {
      if !seen.insert(item.id) {
        return Err(format!("duplicate id {}", item.id));
      }
      if item.title.trim().is_empty() {
        return Err(format!("todo {} has an empty title", item.id));
      }
    }
    let past_max = items.iter().map(|i| i.id.saturating_add(1)).max().unwrap_or(1);
    Ok(TodoList {
      next_id: next_id.max(past_max).max(1),
      items,
    })
  }

  pub fn items(&self) -> &[Item] {
    &self.items
  }

  pub fn next_id(&self) -> u64 {
    self.next_id
  }

  /// `u64::MAX` is never handed out by `add`; reaching it means the
  /// list is full.
  pub fn ids_exhausted(&self) -> bool {
    self.next_id == u64::MAX
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn find(&self, id: u64) -> Option<&Item> {
    self.items.iter().find(|item| item.id == id)
  }

  pub fn add(&mut self, title: &str) -> Result<&Item> {
    let title = validate_title(title)?;
    let id = self.next_id;
    let next_id = id.checked_add(1).ok_or(TodoError::IdsExhausted)?;
    let item = Item {
      id,
      title,
      done: false,
    };
    self.next_id = next_id;
    self.items.push(item);
    Ok(&self.items[self.items.len() - 1])
  }

  pub fn remove(&mut self, id: u64) -> Result<Item> {
    let pos = self.position(id)?;
    Ok(self.items.remove(pos))
  }

  pub fn complete(&mut self, id: u64) -> Result<&Item> {
    self.set_done(id, true)
  }

  pub fn reopen(&mut self, id: u64) -> Result<&Item> {
    self.set_done(id, false)
  }

  /// Replaces the title, returning the old one.
  pub fn rename(&mut self, id: u64, title: &str) -> Result<String> {
    let title = validate_title(title)?;
    let pos = self.position(id)?;
    Ok(std::mem::replace(&mut self.items[pos].title, title))
  }

  fn set_done(&mut self, id: u64, done: bool) -> Result<&Item> {
    let pos = self.position(id)?;
    let item = &mut self.items[pos];
    item.done = done;
    Ok(item)
  }

  fn position(&self, id: u64) -> Result<usize> {
    self
      .items
      .iter()
      .position(|item| item.id == id)
      .ok_or(TodoError::NotFound(id))
  }
}

pub fn validate_title(title: &str) -> Result<String> {
  let trimmed = title.trim();
  if trimmed.is_empty() {
    return Err(TodoError::InvalidArgument(
      "title must not be empty".to_string(),
    ));
  }
  Ok(trimmed.to_string())
}

pub fn parse_id(raw: &str) -> Result<u64> {
  raw
    .trim()
    .parse::<u64>()
    .map_err(|_| TodoError::InvalidArgument(format!("'{}' is not a valid todo id", raw)))
}
