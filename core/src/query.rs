// core/src/query.rs

//! Parsing of the `limit` / `offset` / `fields` / `user` list arguments.
//!
//! The HTTP layer hands these over as raw strings; malformed values become a
//! [`Rejection`] naming the offending parameter.

use serde::Deserialize;
use serde_json::Value;

use crate::model::Attributes;
use crate::outcome::Rejection;

/// Raw list arguments, exactly as received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListQuery {
  pub limit: Option<String>,
  pub offset: Option<String>,
  pub fields: Option<String>,
  pub user: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
  pub limit: Option<u64>,
  pub offset: u64,
}

impl Page {
  /// Applies the window to an already ordered sequence.
  pub fn slice<T>(&self, rows: impl IntoIterator<Item = T>) -> Vec<T> {
    let skipped = rows.into_iter().skip(self.offset as usize);
    match self.limit {
      Some(limit) => skipped.take(limit as usize).collect(),
      None => skipped.collect(),
    }
  }
}

/// Attribute names a listing is restricted to. `All` keeps records whole.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Projection {
  #[default]
  All,
  Only(Vec<String>),
}

impl Projection {
  pub fn apply(&self, record: Attributes) -> Value {
    match self {
      Projection::All => Value::Object(record),
      Projection::Only(names) => {
        let mut projected = Attributes::new();
        for name in names {
          if let Some(value) = record.get(name) {
            projected.insert(name.clone(), value.clone());
          }
        }
        Value::Object(projected)
      }
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
  pub page: Page,
  pub projection: Projection,
  pub owner: Option<String>,
}

impl ListQuery {
  pub fn parse(&self) -> Result<ListFilter, Rejection> {
    let limit = self.limit.as_deref().map(|raw| parse_count("limit", raw)).transpose()?;
    let offset = self
      .offset
      .as_deref()
      .map(|raw| parse_count("offset", raw))
      .transpose()?
      .unwrap_or(0);

    let projection = match self.fields.as_deref() {
      None => Projection::All,
      Some(raw) => Projection::Only(parse_fields(raw)?),
    };

    let owner = match self.user.as_deref() {
      Some(raw) if raw.trim().is_empty() => {
        return Err(Rejection::new("invalid user filter: empty value"));
      }
      Some(raw) => Some(raw.trim().to_string()),
      None => None,
    };

    Ok(ListFilter {
      page: Page { limit, offset },
      projection,
      owner,
    })
  }
}

fn parse_count(name: &str, raw: &str) -> Result<u64, Rejection> {
  raw
    .trim()
    .parse::<u64>()
    .map_err(|_| Rejection::new(format!("invalid {} '{}'", name, raw)))
}

fn parse_fields(raw: &str) -> Result<Vec<String>, Rejection> {
  let mut names = Vec::new();
  for part in raw.split(',') {
    let name = part.trim();
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
      return Err(Rejection::new(format!("invalid fields '{}'", raw)));
    }
    if !names.iter().any(|existing: &String| existing == name) {
      names.push(name.to_string());
    }
  }
  Ok(names)
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn query(limit: Option<&str>, offset: Option<&str>, fields: Option<&str>, user: Option<&str>) -> ListQuery {
    ListQuery {
      limit: limit.map(String::from),
      offset: offset.map(String::from),
      fields: fields.map(String::from),
      user: user.map(String::from),
    }
  }

  #[test]
  fn empty_query_means_everything() {
    let filter = ListQuery::default().parse().unwrap();
    assert_eq!(filter, ListFilter::default());
  }

  #[test]
  fn parses_every_argument() {
    let filter = query(Some("10"), Some("20"), Some("order_id, artwork"), Some("ada@example.com"))
      .parse()
      .unwrap();
    assert_eq!(filter.page, Page { limit: Some(10), offset: 20 });
    assert_eq!(
      filter.projection,
      Projection::Only(vec!["order_id".into(), "artwork".into()])
    );
    assert_eq!(filter.owner.as_deref(), Some("ada@example.com"));
  }

  #[test]
  fn malformed_arguments_name_the_parameter() {
    let err = query(Some("ten"), None, None, None).parse().unwrap_err();
    assert_eq!(err.reason(), "invalid limit 'ten'");

    let err = query(None, Some("-1"), None, None).parse().unwrap_err();
    assert_eq!(err.reason(), "invalid offset '-1'");

    let err = query(None, None, Some("order_id,,artwork"), None).parse().unwrap_err();
    assert!(err.reason().starts_with("invalid fields"));

    let err = query(None, None, None, Some("  ")).parse().unwrap_err();
    assert!(err.reason().contains("user"));
  }

  #[test]
  fn page_slices_window() {
    let page = Page { limit: Some(2), offset: 1 };
    assert_eq!(page.slice(vec![1, 2, 3, 4]), vec![2, 3]);
    assert_eq!(Page::default().slice(vec![1, 2]), vec![1, 2]);
  }

  #[test]
  fn projection_keeps_only_present_names() {
    let mut record = Attributes::new();
    record.insert("order_id".into(), json!(1));
    record.insert("artwork".into(), json!("Nighthawks"));
    let projection = Projection::Only(vec!["artwork".into(), "frame".into()]);
    assert_eq!(projection.apply(record), json!({"artwork": "Nighthawks"}));
  }
}
