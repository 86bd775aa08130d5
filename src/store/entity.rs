use chrono::Utc;
use serde_json::Value;

use super::Record;

/// The collections the store knows about. All identifiers sent to SQL come
/// from this table, never from request input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Users,
    Psychologists,
    Packages,
    Appointments,
    Payments,
    Tests,
    TestResults,
    BlogPosts,
    NewsItems,
    Videos,
    Events,
    EventSignups,
    SupportOrgs,
    Applications,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Int,
    Real,
    Bool,
    Timestamp,
    Json,
}

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub ty: ColumnType,
}

const fn col(name: &'static str, ty: ColumnType) -> Column {
    Column { name, ty }
}

use ColumnType::{Bool, Int, Json, Real, Text, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSpec {
    pub column: &'static str,
    pub descending: bool,
}

impl OrderSpec {
    pub const fn asc(column: &'static str) -> Self {
        Self {
            column,
            descending: false,
        }
    }

    pub const fn desc(column: &'static str) -> Self {
        Self {
            column,
            descending: true,
        }
    }
}

impl Entity {
    pub const ALL: [Entity; 14] = [
        Entity::Users,
        Entity::Psychologists,
        Entity::Packages,
        Entity::Appointments,
        Entity::Payments,
        Entity::Tests,
        Entity::TestResults,
        Entity::BlogPosts,
        Entity::NewsItems,
        Entity::Videos,
        Entity::Events,
        Entity::EventSignups,
        Entity::SupportOrgs,
        Entity::Applications,
    ];

    pub fn table(&self) -> &'static str {
        match self {
            Entity::Users => "users",
            Entity::Psychologists => "psychologists",
            Entity::Packages => "packages",
            Entity::Appointments => "appointments",
            Entity::Payments => "payments",
            Entity::Tests => "tests",
            Entity::TestResults => "test_results",
            Entity::BlogPosts => "blog_posts",
            Entity::NewsItems => "news_items",
            Entity::Videos => "videos",
            Entity::Events => "events",
            Entity::EventSignups => "event_signups",
            Entity::SupportOrgs => "support_orgs",
            Entity::Applications => "psychologist_applications",
        }
    }

    /// Primary key column. Packages use their natural code.
    pub fn key(&self) -> &'static str {
        match self {
            Entity::Packages => "code",
            _ => "id",
        }
    }

    pub fn columns(&self) -> &'static [Column] {
        match self {
            Entity::Users => const { &[
                col("id", Text),
                col("name", Text),
                col("email", Text),
                col("password_hash", Text),
                col("is_admin", Bool),
                col("created_at", Timestamp),
            ] },
            Entity::Psychologists => const { &[
                col("id", Text),
                col("name", Text),
                col("title", Text),
                col("price_cents", Int),
                col("rating", Real),
                col("bio", Text),
                col("tags", Json),
                col("image_url", Text),
                col("created_at", Timestamp),
            ] },
            Entity::Packages => const { &[
                col("code", Text),
                col("sessions", Int),
                col("price_cents", Int),
                col("discount_cents", Int),
            ] },
            Entity::Appointments => const { &[
                col("id", Text),
                col("user_id", Text),
                col("psychologist_id", Text),
                col("scheduled_at", Timestamp),
                col("duration_minutes", Int),
                col("status", Text),
                col("package_code", Text),
                col("created_at", Timestamp),
            ] },
            Entity::Payments => const { &[
                col("id", Text),
                col("appointment_id", Text),
                col("user_id", Text),
                col("amount_cents", Int),
                col("currency", Text),
                col("status", Text),
                col("provider", Text),
                col("created_at", Timestamp),
            ] },
            Entity::Tests => const { &[
                col("id", Text),
                col("name", Text),
                col("category", Text),
                col("duration_minutes", Int),
            ] },
            Entity::TestResults => const { &[
                col("id", Text),
                col("user_id", Text),
                col("test_id", Text),
                col("score", Int),
                col("result", Text),
                col("created_at", Timestamp),
            ] },
            Entity::BlogPosts => const { &[
                col("id", Text),
                col("title", Text),
                col("category", Text),
                col("summary", Text),
                col("read_minutes", Int),
                col("content", Text),
                col("image_url", Text),
                col("published_at", Timestamp),
            ] },
            Entity::NewsItems => const { &[
                col("id", Text),
                col("title", Text),
                col("summary", Text),
                col("source", Text),
                col("url", Text),
                col("image_url", Text),
                col("published_at", Timestamp),
            ] },
            Entity::Videos => const { &[
                col("id", Text),
                col("title", Text),
                col("category", Text),
                col("duration", Text),
                col("channel", Text),
                col("url", Text),
                col("image_url", Text),
            ] },
            Entity::Events => const { &[
                col("id", Text),
                col("title", Text),
                col("description", Text),
                col("category", Text),
                col("date_time", Timestamp),
                col("image_url", Text),
                col("status", Text),
                col("is_recorded", Bool),
            ] },
            Entity::EventSignups => const { &[
                col("id", Text),
                col("user_id", Text),
                col("event_id", Text),
                col("created_at", Timestamp),
            ] },
            Entity::SupportOrgs => const { &[
                col("id", Text),
                col("name", Text),
                col("category", Text),
                col("city", Text),
                col("country", Text),
                col("description", Text),
                col("phone", Text),
                col("email", Text),
                col("website", Text),
                col("tags", Json),
                col("image_url", Text),
            ] },
            Entity::Applications => const { &[
                col("id", Text),
                col("user_id", Text),
                col("status", Text),
                col("payload", Json),
                col("created_at", Timestamp),
            ] },
        }
    }

    pub fn column(&self, name: &str) -> Option<Column> {
        self.columns().iter().copied().find(|c| c.name == name)
    }

    /// Columns that must reference an existing row in another collection at
    /// creation time. The relational backend enforces these with REFERENCES;
    /// the file backend checks them explicitly on insert only.
    pub fn foreign_keys(&self) -> &'static [(&'static str, Entity)] {
        match self {
            Entity::Appointments => &[
                ("user_id", Entity::Users),
                ("psychologist_id", Entity::Psychologists),
                ("package_code", Entity::Packages),
            ],
            Entity::Payments => &[
                ("appointment_id", Entity::Appointments),
                ("user_id", Entity::Users),
            ],
            Entity::TestResults => &[("user_id", Entity::Users), ("test_id", Entity::Tests)],
            Entity::EventSignups => {
                &[("user_id", Entity::Users), ("event_id", Entity::Events)]
            }
            Entity::Applications => &[("user_id", Entity::Users)],
            _ => &[],
        }
    }

    /// Columns carrying a UNIQUE constraint in the relational schema.
    pub fn unique_columns(&self) -> &'static [&'static str] {
        match self {
            Entity::Users => &["email"],
            _ => &[],
        }
    }

    /// Ordering applied to plain list reads.
    pub fn default_order(&self) -> Option<OrderSpec> {
        match self {
            Entity::Users => Some(OrderSpec::desc("created_at")),
            Entity::Psychologists => Some(OrderSpec::desc("created_at")),
            Entity::Packages => Some(OrderSpec::asc("sessions")),
            Entity::Appointments => Some(OrderSpec::desc("created_at")),
            Entity::Tests => Some(OrderSpec::asc("category")),
            Entity::BlogPosts => Some(OrderSpec::desc("published_at")),
            Entity::NewsItems => Some(OrderSpec::desc("published_at")),
            Entity::Events => Some(OrderSpec::desc("date_time")),
            Entity::Applications => Some(OrderSpec::desc("created_at")),
            _ => None,
        }
    }

    /// Values applied when the caller omits a column on insert.
    fn defaults(&self) -> Vec<(&'static str, Value)> {
        match self {
            Entity::Events => vec![
                ("status", Value::String("upcoming".into())),
                ("is_recorded", Value::Bool(false)),
            ],
            Entity::Packages => vec![("discount_cents", Value::from(0))],
            Entity::Psychologists | Entity::SupportOrgs => {
                vec![("tags", Value::Array(Vec::new()))]
            }
            _ => Vec::new(),
        }
    }

    /// Shape an incoming record for insert: keep only known columns, apply
    /// per-entity defaults, stamp creation timestamps, and fill whatever is
    /// left with null so rows are uniform across both backends.
    pub fn prepare_insert(&self, mut input: Record) -> Record {
        input.retain(|name, _| self.column(name).is_some());

        for (name, value) in self.defaults() {
            let slot = input.entry(name.to_string()).or_insert(Value::Null);
            if slot.is_null() {
                *slot = value;
            }
        }

        let mut record = Record::new();
        let now = Utc::now().to_rfc3339();
        for column in self.columns() {
            let value = match input.remove(column.name) {
                Some(v) => v,
                None => Value::Null,
            };
            let value = match (column.name, &value) {
                ("created_at" | "published_at", Value::Null) => Value::String(now.clone()),
                _ => value,
            };
            record.insert(column.name.to_string(), value);
        }
        record
    }

    /// Shape an incoming partial update: unknown columns are dropped and the
    /// primary key is never patched.
    pub fn prepare_patch(&self, mut patch: Record) -> Record {
        let key = self.key();
        patch.retain(|name, _| name != key && self.column(name).is_some());
        patch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prepare_insert_fills_all_columns() {
        let record = Entity::Psychologists.prepare_insert(
            json!({"id": "psy-9", "name": "Dr. Test", "bogus": 1})
                .as_object()
                .cloned()
                .unwrap(),
        );
        assert_eq!(record.len(), Entity::Psychologists.columns().len());
        assert_eq!(record["name"], json!("Dr. Test"));
        assert_eq!(record["bio"], Value::Null);
        assert_eq!(record["tags"], json!([]));
        assert!(record.get("bogus").is_none());
        assert!(record["created_at"].is_string());
    }

    #[test]
    fn prepare_insert_applies_event_defaults() {
        let record = Entity::Events.prepare_insert(
            json!({"id": "event-9", "title": "Roda"})
                .as_object()
                .cloned()
                .unwrap(),
        );
        assert_eq!(record["status"], json!("upcoming"));
        assert_eq!(record["is_recorded"], json!(false));
    }

    #[test]
    fn prepare_patch_protects_key() {
        let patch = Entity::BlogPosts.prepare_patch(
            json!({"id": "other", "title": "New", "junk": true})
                .as_object()
                .cloned()
                .unwrap(),
        );
        assert_eq!(patch.len(), 1);
        assert_eq!(patch["title"], json!("New"));
    }

    #[test]
    fn every_entity_key_is_a_column() {
        for entity in Entity::ALL {
            assert!(
                entity.column(entity.key()).is_some(),
                "{} missing key column",
                entity.table()
            );
        }
    }

    #[test]
    fn foreign_keys_name_real_columns() {
        for entity in Entity::ALL {
            for (column, _) in entity.foreign_keys() {
                assert!(entity.column(column).is_some(), "{column} on {:?}", entity);
            }
        }
    }
}
