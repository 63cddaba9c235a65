//! Getter-based field access for typed records.
//!
//! A record type lists its getters once, in declaration order, by
//! implementing [`Record`]. Discovery keeps the getters whose member name
//! starts with one of the configured prefixes (`get`, `is` by default) and
//! derives the field name from the remainder, lower-cased:
//!
//! | member           | field         |
//! |------------------|---------------|
//! | `get_name`       | `name`        |
//! | `getFirstName`   | `firstname`   |
//! | `is_active`      | `active`      |
//! | `getter`         | (not a getter)|
//!
//! The character after the prefix must be `_` or uppercase, so `getter` or
//! `issue` are never mistaken for getters. When two members normalize to the
//! same field name, the one registered first wins.
//!
//! Name lookups are memoized in a read-through cache that is safe to share
//! across threads.

use std::collections::HashMap;
use std::fmt::Display;
use std::sync::{PoisonError, RwLock};

use thiserror::Error;
use tracing::debug;

use super::FieldDescriptor;
use crate::value::Value;

/// Member name prefixes that mark a getter.
pub const DEFAULT_PREFIXES: [&str; 2] = ["get", "is"];

/// Failure raised by a record getter.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct AccessError {
    message: String,
}

impl AccessError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Getter signature stored for each registered member.
pub type Getter<T> = fn(&T) -> Result<Value, AccessError>;

/// A registered member: its name as written and the function reading it.
pub struct Accessor<T> {
    member: &'static str,
    getter: Getter<T>,
}

impl<T> Accessor<T> {
    pub const fn new(member: &'static str, getter: Getter<T>) -> Self {
        Self { member, getter }
    }

    pub fn member(&self) -> &'static str {
        self.member
    }
}

impl<T> Clone for Accessor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Accessor<T> {}

/// Types whose getters can back an object row-set.
pub trait Record: Sized + 'static {
    /// Every candidate member, in declaration order.
    fn accessors() -> Vec<Accessor<Self>>;
}

/// Conversion of a getter's return value into a stored [`Value`].
///
/// Implemented for the supported scalars, their `Option`s, and for
/// `Result<T, E>` so a fallible getter reports its error as an
/// [`AccessError`].
pub trait IntoFieldValue {
    fn into_field_value(self) -> Result<Value, AccessError>;
}

macro_rules! into_field_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoFieldValue for $ty {
                fn into_field_value(self) -> Result<Value, AccessError> {
                    Ok(Value::from(self))
                }
            }
        )*
    };
}

into_field_value!(bool, i16, i32, i64, f32, f64, String, &str, Vec<u8>, &[u8]);

impl IntoFieldValue for Value {
    fn into_field_value(self) -> Result<Value, AccessError> {
        Ok(self)
    }
}

impl IntoFieldValue for &String {
    fn into_field_value(self) -> Result<Value, AccessError> {
        Ok(Value::Text(self.clone()))
    }
}

impl<T: IntoFieldValue> IntoFieldValue for Option<T> {
    fn into_field_value(self) -> Result<Value, AccessError> {
        match self {
            Some(v) => v.into_field_value(),
            None => Ok(Value::Null),
        }
    }
}

impl<T: IntoFieldValue, E: Display> IntoFieldValue for Result<T, E> {
    fn into_field_value(self) -> Result<Value, AccessError> {
        match self {
            Ok(v) => v.into_field_value(),
            Err(e) => Err(AccessError::new(e.to_string())),
        }
    }
}

/// Register getters on a record type.
///
/// Each listed method is called with no arguments besides `&self`; its return
/// type must implement [`IntoFieldValue`].
///
/// ```
/// use typed_cursor::record_fields;
///
/// struct Person { name: String, age: i32 }
///
/// impl Person {
///     fn get_name(&self) -> &str { &self.name }
///     fn get_age(&self) -> i32 { self.age }
/// }
///
/// record_fields!(Person { get_name, get_age });
/// ```
#[macro_export]
macro_rules! record_fields {
    ($ty:ty { $($member:ident),* $(,)? }) => {
        impl $crate::field::Record for $ty {
            fn accessors() -> Vec<$crate::field::Accessor<Self>> {
                vec![
                    $(
                        $crate::field::Accessor::<$ty>::new(stringify!($member), |record: &$ty| {
                            $crate::field::IntoFieldValue::into_field_value(record.$member())
                        }),
                    )*
                ]
            }
        }
    };
}

/// Derive a field name from a member name, or `None` if the member is not a
/// getter under `prefixes`.
pub fn field_name_for(member: &str, prefixes: &[&str]) -> Option<String> {
    prefixes.iter().find_map(|prefix| {
        let rest = member.strip_prefix(prefix)?;
        let rest = match rest.chars().next()? {
            '_' => rest.strip_prefix('_')?,
            c if c.is_uppercase() => rest,
            _ => return None,
        };
        if rest.is_empty() {
            None
        } else {
            Some(rest.to_lowercase())
        }
    })
}

/// Discovered fields of a record type with a memoized name cache.
pub struct RecordFields<T> {
    descriptors: Vec<FieldDescriptor>,
    getters: Vec<Getter<T>>,
    cache: RwLock<HashMap<String, usize>>,
}

impl<T: Record> RecordFields<T> {
    /// Discover fields using the default `get`/`is` prefixes.
    pub fn discover() -> Self {
        Self::discover_with_prefixes(&DEFAULT_PREFIXES)
    }

    pub fn discover_with_prefixes(prefixes: &[&str]) -> Self {
        let mut descriptors: Vec<FieldDescriptor> = Vec::new();
        let mut getters = Vec::new();

        for accessor in T::accessors() {
            let Some(name) = field_name_for(accessor.member, prefixes) else {
                continue;
            };
            if descriptors.iter().any(|d| d.name == name) {
                debug!(member = accessor.member, field = %name, "duplicate field, keeping first getter");
                continue;
            }
            descriptors.push(FieldDescriptor::new(name, descriptors.len()));
            getters.push(accessor.getter);
        }

        Self {
            descriptors,
            getters,
            cache: RwLock::new(HashMap::new()),
        }
    }
}

impl<T> RecordFields<T> {
    pub fn descriptors(&self) -> &[FieldDescriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn name_at(&self, position: usize) -> Option<&str> {
        self.descriptors.get(position).map(|d| d.name.as_str())
    }

    /// Resolve a field name to its position. Lookups are case-insensitive;
    /// hits are cached under the lower-cased name, misses are not cached.
    pub fn resolve(&self, name: &str) -> Option<usize> {
        let wanted = name.to_lowercase();
        if let Some(hit) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&wanted)
        {
            return Some(*hit);
        }

        let position = self
            .descriptors
            .iter()
            .find(|d| d.name == wanted)
            .map(|d| d.position)?;

        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(wanted)
            .or_insert(position);
        Some(position)
    }

    /// Number of names currently memoized.
    pub fn cached_lookups(&self) -> usize {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Call the getter at `position` on `record`.
    pub fn invoke(&self, position: usize, record: &T) -> Result<Value, AccessError> {
        let getter = self
            .getters
            .get(position)
            .ok_or_else(|| AccessError::new(format!("no getter at position {}", position)))?;
        getter(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Arc;
    use std::thread;

    struct Account {
        id: i64,
        owner: Option<String>,
        active: bool,
    }

    #[allow(non_snake_case)]
    impl Account {
        fn get_id(&self) -> i64 {
            self.id
        }
        fn getOwner(&self) -> Option<&str> {
            self.owner.as_deref()
        }
        fn is_active(&self) -> bool {
            self.active
        }
        fn get_active(&self) -> &str {
            "shadowed"
        }
        fn getter(&self) -> i32 {
            0
        }
        fn get_balance(&self) -> Result<f64, String> {
            Err("ledger offline".to_string())
        }
    }

    crate::record_fields!(Account {
        get_id,
        getOwner,
        is_active,
        get_active,
        getter,
        get_balance,
    });

    fn account() -> Account {
        Account {
            id: 9,
            owner: None,
            active: true,
        }
    }

    #[rstest]
    #[case("get_name", Some("name"))]
    #[case("getFirstName", Some("firstname"))]
    #[case("is_active", Some("active"))]
    #[case("isActive", Some("active"))]
    #[case("getter", None)]
    #[case("issue", None)]
    #[case("get", None)]
    #[case("get_", None)]
    #[case("name", None)]
    fn test_field_name_for(#[case] member: &str, #[case] expected: Option<&str>) {
        assert_eq!(field_name_for(member, &DEFAULT_PREFIXES).as_deref(), expected);
    }

    #[rstest]
    fn test_discovery_is_dense_and_ordered() {
        let fields = RecordFields::<Account>::discover();
        let names: Vec<_> = fields.descriptors().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["id", "owner", "active", "balance"]);
        for (i, d) in fields.descriptors().iter().enumerate() {
            assert_eq!(d.position, i);
        }
    }

    #[rstest]
    fn test_first_registration_wins() {
        let fields = RecordFields::<Account>::discover();
        let pos = fields.resolve("active").unwrap();
        assert_eq!(fields.invoke(pos, &account()), Ok(Value::Bool(true)));
    }

    #[rstest]
    fn test_custom_prefixes() {
        let fields = RecordFields::<Account>::discover_with_prefixes(&["is"]);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.name_at(0), Some("active"));
    }

    #[rstest]
    fn test_invoke_values() {
        let fields = RecordFields::<Account>::discover();
        let acct = account();
        assert_eq!(fields.invoke(0, &acct), Ok(Value::Long(9)));
        assert_eq!(fields.invoke(1, &acct), Ok(Value::Null));
        assert_eq!(
            fields.invoke(3, &acct),
            Err(AccessError::new("ledger offline"))
        );
        assert!(fields.invoke(42, &acct).is_err());
    }

    #[rstest]
    fn test_resolve_is_memoized_and_idempotent() {
        let fields = RecordFields::<Account>::discover();
        assert_eq!(fields.cached_lookups(), 0);
        let first = fields.resolve("owner");
        let second = fields.resolve("owner");
        assert_eq!(first, Some(1));
        assert_eq!(first, second);
        assert_eq!(fields.resolve("OWNER"), Some(1));
        assert_eq!(fields.resolve("Owner"), Some(1));
        assert_eq!(fields.cached_lookups(), 1);
    }

    #[rstest]
    fn test_unknown_names_do_not_grow_the_cache() {
        let fields = RecordFields::<Account>::discover();
        for i in 0..50 {
            assert_eq!(fields.resolve(&format!("missing_{}", i)), None);
        }
        assert_eq!(fields.resolve("missing_0"), None);
        assert_eq!(fields.cached_lookups(), 0);
    }

    #[rstest]
    fn test_resolve_from_many_threads() {
        let fields = Arc::new(RecordFields::<Account>::discover());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let fields = Arc::clone(&fields);
                thread::spawn(move || {
                    let name = if i % 2 == 0 { "id" } else { "balance" };
                    (0..100).map(|_| fields.resolve(name)).collect::<Vec<_>>()
                })
            })
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            let expected = if i % 2 == 0 { Some(0) } else { Some(3) };
            assert!(handle.join().unwrap().iter().all(|p| *p == expected));
        }
        assert_eq!(fields.cached_lookups(), 2);
    }
}
