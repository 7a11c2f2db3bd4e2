//! Serde helpers for ordered `name -> value` maps.
//!
//! The request lists regressors in a meaningful order and the results key
//! coefficients by design-column order, so these maps are carried as
//! `Vec<(String, V)>` and (de)serialised as JSON objects.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};

pub fn serialize<S, V>(pairs: &[(String, V)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    V: serde::Serialize,
{
    let mut map = serializer.serialize_map(Some(pairs.len()))?;
    for (key, value) in pairs {
        map.serialize_entry(key, value)?;
    }
    map.end()
}

pub fn deserialize<'de, D, V>(deserializer: D) -> Result<Vec<(String, V)>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct PairsVisitor<V>(PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for PairsVisitor<V> {
        type Value = Vec<(String, V)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a JSON object")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut pairs: Vec<(String, V)> = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((key, value)) = access.next_entry::<String, V>()? {
                // A repeated key keeps its first position and takes the last value
                match pairs.iter_mut().find(|(existing, _)| *existing == key) {
                    Some(slot) => slot.1 = value,
                    None => pairs.push((key, value)),
                }
            }
            Ok(pairs)
        }
    }

    deserializer.deserialize_map(PairsVisitor(PhantomData))
}

/// Same as [`deserialize`] but tolerates an absent / `null` field.
pub fn deserialize_optional<'de, D, V>(deserializer: D) -> Result<Option<Vec<(String, V)>>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    #[derive(serde::Deserialize)]
    #[serde(bound(deserialize = "V: serde::Deserialize<'de>"))]
    struct Wrapper<V>(#[serde(deserialize_with = "deserialize")] Vec<(String, V)>);

    Option::<Wrapper<V>>::deserialize(deserializer).map(|opt| opt.map(|w| w.0))
}

#[cfg(test)]
mod tests {
    #[derive(serde::Serialize, serde::Deserialize)]
    struct Holder {
        #[serde(with = "super")]
        pairs: Vec<(String, i64)>,
    }

    #[test]
    fn object_order_is_preserved() {
        let parsed: Holder = serde_json::from_str(r#"{"pairs": {"zeta": 1, "alpha": 2, "mid": 3}}"#).unwrap();
        let keys: Vec<&str> = parsed.pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);

        let text = serde_json::to_string(&parsed).unwrap();
        assert_eq!(text, r#"{"pairs":{"zeta":1,"alpha":2,"mid":3}}"#);
    }

    #[test]
    fn repeated_key_keeps_first_slot_and_last_value() {
        let parsed: Holder = serde_json::from_str(r#"{"pairs": {"x": 1, "y": 2, "x": 3}}"#).unwrap();
        assert_eq!(parsed.pairs, vec![("x".to_string(), 3), ("y".to_string(), 2)]);
    }
}
