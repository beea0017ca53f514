use super::IndexOptions;
use serde::{
    de::{Error, Unexpected},
    Deserialize, Serialize,
};

#[derive(Serialize, Deserialize)]
struct RawIndexOptions {
    #[serde(default = "default_capacity")]
    capacity: usize,
    #[serde(default = "default_full_indexing")]
    full_indexing: bool,
}

fn default_capacity() -> usize {
    super::DEFAULT_CAPACITY
}

fn default_full_indexing() -> bool {
    true
}

impl<'a> Deserialize<'a> for IndexOptions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'a>,
    {
        let raw = RawIndexOptions::deserialize(deserializer)?;
        IndexOptions::new(raw.capacity, raw.full_indexing).map_err(|_| {
            D::Error::invalid_value(
                Unexpected::Unsigned(raw.capacity as u64),
                &"a positive capacity",
            )
        })
    }
}

impl Serialize for IndexOptions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        RawIndexOptions {
            capacity: self.capacity,
            full_indexing: self.full_indexing,
        }
        .serialize(serializer)
    }
}
