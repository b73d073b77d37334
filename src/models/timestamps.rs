//! Serde adapters that store `chrono` timestamps as native BSON dates so range
//! filters (`$lte`, `$gt`) compare chronologically.

use chrono::{DateTime, Utc};
use mongodb::bson::DateTime as BsonDateTime;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

pub fn to_bson(value: DateTime<Utc>) -> BsonDateTime {
    BsonDateTime::from_millis(value.timestamp_millis())
}

fn from_bson(value: BsonDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value.timestamp_millis())
}

pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    to_bson(*value).serialize(serializer)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = BsonDateTime::deserialize(deserializer)?;
    from_bson(value).ok_or_else(|| D::Error::custom("timestamp out of range"))
}

pub mod option {
    use super::*;

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.map(to_bson).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<BsonDateTime>::deserialize(deserializer)? {
            Some(value) => from_bson(value)
                .map(Some)
                .ok_or_else(|| D::Error::custom("timestamp out of range")),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn bson_conversion_keeps_millisecond_precision() {
        let value = Utc.with_ymd_and_hms(2026, 3, 1, 8, 30, 0).unwrap()
            + chrono::Duration::milliseconds(250);

        let converted = from_bson(to_bson(value)).unwrap();
        assert_eq!(converted, value);
    }
}
