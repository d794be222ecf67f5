use serde::{Deserialize, Deserializer};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
}

/// Partial update. `age: null` clears the age; omitting it leaves it unchanged.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<i32>)]
    pub age: Option<Option<i32>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_distinguishes_null_from_missing() {
        let missing: UpdateUserRequest = serde_json::from_str(r#"{"name":"kim"}"#).unwrap();
        assert_eq!(missing.age, None);

        let cleared: UpdateUserRequest = serde_json::from_str(r#"{"age":null}"#).unwrap();
        assert_eq!(cleared.age, Some(None));

        let set: UpdateUserRequest = serde_json::from_str(r#"{"age":31}"#).unwrap();
        assert_eq!(set.age, Some(Some(31)));
    }
}
