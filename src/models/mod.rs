pub mod assignment;
pub mod customer;
pub mod driver;
pub mod id;

use serde::{Deserialize, Deserializer};

/// Distinguishes an absent patch field (`None`) from an explicit `null` (`Some(None)`).
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
