/// Coerces identity text into a record id.
///
/// Anything that is not a plain non-negative base-10 integer yields `None`,
/// which never matches a stored record.
pub fn parse_id(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok()
}
