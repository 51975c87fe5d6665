use uuid::Uuid;

/// Genera un nuovo id (UUIDv4) come stringa.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// True if `raw` is a well-formed id as produced by [`new_id`].
pub fn is_valid_id(raw: &str) -> bool {
    Uuid::parse_str(raw).is_ok()
}
