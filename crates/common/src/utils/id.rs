use rand::distributions::Alphanumeric;
use rand::Rng;

/// Short random alphanumeric id for embedded sub-documents (e.g. car msgs),
/// which never go through the database's own id generation.
pub fn make_id(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::make_id;

    #[test]
    fn make_id_has_requested_length() {
        assert_eq!(make_id(6).len(), 6);
        assert_eq!(make_id(12).len(), 12);
    }

    #[test]
    fn make_id_is_alphanumeric() {
        assert!(make_id(64).chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
