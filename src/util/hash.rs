use std::hash::{DefaultHasher, Hash, Hasher};

////////////////////////////////////////////////////////////////////////////////

pub fn hash_list(elems: impl Iterator<Item = u64>) -> u64 {
    let mut hasher = DefaultHasher::new();
    elems.for_each(|e| e.hash(&mut hasher));
    hasher.finish()
}

////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::hash_list;

    ////////////////////////////////////////////////////////////////////////////////

    #[test]
    fn list_is_order_sensitive() {
        assert!(hash_list([1, 2, 3].into_iter()) != hash_list([1, 3, 2].into_iter()));
    }
}
