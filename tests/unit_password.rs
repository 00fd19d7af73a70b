use slate::utils::password::{hash_password, verify_password};

#[test]
fn test_hash_password_produces_bcrypt_hash() {
    let hash = hash_password("correct horse battery staple").unwrap();
    assert!(hash.starts_with("$2"));
    assert_ne!(hash, "correct horse battery staple");
}

#[test]
fn test_verify_password_accepts_correct_password() {
    let hash = hash_password("password123").unwrap();
    assert!(verify_password("password123", &hash).unwrap());
}

#[test]
fn test_verify_password_rejects_wrong_password() {
    let hash = hash_password("password123").unwrap();
    assert!(!verify_password("password124", &hash).unwrap());
}

#[test]
fn test_hashes_are_salted() {
    let first = hash_password("password123").unwrap();
    let second = hash_password("password123").unwrap();
    assert_ne!(first, second);
}

#[test]
fn test_verify_password_rejects_garbage_hash() {
    assert!(verify_password("password123", "not-a-hash").is_err());
}
