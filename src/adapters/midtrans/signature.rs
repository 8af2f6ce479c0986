use sha2::{Digest, Sha512};

/// Hex SHA-512 of `order_id + status_code + gross_amount + server_key`,
/// the value Midtrans puts in `signature_key`.
pub fn signature_for(
    order_id: &str,
    status_code: &str,
    gross_amount: &str,
    server_key: &str,
) -> String {
    let mut hasher = Sha512::new();
    hasher.update(order_id.as_bytes());
    hasher.update(status_code.as_bytes());
    hasher.update(gross_amount.as_bytes());
    hasher.update(server_key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Fails closed: any missing part makes the signature invalid.
pub fn verify_signature(
    order_id: Option<&str>,
    status_code: Option<&str>,
    gross_amount: Option<&str>,
    signature_key: Option<&str>,
    server_key: &str,
) -> bool {
    let (Some(order_id), Some(status_code), Some(gross_amount), Some(signature_key)) =
        (order_id, status_code, gross_amount, signature_key)
    else {
        return false;
    };
    if server_key.is_empty() {
        return false;
    }
    constant_time_eq(
        &signature_for(order_id, status_code, gross_amount, server_key),
        signature_key,
    )
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.as_bytes().iter().zip(b.as_bytes()) {
        diff |= x ^ y;
    }
    diff == 0
}
