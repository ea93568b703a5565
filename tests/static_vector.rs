use self::data::{BODY, IDEMPOTENCY_KEY, KID, PATH, STATIC_SIGNATURE};
use tl_signature::Error;


#[test]
fn verifies_precomputed_signature() {
    tl_signature::verify_with_pem(data::PUBLIC_KEY)
        .unwrap()
        .method("POST")
        .path(PATH)
        .header("Idempotency-Key", IDEMPOTENCY_KEY)
        .body(BODY)
        .require_header("idempotency-key")
        .verify(STATIC_SIGNATURE)
        .unwrap();
}

#[test]
fn precomputed_signature_claims() {
    let header = tl_signature::extract_jws_header(STATIC_SIGNATURE).unwrap();

    assert_eq!(header.alg.as_deref(), Some("ES512"));
    assert_eq!(header.kid.as_deref(), Some(KID));
    assert_eq!(header.tl_version, Some("2".into()));
    assert_eq!(header.tl_headers.as_deref(), Some("Idempotency-Key"));
}

#[test]
fn encoded_header_is_reproduced() {
    let tl_signature = tl_signature::sign_with_pem(KID, data::PKCS8_PRIVATE_KEY)
        .unwrap()
        .path(PATH)
        .header("Idempotency-Key", IDEMPOTENCY_KEY)
        .body(BODY)
        .sign()
        .unwrap();

    let (expected_header, _) = STATIC_SIGNATURE.split_once("..").unwrap();
    let (header, _) = tl_signature.split_once("..").unwrap();
    assert_eq!(header, expected_header);
}

#[test]
fn precomputed_signature_rejects_other_body() {
    let result = tl_signature::verify_with_pem(data::PUBLIC_KEY)
        .unwrap()
        .path(PATH)
        .header("Idempotency-Key", IDEMPOTENCY_KEY)
        .body(r#"{"currency":"EUR","max_amount_in_minor":5000000}"#)
        .verify(STATIC_SIGNATURE);

    assert!(matches!(result, Err(Error::InvalidSignature)));
}
