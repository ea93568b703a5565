use self::data::{BODY, IDEMPOTENCY_KEY, KID, PATH};
use tl_signature::{Error, PrivateKey, PublicKey, base64url};


fn sign_request() -> String {
    tl_signature::sign_with_pem(KID, data::PKCS8_PRIVATE_KEY)
        .unwrap()
        .method("post")
        .path(PATH)
        .header("Idempotency-Key", IDEMPOTENCY_KEY)
        .body(BODY)
        .sign()
        .unwrap()
}

fn verifier() -> tl_signature::Verifier<'static> {
    tl_signature::verify_with_pem(data::PUBLIC_KEY).unwrap()
}

#[test]
fn sign_then_verify() {
    let tl_signature = sign_request();

    verifier()
        .method("POST")
        .path(PATH)
        .header("X-Whatever-2", "t2345d")
        .header("idempotency-key", IDEMPOTENCY_KEY)
        .header("X-Whatever", "aoitbeh")
        .body(BODY)
        .require_header("Idempotency-Key")
        .verify(&tl_signature)
        .unwrap();
}

#[test]
fn header_claims() {
    let tl_signature = sign_request();
    let header = tl_signature::extract_jws_header(&tl_signature).unwrap();

    assert_eq!(header.alg.as_deref(), Some("ES512"));
    assert_eq!(header.kid.as_deref(), Some(KID));
    assert_eq!(header.tl_version, Some("2".into()));
    assert_eq!(header.tl_headers.as_deref(), Some("Idempotency-Key"));
    assert_eq!(header.jku, None);
    assert_eq!(tl_signature::extract_kid(&tl_signature).unwrap(), KID);
}

#[test]
fn legacy_claims_fall_back_to_request_headers() {
    let header = base64url::encode(format!(r#"{{"alg":"ES512","kid":"{KID}"}}"#));
    let payload = tl_signature::payload::build(
        "POST",
        PATH,
        [("Idempotency-Key", IDEMPOTENCY_KEY.as_bytes())],
        BODY.as_bytes(),
    );
    let signing_input = format!("{header}.{}", base64url::encode(&payload));
    let signature = data::get_private_key().sign_bytes(signing_input.as_bytes());
    let tl_signature = format!("{header}..{}", base64url::encode(signature));

    verifier()
        .path(PATH)
        .header("Idempotency-Key", IDEMPOTENCY_KEY)
        .header("Tl-Signature-Version", "2")
        .header("Tl-Signature-Headers", "Idempotency-Key")
        .body(BODY)
        .require_header("Idempotency-Key")
        .verify(&tl_signature)
        .unwrap();

    let result = verifier()
        .path(PATH)
        .header("Idempotency-Key", IDEMPOTENCY_KEY)
        .header("Tl-Signature-Version", "2")
        .body(BODY)
        .verify(&tl_signature);
    assert!(matches!(result, Err(Error::InvalidSignature)));

    let result = verifier()
        .path(PATH)
        .header("Idempotency-Key", IDEMPOTENCY_KEY)
        .header("Tl-Signature-Headers", "Idempotency-Key")
        .body(BODY)
        .verify(&tl_signature);
    assert!(matches!(result, Err(Error::UnsupportedVersion(..))));
}

#[test]
fn signature_is_detached_raw_es512() {
    let tl_signature = sign_request();
    let mut segments = tl_signature.split('.');

    assert!(!segments.next().unwrap().is_empty());
    assert_eq!(segments.next(), Some(""));
    let signature = base64url::decode(segments.next().unwrap()).unwrap();
    assert_eq!(signature.len(), 132);
    assert_eq!(segments.next(), None);
}

#[test]
fn verifier_can_be_reused() {
    let first = sign_request();
    let second = sign_request();

    let verifier = verifier()
        .path(PATH)
        .header("Idempotency-Key", IDEMPOTENCY_KEY)
        .body(BODY);

    verifier.verify(&first).unwrap();
    verifier.verify(&second).unwrap();
}

#[test]
fn bit_flipped_signature() {
    let tl_signature = sign_request();
    let (header, signature) = tl_signature.split_once("..").unwrap();

    let mut signature = base64url::decode(signature).unwrap();
    signature[42] ^= 0b0000_0100;
    let tampered = format!("{header}..{}", base64url::encode(&signature));

    let result = verifier()
        .path(PATH)
        .header("Idempotency-Key", IDEMPOTENCY_KEY)
        .body(BODY)
        .verify(&tampered);

    assert!(matches!(result, Err(Error::InvalidSignature)));
}

#[test]
fn tampered_method() {
    let result = verifier()
        .method("PUT")
        .path(PATH)
        .header("Idempotency-Key", IDEMPOTENCY_KEY)
        .body(BODY)
        .verify(&sign_request());

    assert!(matches!(result, Err(Error::InvalidSignature)));
}

#[test]
fn tampered_path() {
    let result = verifier()
        .path("/merchant_accounts/00000000-ee05-4077-92f3-25543a11bd8d/sweeping")
        .header("Idempotency-Key", IDEMPOTENCY_KEY)
        .body(BODY)
        .verify(&sign_request());

    assert!(matches!(result, Err(Error::InvalidSignature)));
}

#[test]
fn tampered_header_value() {
    let result = verifier()
        .path(PATH)
        .header("Idempotency-Key", "something-else")
        .body(BODY)
        .verify(&sign_request());

    assert!(matches!(result, Err(Error::InvalidSignature)));
}

#[test]
fn tampered_body() {
    let result = verifier()
        .path(PATH)
        .header("Idempotency-Key", IDEMPOTENCY_KEY)
        .body(r#"{"currency":"GBP","max_amount_in_minor":5000001}"#)
        .verify(&sign_request());

    assert!(matches!(result, Err(Error::InvalidSignature)));
}

#[test]
fn missing_signed_header() {
    let result = verifier()
        .path(PATH)
        .header("X-Whatever", "aoitbeh")
        .body(BODY)
        .verify(&sign_request());

    assert!(matches!(
        result,
        Err(Error::MissingSignedHeader(name)) if name == "Idempotency-Key"
    ));
}

#[test]
fn missing_required_header() {
    let result = verifier()
        .path(PATH)
        .header("Idempotency-Key", IDEMPOTENCY_KEY)
        .header("X-Required", "value")
        .body(BODY)
        .require_header("X-Required")
        .verify(&sign_request());

    assert!(matches!(
        result,
        Err(Error::MissingRequiredHeader(name)) if name == "X-Required"
    ));
}

#[test]
fn header_order_is_irrelevant() {
    let tl_signature = tl_signature::sign_with_key(KID, data::get_private_key())
        .path(PATH)
        .header("Idempotency-Key", IDEMPOTENCY_KEY)
        .header("X-Custom", "123")
        .body(BODY)
        .sign()
        .unwrap();

    verifier()
        .path(PATH)
        .header("x-custom", "123")
        .header("IDEMPOTENCY-KEY", IDEMPOTENCY_KEY)
        .body(BODY)
        .verify(&tl_signature)
        .unwrap();
}

#[test]
fn trailing_slash_is_tolerated() {
    let key = data::get_private_key();

    let with_slash = tl_signature::sign_with_key(KID, &key)
        .path("/tl-webhook/")
        .body(BODY)
        .sign()
        .unwrap();
    let without_slash = tl_signature::sign_with_key(KID, &key)
        .path("/tl-webhook")
        .body(BODY)
        .sign()
        .unwrap();

    verifier()
        .path("/tl-webhook")
        .body(BODY)
        .verify(&with_slash)
        .unwrap();
    verifier()
        .path("/tl-webhook/")
        .body(BODY)
        .verify(&without_slash)
        .unwrap();

    let result = verifier().path("/other").body(BODY).verify(&with_slash);
    assert!(matches!(result, Err(Error::InvalidSignature)));
}

#[test]
fn trailing_slash_retry_doesnt_mask_other_mismatches() {
    let tl_signature = tl_signature::sign_with_key(KID, data::get_private_key())
        .path("/tl-webhook/")
        .body(BODY)
        .sign()
        .unwrap();

    let result = verifier()
        .path("/tl-webhook")
        .body("{}")
        .verify(&tl_signature);

    assert!(matches!(result, Err(Error::InvalidSignature)));
}

#[test]
fn sec1_and_pkcs8_keys_are_interchangeable() {
    let pkcs8 = data::get_private_key();
    let sec1 = PrivateKey::from_pem(data::SEC1_PRIVATE_KEY).unwrap();

    assert_eq!(pkcs8.public_key(), sec1.public_key());
    assert_eq!(sec1.public_key(), data::get_public_key());

    let tl_signature = tl_signature::sign_with_pem(KID, data::SEC1_PRIVATE_KEY)
        .unwrap()
        .path(PATH)
        .body(BODY)
        .sign()
        .unwrap();

    tl_signature::verify_with_key(data::get_public_key())
        .path(PATH)
        .body(BODY)
        .verify(&tl_signature)
        .unwrap();
}

#[test]
fn wrong_key() {
    let tl_signature = sign_request();
    let other_key = PublicKey::from_pem(data::WEBHOOK_PUBLIC_KEY).unwrap();

    let result = tl_signature::verify_with_key(other_key)
        .path(PATH)
        .header("Idempotency-Key", IDEMPOTENCY_KEY)
        .body(BODY)
        .verify(&tl_signature);

    assert!(matches!(result, Err(Error::InvalidSignature)));
}

#[test]
fn jku_is_embedded() {
    let tl_signature = tl_signature::sign_with_key(KID, data::get_private_key())
        .path(PATH)
        .jku("https://webhooks.truelayer.com/.well-known/jwks")
        .sign()
        .unwrap();

    assert_eq!(
        tl_signature::extract_jku(&tl_signature).unwrap().as_deref(),
        Some("https://webhooks.truelayer.com/.well-known/jwks")
    );
}

#[test]
fn empty_body_and_no_headers() {
    let tl_signature = tl_signature::sign_with_key(KID, data::get_private_key())
        .method("GET")
        .path("/")
        .sign()
        .unwrap();

    verifier()
        .method("get")
        .path("/")
        .verify(&tl_signature)
        .unwrap();

    let result = verifier().method("GET").path("/").body("x").verify(&tl_signature);
    assert!(matches!(result, Err(Error::InvalidSignature)));
}

#[test]
fn non_utf8_values() {
    let value: &[u8] = &[0xff, 0x00, 0xfe];
    let body: &[u8] = &[0xc3, 0x28, 0x0a, 0x00];

    let tl_signature = tl_signature::sign_with_key(KID, data::get_private_key())
        .path(PATH)
        .header("X-Binary", value)
        .body(body)
        .sign()
        .unwrap();

    verifier()
        .path(PATH)
        .header("x-binary", value)
        .body(body)
        .verify(&tl_signature)
        .unwrap();
}

#[test]
fn invalid_path_is_rejected() {
    let result = tl_signature::sign_with_key(KID, data::get_private_key())
        .path("merchant_accounts")
        .sign();

    assert!(matches!(result, Err(Error::InvalidArgument(..))));
}

#[test]
fn duplicate_header_is_rejected() {
    let result = tl_signature::sign_with_key(KID, data::get_private_key())
        .path(PATH)
        .header("Idempotency-Key", IDEMPOTENCY_KEY)
        .header("IDEMPOTENCY-KEY", "other")
        .sign();

    assert!(matches!(result, Err(Error::InvalidArgument(..))));
}

#[test]
fn malformed_tokens() {
    let verifier = verifier().path(PATH).body(BODY);

    for token in ["", "abc", "a.b.c", "a..b..c", "!!!..AQID"] {
        assert!(
            matches!(verifier.verify(token), Err(Error::MalformedSignature(..))),
            "{token}"
        );
    }
}

#[test]
fn headers_builder() {
    let headers = [
        ("Idempotency-Key", IDEMPOTENCY_KEY),
        ("X-Custom", "123"),
    ];

    let tl_signature = tl_signature::sign_with_key(KID, data::get_private_key())
        .path(PATH)
        .headers(headers.iter().map(|(name, value)| (*name, *value)))
        .body(BODY)
        .sign()
        .unwrap();

    let header = tl_signature::extract_jws_header(&tl_signature).unwrap();
    assert_eq!(header.tl_headers.as_deref(), Some("Idempotency-Key,X-Custom"));

    verifier()
        .path(PATH)
        .headers(headers.iter().map(|(name, value)| (*name, *value)))
        .body(BODY)
        .verify(&tl_signature)
        .unwrap();
}
