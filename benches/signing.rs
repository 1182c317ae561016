use criterion::{black_box, criterion_group, criterion_main, Criterion};
use yahoo_oauth1::encode::{base_string, Params};
use yahoo_oauth1::nonce::NonceGenerator;
use yahoo_oauth1::signer::{sign_params, SignatureMethod};

fn resource_params() -> Params {
    [
        ("format", "json"),
        ("realm", "yahooapis.com"),
        ("oauth_consumer_key", "dj0yJmk9Y29uc3VtZXJrZXk"),
        ("oauth_nonce", "3141592653+1"),
        ("oauth_timestamp", "1700000000"),
        ("oauth_token", "A=access-token-value"),
        ("oauth_version", "1.0"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn bench_base_string(c: &mut Criterion) {
    let params = resource_params();
    c.bench_function("base_string", |b| {
        b.iter(|| {
            base_string(
                black_box("GET"),
                black_box("http://social.yahooapis.com/v1/user/GUID/profile"),
                black_box(&params),
            )
        })
    });
}

fn bench_hmac_sha1(c: &mut Criterion) {
    c.bench_function("sign_params_hmac_sha1", |b| {
        b.iter(|| {
            let mut params = resource_params();
            sign_params(
                SignatureMethod::HmacSha1,
                "GET",
                "http://social.yahooapis.com/v1/user/GUID/profile",
                &mut params,
                black_box("consumer-secret"),
                black_box("token-secret"),
            )
            .unwrap();
            params
        })
    });
}

fn bench_nonce(c: &mut Criterion) {
    let generator = NonceGenerator::new();
    c.bench_function("nonce", |b| b.iter(|| generator.nonce()));
}

criterion_group!(benches, bench_base_string, bench_hmac_sha1, bench_nonce);
criterion_main!(benches);
