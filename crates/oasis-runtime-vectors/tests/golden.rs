//! Golden scenarios with pinned bytes.
//!
//! All scenarios sign as Alice (unless stated) with nonce 1, amount 1000 ROSE,
//! the mainnet chain context and the Emerald mainnet runtime id. Any change
//! to CBOR encoding, key derivation or the signature context shows up here
//! first.

use oasis_runtime_vectors::cases::{
    DAVE_ETH, DAVE_ETH_LOWER_NO_PREFIX, KIND_PREFIX, UNKNOWN_ETH,
};
use oasis_runtime_vectors::config::{
    EMERALD_MAINNET_RUNTIME_ID, MAINNET_CHAIN_CONTEXT, TESTNET_CHAIN_CONTEXT,
};
use oasis_runtime_vectors::{
    generate_legacy_vectors, generate_runtime_vectors, GeneratorConfig, LegacyConfig,
    RuntimeTestVector,
};
use oasis_runtime_vectors_core::address::eth_checksum_hex;
use oasis_runtime_vectors_core::modules::contracts;
use oasis_runtime_vectors_core::{
    decode_canonical, encode_canonical, testing, BaseUnits, Call, Fee, SignatureContext,
    Transaction, UnverifiedTransaction,
};
use oasis_runtime_vectors_testkit::Scenario;

const MAINNET_SIG_CTX: &str = "cac08966e8ac2edf051c3ff598898260f3d878d00aa450573b70287b16eceab6";
const TESTNET_SIG_CTX: &str = "dbf627a9bf971a5b38e75fd2adbe205721bacb269fe105fa5dde8051fdce9fb1";

/// S1 transaction body: Deposit of 1000 ROSE to self, zero fee.
const S1_ENCODED_TX: &str = concat!(
    "a3617601626169a262736981a2656e6f6e6365016c616464726573735f73706563a169",
    "7369676e6174757265a16765643235353139582035c3f3356dd85364feba0354b545ad",
    "a109d1bdb38bf5d6126817db8c72cfd69163666565a166616d6f756e74824040646361",
    "6c6ca264626f6479a166616d6f756e74824203e844524f5345666d6574686f6471636f",
    "6e73656e7375732e4465706f736974",
);

const S1_SIGNATURE: &str = concat!(
    "d97baa91ef8a9675bbaa04f7bac68aeb06ffa8243b9819d18cd7e90cedaacebb",
    "5d6ee985c2b7576ce429cd238467f3baedcb25efdca89fa7928a4eb1e122e707",
);

/// S3 transaction body: Deposit of 1000 ROSE to Dave's Ethereum address.
const S3_ENCODED_TX: &str = concat!(
    "a3617601626169a262736981a2656e6f6e6365016c616464726573735f73706563a169",
    "7369676e6174757265a16765643235353139582035c3f3356dd85364feba0354b545ad",
    "a109d1bdb38bf5d6126817db8c72cfd69163666565a166616d6f756e74824040646361",
    "6c6ca264626f6479a262746f55007814f3d954f41b6459eb9e4bc8fbc6767ece5aa966",
    "616d6f756e74824203e844524f5345666d6574686f6471636f6e73656e7375732e4465",
    "706f736974",
);

const S3_SIGNATURE: &str = concat!(
    "70c78236d5e8a5241a23825e0b8ce7d949f721e68a8935b385079079ddc9b10c",
    "e8e129c753637641fc52ee6eb19c6bc120c445584ab83404859c9c5bf6454b04",
);

/// One tuple: zero fee, nonce 1, amount 1000, mainnet.
fn tuple() -> Vec<RuntimeTestVector> {
    let config = GeneratorConfig {
        fees: vec![Fee::default()],
        nonces: vec![1],
        amounts: vec![1000],
        chain_contexts: vec![MAINNET_CHAIN_CONTEXT.to_string()],
        ..GeneratorConfig::default()
    };
    generate_runtime_vectors(&config).unwrap()
}

fn mainnet_ctx() -> SignatureContext {
    SignatureContext::derive(&EMERALD_MAINNET_RUNTIME_ID, MAINNET_CHAIN_CONTEXT)
}

fn verify(vector: &RuntimeTestVector, ctx: &SignatureContext) -> Transaction {
    let ut: UnverifiedTransaction = decode_canonical(&vector.encoded_signed_tx).unwrap();
    ut.verify(ctx).unwrap()
}

#[test]
fn test_signature_contexts() {
    assert_eq!(mainnet_ctx().as_str(), MAINNET_SIG_CTX);
    assert_eq!(
        SignatureContext::derive(&EMERALD_MAINNET_RUNTIME_ID, TESTNET_CHAIN_CONTEXT).as_str(),
        TESTNET_SIG_CTX
    );
}

#[test]
fn test_key_addresses() {
    let alice = testing::alice().unwrap();
    assert_eq!(
        hex::encode(alice.public_key_bytes()),
        "35c3f3356dd85364feba0354b545ada109d1bdb38bf5d6126817db8c72cfd691"
    );
    assert_eq!(
        alice.address.to_bech32(),
        "oasis1qrec770vrek0a9a5lcrv0zvt22504k68svq7kzve"
    );
    assert_eq!(
        testing::bob().unwrap().address.to_bech32(),
        "oasis1qrydpazemvuwtnp3efm7vmfvg3tde044qg6cxwzx"
    );
    assert_eq!(
        testing::charlie().unwrap().address.to_bech32(),
        "oasis1qr5kfjm8lx6mctjmwcx9225q5k3nxacqwqnjahkw"
    );

    let dave = testing::dave().unwrap();
    assert_eq!(
        hex::encode(dave.public_key_bytes()),
        "03017a18d8dbc9b333862dd7463e51d684e230c90ed6703007b3590251f55f8044"
    );
    assert_eq!(
        dave.address.to_bech32(),
        "oasis1qrk58a6j2qn065m6p06jgjyt032f7qucy5wqeqpt"
    );

    let eve = testing::eve().unwrap();
    assert_eq!(
        eth_checksum_hex(&eve.eth_address.unwrap()),
        "0xFe94510049b95A8BfD7D6397177d7D2e2E5201Aa"
    );
    assert_eq!(
        eve.address.to_bech32(),
        "oasis1qzya9kcc2ax72ggla3kw3356zjpw9a74pg0p92ta"
    );
}

#[test]
fn test_s1_deposit_to_self() {
    let vectors = tuple();
    let v = &vectors[0];

    assert_eq!(v.kind, format!("{KIND_PREFIX}Deposit"));
    assert!(v.valid);
    assert_eq!(v.signer_algorithm, "ed25519_raw");
    assert_eq!(v.signature_context, MAINNET_SIG_CTX);
    assert_eq!(hex::encode(&v.encoded_tx), S1_ENCODED_TX);
    assert_eq!(hex::encode(&v.signed_tx.signatures[0].signature), S1_SIGNATURE);

    let expected_signed =
        format!("82589b{S1_ENCODED_TX}81a1697369676e61747572655840{S1_SIGNATURE}");
    assert_eq!(hex::encode(&v.encoded_signed_tx), expected_signed);

    let tx = verify(v, &mainnet_ctx());
    match tx.call {
        Call::ConsensusDeposit(deposit) => {
            assert_eq!(deposit.to, None);
            assert_eq!(deposit.amount, BaseUnits::new(1000u64, "ROSE"));
        }
        other => panic!("unexpected call {other:?}"),
    }

    let details = v.tx_details.as_ref().unwrap();
    assert_eq!(details["runtime_id"], EMERALD_MAINNET_RUNTIME_ID.to_hex());
    assert_eq!(details["chain_context"], MAINNET_CHAIN_CONTEXT);
}

#[test]
fn test_s1_matches_fixture() {
    let fixture = Scenario::new("Alice").unwrap().deposit("", 1000).unwrap();
    assert_eq!(fixture, tuple()[0]);
}

#[test]
fn test_s2_lowercase_orig_to() {
    let vectors = tuple();
    let v = &vectors[4];
    assert!(v.valid);
    assert_eq!(
        v.tx_details.as_ref().unwrap()["orig_to"],
        DAVE_ETH_LOWER_NO_PREFIX
    );
    assert_eq!(hex::encode(&v.encoded_tx), S3_ENCODED_TX);
}

#[test]
fn test_s3_deposit_to_eth_without_orig_to() {
    let vectors = tuple();
    let v = &vectors[6];
    assert!(v.valid);
    assert!(!v.tx_details.as_ref().unwrap().contains_key("orig_to"));
    assert_eq!(hex::encode(&v.encoded_tx), S3_ENCODED_TX);
    assert_eq!(hex::encode(&v.signed_tx.signatures[0].signature), S3_SIGNATURE);

    let fixture = Scenario::new("Alice").unwrap().deposit(DAVE_ETH, 1000).unwrap();
    assert_eq!(fixture.encoded_tx, v.encoded_tx);
}

#[test]
fn test_s4_mismatched_orig_to() {
    let vectors = tuple();
    let v = &vectors[7];
    assert!(!v.valid);
    assert_eq!(v.tx_details.as_ref().unwrap()["orig_to"], UNKNOWN_ETH);
    assert_eq!(hex::encode(&v.encoded_tx), S3_ENCODED_TX);
    verify(v, &mainnet_ctx());
}

#[test]
fn test_s5_dave_withdraws_to_self() {
    let vectors = tuple();
    let v = &vectors[12];
    assert_eq!(v.kind, format!("{KIND_PREFIX}Withdraw"));
    assert!(v.valid);
    assert_eq!(v.signer_algorithm, "secp256k1_raw");

    let dave = testing::dave().unwrap();
    assert_eq!(v.signer_public_key, dave.public_key_bytes());
    assert_eq!(
        eth_checksum_hex(&dave.eth_address.unwrap()),
        "0xDce075E1C39b1ae0b75D554558b6451A226ffe00"
    );

    let tx = verify(v, &mainnet_ctx());
    match tx.call {
        Call::ConsensusWithdraw(withdraw) => assert_eq!(withdraw.to, None),
        other => panic!("unexpected call {other:?}"),
    }
}

#[test]
fn test_s6_instantiate_max_code_id() {
    let fee = Fee::new(BaseUnits::new(424_242_424_242u64, "ROSE"), 3000);
    let scenario = Scenario::new("Alice").unwrap().with_fee(fee.clone());
    let v = scenario.instantiate(u64::MAX, Vec::new()).unwrap();
    assert!(v.valid);

    let tx: Transaction = decode_canonical(&v.encoded_tx).unwrap();
    assert_eq!(encode_canonical(&tx).unwrap(), v.encoded_tx);
    assert_eq!(tx.auth_info.fee, fee);
    match &tx.call {
        Call::ContractsInstantiate(body) => {
            assert_eq!(body.code_id, contracts::CodeId(u64::MAX));
            assert_eq!(body.upgrades_policy, contracts::Policy::Unspecified);
            assert!(body.tokens.is_empty());
            assert!(body.data.is_empty());
        }
        other => panic!("unexpected call {other:?}"),
    }

    let ut: UnverifiedTransaction = decode_canonical(&v.encoded_signed_tx).unwrap();
    assert_eq!(encode_canonical(&ut).unwrap(), v.encoded_signed_tx);
    assert_eq!(ut.verify(&scenario.signature_context()).unwrap(), tx);
}

#[test]
fn test_legacy_sample() {
    let config = LegacyConfig {
        fees: vec![Fee::default()],
        nonces: vec![1],
        amounts: vec![1000],
        chain_contexts: vec![MAINNET_CHAIN_CONTEXT.to_string()],
    };
    let vectors = generate_legacy_vectors(&config).unwrap();
    assert_eq!(vectors.len(), 4);

    let ctx = SignatureContext::from_raw(MAINNET_CHAIN_CONTEXT);
    for v in &vectors {
        assert_eq!(v.signature_context, MAINNET_CHAIN_CONTEXT);
        let ut: UnverifiedTransaction = decode_canonical(&v.encoded_signed_tx).unwrap();
        ut.verify(&ctx).unwrap();
        assert!(ut.verify(&mainnet_ctx()).is_err());
    }
}
