#![deny(missing_docs)]
#![deny(unsafe_code)]

/*! # Sigforge

Signature and public key encoding validation for UTXO script evaluation,
together with the deterministic signing engine that produces such signatures.

The `script` module decides, given raw byte strings pulled off the evaluation
stack by an untrusted transaction, whether a claimed signature and public key
are well formed under a set of policy flags, before any elliptic curve math
runs. The `key` module holds the private key engine: deterministic ECDSA,
BCH-style Schnorr, and recoverable compact signatures over secp256k1.

## Usage

```rust
use sigforge::key::PrivateKey;
use sigforge::util::sha256d;

let key = PrivateKey::generate(true);
let hash = sha256d(b"message");
let sig = key.sign_ecdsa(&hash).unwrap();
assert!(key.public_key().verify_ecdsa(&hash, &sig));
```

## Determinism
All signing is RFC 6979 deterministic: the same key and message always
produce the same signature, independent of the key's compression preference,
and the ECDSA and Schnorr nonce derivations are domain separated so the two
schemes never share a nonce over the same message.

## Security
- Encoding checks never panic on attacker-controlled input; DER is walked
  with a bounds-checked cursor.
- Verification functions return `false` on malformed input rather than
  raising an error.
*/

pub mod key;
pub mod script;
pub mod util;
