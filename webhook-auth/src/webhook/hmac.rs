//! Keyed-hash digests and their text encodings.

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use md5::Md5;
use ripemd::Ripemd160;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512, Sha512_224, Sha512_256};
use sha3::{Sha3_224, Sha3_256, Sha3_384, Sha3_512};

use crate::error::{computation_error, ComputationErrorKind, Error};

/// Hash functions available for HMAC signatures, named as OpenSSL names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Sha512_224,
    Sha512_256,
    Sha3_224,
    Sha3_256,
    Sha3_384,
    Sha3_512,
    Ripemd160,
}

impl HashAlgorithm {
    /// Get the algorithm identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha224 => "sha224",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
            HashAlgorithm::Sha512_224 => "sha512-224",
            HashAlgorithm::Sha512_256 => "sha512-256",
            HashAlgorithm::Sha3_224 => "sha3-224",
            HashAlgorithm::Sha3_256 => "sha3-256",
            HashAlgorithm::Sha3_384 => "sha3-384",
            HashAlgorithm::Sha3_512 => "sha3-512",
            HashAlgorithm::Ripemd160 => "ripemd160",
        }
    }

    /// Compute the HMAC of `message` keyed with `secret`.
    pub fn digest(&self, secret: &[u8], message: &[u8]) -> Result<Vec<u8>, Error> {
        match self {
            HashAlgorithm::Md5 => compute::<Hmac<Md5>>(secret, message),
            HashAlgorithm::Sha1 => compute::<Hmac<Sha1>>(secret, message),
            HashAlgorithm::Sha224 => compute::<Hmac<Sha224>>(secret, message),
            HashAlgorithm::Sha256 => compute::<Hmac<Sha256>>(secret, message),
            HashAlgorithm::Sha384 => compute::<Hmac<Sha384>>(secret, message),
            HashAlgorithm::Sha512 => compute::<Hmac<Sha512>>(secret, message),
            HashAlgorithm::Sha512_224 => compute::<Hmac<Sha512_224>>(secret, message),
            HashAlgorithm::Sha512_256 => compute::<Hmac<Sha512_256>>(secret, message),
            HashAlgorithm::Sha3_224 => compute::<Hmac<Sha3_224>>(secret, message),
            HashAlgorithm::Sha3_256 => compute::<Hmac<Sha3_256>>(secret, message),
            HashAlgorithm::Sha3_384 => compute::<Hmac<Sha3_384>>(secret, message),
            HashAlgorithm::Sha3_512 => compute::<Hmac<Sha3_512>>(secret, message),
            HashAlgorithm::Ripemd160 => compute::<Hmac<Ripemd160>>(secret, message),
        }
    }
}

fn compute<M>(secret: &[u8], message: &[u8]) -> Result<Vec<u8>, Error>
where
    M: Mac + KeyInit,
{
    let mut mac = <M as Mac>::new_from_slice(secret)
        .map_err(|_| computation_error(ComputationErrorKind::InvalidKey, "Invalid HMAC key"))?;
    mac.update(message);

    Ok(mac.finalize().into_bytes().to_vec())
}

impl FromStr for HashAlgorithm {
    type Err = Error;

    /// Accepts OpenSSL digest names in any case, with or without dashes and
    /// with the `RSA-` alias prefix (`sha256`, `SHA-256`, `RSA-SHA256`).
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let normalized = name.to_ascii_lowercase().replace(['-', '_'], "");
        let digest = normalized.strip_prefix("rsa").unwrap_or(&normalized);

        match digest {
            "md5" => Ok(HashAlgorithm::Md5),
            "sha1" => Ok(HashAlgorithm::Sha1),
            "sha224" => Ok(HashAlgorithm::Sha224),
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha384" => Ok(HashAlgorithm::Sha384),
            "sha512" => Ok(HashAlgorithm::Sha512),
            "sha512224" => Ok(HashAlgorithm::Sha512_224),
            "sha512256" => Ok(HashAlgorithm::Sha512_256),
            "sha3224" => Ok(HashAlgorithm::Sha3_224),
            "sha3256" => Ok(HashAlgorithm::Sha3_256),
            "sha3384" => Ok(HashAlgorithm::Sha3_384),
            "sha3512" => Ok(HashAlgorithm::Sha3_512),
            "ripemd160" | "rmd160" | "ripemd" => Ok(HashAlgorithm::Ripemd160),
            _ => Err(computation_error(
                ComputationErrorKind::UnsupportedAlgorithm,
                &format!("Invalid digest: {name}"),
            )),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Text encoding applied to the raw digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Lowercase hexadecimal.
    #[default]
    Hex,
    /// Standard alphabet with padding.
    Base64,
}

impl Encoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Hex => "hex",
            Encoding::Base64 => "base64",
        }
    }

    pub fn encode(&self, digest: &[u8]) -> String {
        match self {
            Encoding::Hex => hex::encode(digest),
            Encoding::Base64 => BASE64.encode(digest),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
