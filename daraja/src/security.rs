//! Security-credential generation for initiator-authenticated operations.
//!
//! B2C, transaction status, account balance and reversal calls carry a
//! `SecurityCredential`: the initiator password RSA-encrypted with the
//! public key of the environment's X.509 certificate, base64-encoded.
//! The cryptographic dependencies are optional; without the `crypto`
//! feature [`generate_security_credential`] fails with
//! [`CredentialError::Unsupported`].

use std::path::PathBuf;

use crate::error::CredentialError;

/// An X.509 certificate input: a file path or raw PEM bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Certificate {
    /// Path to a PEM certificate file.
    Path(PathBuf),
    /// Raw PEM bytes.
    Pem(Vec<u8>),
}

impl From<PathBuf> for Certificate {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&std::path::Path> for Certificate {
    fn from(path: &std::path::Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<&str> for Certificate {
    /// A bare string names a certificate file.
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<Vec<u8>> for Certificate {
    fn from(pem: Vec<u8>) -> Self {
        Self::Pem(pem)
    }
}

impl From<&[u8]> for Certificate {
    fn from(pem: &[u8]) -> Self {
        Self::Pem(pem.to_vec())
    }
}

impl Certificate {
    /// Reads the PEM bytes, touching the filesystem only for the
    /// [`Certificate::Path`] form.
    fn pem_bytes(&self) -> Result<Vec<u8>, CredentialError> {
        match self {
            Self::Path(path) => Ok(std::fs::read(path)?),
            Self::Pem(bytes) => Ok(bytes.clone()),
        }
    }
}

/// Encrypts `password` with the certificate's RSA public key
/// (PKCS#1 v1.5) and returns the base64 ciphertext.
///
/// # Errors
///
/// Returns [`CredentialError::Read`] if the certificate file cannot be
/// read, [`CredentialError::Certificate`] if it cannot be parsed or
/// carries no RSA key, and [`CredentialError::Encrypt`] if encryption
/// fails.
#[cfg(feature = "crypto")]
pub fn generate_security_credential(
    password: &str,
    certificate: &Certificate,
) -> Result<String, CredentialError> {
    use rsa::pkcs8::DecodePublicKey;
    use rsa::{Pkcs1v15Encrypt, RsaPublicKey};
    use x509_cert::der::{DecodePem, Encode};

    let pem = certificate.pem_bytes()?;
    let parsed = x509_cert::Certificate::from_pem(&pem)
        .map_err(|e| CredentialError::Certificate(e.to_string()))?;
    let spki_der = parsed
        .tbs_certificate
        .subject_public_key_info
        .to_der()
        .map_err(|e| CredentialError::Certificate(e.to_string()))?;
    let public_key = RsaPublicKey::from_public_key_der(&spki_der)
        .map_err(|e| CredentialError::Certificate(e.to_string()))?;

    let ciphertext = public_key
        .encrypt(&mut rand::thread_rng(), Pkcs1v15Encrypt, password.as_bytes())
        .map_err(|e| CredentialError::Encrypt(e.to_string()))?;
    Ok(crate::credentials::base64_encode(ciphertext))
}

/// Stub for builds without cryptographic support.
///
/// # Errors
///
/// Always returns [`CredentialError::Unsupported`].
#[cfg(not(feature = "crypto"))]
pub fn generate_security_credential(
    _password: &str,
    _certificate: &Certificate,
) -> Result<String, CredentialError> {
    Err(CredentialError::Unsupported)
}
