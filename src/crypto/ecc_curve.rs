use std::fmt;

/// The OpenPGP-relevant elliptic curves, identified by their ASN.1 OID.
#[derive(Clone, PartialEq, Eq)]
pub enum EccCurve {
    Curve25519,
    Ed25519,
    P256,
    P384,
    P521,
    BrainpoolP256r1,
    BrainpoolP384r1,
    BrainpoolP512r1,
    Secp256k1,
    /// A curve we do not recognize, carrying its raw OID bytes.
    Unknown(Vec<u8>),
}

impl EccCurve {
    /// Standard name
    pub fn name(&self) -> &str {
        match self {
            EccCurve::Curve25519 => "Curve25519",
            EccCurve::Ed25519 => "Ed25519",
            EccCurve::P256 => "NIST P-256",
            EccCurve::P384 => "NIST P-384",
            EccCurve::P521 => "NIST P-521",
            EccCurve::BrainpoolP256r1 => "brainpoolP256r1",
            EccCurve::BrainpoolP384r1 => "brainpoolP384r1",
            EccCurve::BrainpoolP512r1 => "brainpoolP512r1",
            EccCurve::Secp256k1 => "secp256k1",
            EccCurve::Unknown(_) => "unknown",
        }
    }

    /// ASN.1 DER encoded OID, as it appears on the wire.
    pub fn oid(&self) -> &[u8] {
        match self {
            EccCurve::Curve25519 => &[0x2B, 0x06, 0x01, 0x04, 0x01, 0x97, 0x55, 0x01, 0x05, 0x01],
            EccCurve::Ed25519 => &[0x2B, 0x06, 0x01, 0x04, 0x01, 0xDA, 0x47, 0x0F, 0x01],
            EccCurve::P256 => &[0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x03, 0x01, 0x07],
            EccCurve::P384 => &[0x2B, 0x81, 0x04, 0x00, 0x22],
            EccCurve::P521 => &[0x2B, 0x81, 0x04, 0x00, 0x23],
            EccCurve::BrainpoolP256r1 => &[0x2B, 0x24, 0x03, 0x03, 0x02, 0x08, 0x01, 0x01, 0x07],
            EccCurve::BrainpoolP384r1 => &[0x2B, 0x24, 0x03, 0x03, 0x02, 0x08, 0x01, 0x01, 0x0B],
            EccCurve::BrainpoolP512r1 => &[0x2B, 0x24, 0x03, 0x03, 0x02, 0x08, 0x01, 0x01, 0x0D],
            EccCurve::Secp256k1 => &[0x2B, 0x81, 0x04, 0x00, 0x0A],
            EccCurve::Unknown(oid) => oid,
        }
    }

    /// Nominal bit length of the curve
    pub fn nbits(&self) -> u16 {
        match self {
            EccCurve::Curve25519 => 255,
            EccCurve::Ed25519 => 255,
            EccCurve::P256 => 256,
            EccCurve::P384 => 384,
            EccCurve::P521 => 521,
            EccCurve::BrainpoolP256r1 => 256,
            EccCurve::BrainpoolP384r1 => 384,
            EccCurve::BrainpoolP512r1 => 512,
            EccCurve::Secp256k1 => 256,
            EccCurve::Unknown(_) => 0,
        }
    }
}

impl fmt::Debug for EccCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EccCurve::Unknown(oid) => write!(f, "Unknown({})", hex::encode(oid)),
            _ => f.write_str(self.name()),
        }
    }
}

/// Get the curve for the given raw OID bytes.
pub fn ecc_curve_from_oid(oid: &[u8]) -> EccCurve {
    const KNOWN: [EccCurve; 9] = [
        EccCurve::Curve25519,
        EccCurve::Ed25519,
        EccCurve::P256,
        EccCurve::P384,
        EccCurve::P521,
        EccCurve::BrainpoolP256r1,
        EccCurve::BrainpoolP384r1,
        EccCurve::BrainpoolP512r1,
        EccCurve::Secp256k1,
    ];

    for curve in KNOWN {
        if curve.oid() == oid {
            return curve;
        }
    }

    EccCurve::Unknown(oid.to_vec())
}
