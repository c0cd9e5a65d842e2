//! Text export of verification artifacts.
//!
//! Points are affine with decimal coordinates. A G1 point is written
//! `["X", "Y"]`; a G2 point `[["X.c1", "X.c0"],["Y.c1", "Y.c0"]]`, the
//! extension components most significant first. A verifying key is its points
//! one per line, each followed by a comma, then the public-input commitment
//! vector as one bracketed list of G1 points. A proof is its points separated
//! by `,` and a newline.
//!
//! The point at infinity is written with both coordinates `0`.

use std::{fmt, str::FromStr};

use ark_bn254::{Bn254, Fq, Fq2, G1Affine, G2Affine};
use ark_ec::AffineRepr;
use ark_ff::PrimeField;
use ark_groth16::{Proof, VerifyingKey};
use num_bigint::BigUint;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed export: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unexpected layout: {0}")]
    Shape(String),
    #[error("Invalid coordinate {0:?}")]
    Coordinate(String),
    #[error("Point is not in the expected group: {0}")]
    NotOnCurve(String),
}
pub type ExportError = Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct G1Coordinates {
    pub x: String,
    pub y: String,
}

/// Each coordinate as `[c1, c0]`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct G2Coordinates {
    pub x: [String; 2],
    pub y: [String; 2],
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportedPoint {
    G1(G1Coordinates),
    G2(G2Coordinates),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedVerifyingKey {
    /// Fixed fields in export order
    pub points: Vec<ExportedPoint>,
    /// Public-input commitment vector
    pub ic: Vec<G1Coordinates>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedProof {
    pub points: Vec<ExportedPoint>,
}

impl fmt::Display for G1Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[\"{}\", \"{}\"]", self.x, self.y)
    }
}

impl fmt::Display for G2Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[[\"{}\", \"{}\"],[\"{}\", \"{}\"]]",
            self.x[0], self.x[1], self.y[0], self.y[1]
        )
    }
}

impl fmt::Display for ExportedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::G1(point) => point.fmt(f),
            Self::G2(point) => point.fmt(f),
        }
    }
}

impl fmt::Display for ExportedVerifyingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for point in &self.points {
            writeln!(f, "{point},")?;
        }
        write!(f, "[")?;
        for (i, point) in self.ic.iter().enumerate() {
            if i > 0 {
                writeln!(f, ",")?;
            }
            write!(f, "{point}")?;
        }
        writeln!(f, "]")
    }
}

impl fmt::Display for ExportedProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, point) in self.points.iter().enumerate() {
            if i > 0 {
                writeln!(f, ",")?;
            }
            write!(f, "{point}")?;
        }
        writeln!(f)
    }
}

fn string_pair(value: &Value) -> Option<[String; 2]> {
    match value.as_array()?.as_slice() {
        [a, b] => Some([a.as_str()?.to_owned(), b.as_str()?.to_owned()]),
        _ => None,
    }
}

fn parse_g1(value: &Value) -> Result<G1Coordinates, Error> {
    let [x, y] =
        string_pair(value).ok_or_else(|| Error::Shape(format!("expected a G1 point, got {value}")))?;
    Ok(G1Coordinates { x, y })
}

fn parse_point(value: &Value) -> Result<ExportedPoint, Error> {
    if let Some([x, y]) = string_pair(value) {
        return Ok(ExportedPoint::G1(G1Coordinates { x, y }));
    }

    match value.as_array().map(Vec::as_slice) {
        Some([x, y]) => match (string_pair(x), string_pair(y)) {
            (Some(x), Some(y)) => Ok(ExportedPoint::G2(G2Coordinates { x, y })),
            _ => Err(Error::Shape(format!("expected a curve point, got {value}"))),
        },
        _ => Err(Error::Shape(format!("expected a curve point, got {value}"))),
    }
}

/// The export is a comma-separated sequence of JSON arrays
fn parse_fields(text: &str) -> Result<Vec<Value>, Error> {
    Ok(serde_json::from_str(&format!("[{text}]"))?)
}

impl FromStr for ExportedVerifyingKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = parse_fields(s)?;
        let ic = fields
            .pop()
            .ok_or_else(|| Error::Shape("empty verifying key".to_owned()))?;
        let ic = ic
            .as_array()
            .ok_or_else(|| Error::Shape(format!("expected the commitment vector, got {ic}")))?
            .iter()
            .map(parse_g1)
            .collect::<Result<_, _>>()?;

        Ok(Self {
            points: fields.iter().map(parse_point).collect::<Result<_, _>>()?,
            ic,
        })
    }
}

impl FromStr for ExportedProof {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self {
            points: parse_fields(s)?
                .iter()
                .map(parse_point)
                .collect::<Result<_, _>>()?,
        })
    }
}

fn decimal(value: Fq) -> String {
    BigUint::from(value).to_string()
}

fn base_field(coordinate: &str) -> Result<Fq, Error> {
    let value = coordinate
        .parse::<BigUint>()
        .map_err(|_| Error::Coordinate(coordinate.to_owned()))?;
    if value >= BigUint::from(Fq::MODULUS) {
        return Err(Error::Coordinate(coordinate.to_owned()));
    }
    Ok(Fq::from(value))
}

impl From<&G1Affine> for G1Coordinates {
    fn from(point: &G1Affine) -> Self {
        let (x, y) = point.xy().unwrap_or_default();
        Self {
            x: decimal(x),
            y: decimal(y),
        }
    }
}

impl From<&G2Affine> for G2Coordinates {
    fn from(point: &G2Affine) -> Self {
        let (x, y) = point.xy().unwrap_or_default();
        Self {
            x: [decimal(x.c1), decimal(x.c0)],
            y: [decimal(y.c1), decimal(y.c0)],
        }
    }
}

impl G1Coordinates {
    pub fn to_affine(&self) -> Result<G1Affine, Error> {
        let (x, y) = (base_field(&self.x)?, base_field(&self.y)?);
        if x == Fq::from(0u64) && y == Fq::from(0u64) {
            return Ok(G1Affine::identity());
        }

        let point = G1Affine::new_unchecked(x, y);
        if !point.is_on_curve() || !point.is_in_correct_subgroup_assuming_on_curve() {
            return Err(Error::NotOnCurve(self.to_string()));
        }
        Ok(point)
    }
}

impl G2Coordinates {
    pub fn to_affine(&self) -> Result<G2Affine, Error> {
        let coordinate = |[c1, c0]: &[String; 2]| -> Result<Fq2, Error> {
            Ok(Fq2::new(base_field(c0)?, base_field(c1)?))
        };
        let (x, y) = (coordinate(&self.x)?, coordinate(&self.y)?);
        if x == Fq2::from(0u64) && y == Fq2::from(0u64) {
            return Ok(G2Affine::identity());
        }

        let point = G2Affine::new_unchecked(x, y);
        if !point.is_on_curve() || !point.is_in_correct_subgroup_assuming_on_curve() {
            return Err(Error::NotOnCurve(self.to_string()));
        }
        Ok(point)
    }
}

impl ExportedPoint {
    fn g1(&self, field: &str) -> Result<G1Affine, Error> {
        match self {
            Self::G1(point) => point.to_affine(),
            Self::G2(_) => Err(Error::Shape(format!("{field} must be a G1 point"))),
        }
    }

    fn g2(&self, field: &str) -> Result<G2Affine, Error> {
        match self {
            Self::G2(point) => point.to_affine(),
            Self::G1(_) => Err(Error::Shape(format!("{field} must be a G2 point"))),
        }
    }
}

/// `alpha_g1, beta_g2, gamma_g2, delta_g2`, then `gamma_abc_g1` as the
/// commitment vector
impl From<&VerifyingKey<Bn254>> for ExportedVerifyingKey {
    fn from(vk: &VerifyingKey<Bn254>) -> Self {
        Self {
            points: vec![
                ExportedPoint::G1((&vk.alpha_g1).into()),
                ExportedPoint::G2((&vk.beta_g2).into()),
                ExportedPoint::G2((&vk.gamma_g2).into()),
                ExportedPoint::G2((&vk.delta_g2).into()),
            ],
            ic: vk.gamma_abc_g1.iter().map(G1Coordinates::from).collect(),
        }
    }
}

impl ExportedVerifyingKey {
    pub fn to_groth16(&self) -> Result<VerifyingKey<Bn254>, Error> {
        let [alpha, beta, gamma, delta] = self.points.as_slice() else {
            return Err(Error::Shape(format!(
                "groth16 verifying key has 4 fixed points, got {}",
                self.points.len()
            )));
        };
        if self.ic.is_empty() {
            return Err(Error::Shape("empty commitment vector".to_owned()));
        }

        Ok(VerifyingKey {
            alpha_g1: alpha.g1("alpha")?,
            beta_g2: beta.g2("beta")?,
            gamma_g2: gamma.g2("gamma")?,
            delta_g2: delta.g2("delta")?,
            gamma_abc_g1: self
                .ic
                .iter()
                .map(G1Coordinates::to_affine)
                .collect::<Result<_, _>>()?,
        })
    }
}

/// `a, c` then `b`: G1 fields before the G2 field
impl From<&Proof<Bn254>> for ExportedProof {
    fn from(proof: &Proof<Bn254>) -> Self {
        Self {
            points: vec![
                ExportedPoint::G1((&proof.a).into()),
                ExportedPoint::G1((&proof.c).into()),
                ExportedPoint::G2((&proof.b).into()),
            ],
        }
    }
}

impl ExportedProof {
    pub fn to_groth16(&self) -> Result<Proof<Bn254>, Error> {
        let [a, c, b] = self.points.as_slice() else {
            return Err(Error::Shape(format!(
                "groth16 proof has 3 points, got {}",
                self.points.len()
            )));
        };

        Ok(Proof {
            a: a.g1("a")?,
            b: b.g2("b")?,
            c: c.g1("c")?,
        })
    }
}
