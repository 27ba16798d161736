//! Common helpers for projection math (isometric and authalic latitude conversions).

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

/// Meridional scale factor at latitude phi: cos(φ) / sqrt(1 - e²·sin²φ).
pub fn msfn(phi: f64, e2: f64) -> f64 {
    let sin_phi = phi.sin();
    phi.cos() / (1.0 - e2 * sin_phi * sin_phi).sqrt()
}

/// Isometric latitude function: tan(π/4 - φ/2) / ((1 - e·sinφ)/(1 + e·sinφ))^(e/2).
///
/// For positive latitudes tsfn < 1, so -ln(tsfn) > 0.
pub fn tsfn(phi: f64, e: f64) -> f64 {
    let sin_phi = phi.sin();
    let con = e * sin_phi;
    (FRAC_PI_4 - phi / 2.0).tan() / ((1.0 - con) / (1.0 + con)).powf(e / 2.0)
}

/// Recover latitude from the isometric latitude function value `ts`.
///
/// Fixed-point iteration: φ = π/2 - 2·atan(ts·((1-e·sinφ)/(1+e·sinφ))^(e/2)).
pub fn phi_from_ts(ts: f64, e: f64) -> f64 {
    let mut phi = FRAC_PI_2 - 2.0 * ts.atan();
    for _ in 0..15 {
        let con = e * phi.sin();
        let next = FRAC_PI_2 - 2.0 * (ts * ((1.0 - con) / (1.0 + con)).powf(e / 2.0)).atan();
        if (next - phi).abs() < 1e-12 {
            return next;
        }
        phi = next;
    }
    phi
}

/// Authalic latitude function q(φ) used by equal-area projections.
pub fn qsfn(phi: f64, e: f64) -> f64 {
    if e < 1e-7 {
        return 2.0 * phi.sin();
    }
    let sin_phi = phi.sin();
    let con = e * sin_phi;
    let e2 = e * e;
    (1.0 - e2)
        * (sin_phi / (1.0 - con * con) - (1.0 / (2.0 * e)) * ((1.0 - con) / (1.0 + con)).ln())
}

/// Recover latitude from an authalic latitude function value `q` by Newton
/// iteration on q(φ). Values at or beyond q(±90°) map to the poles.
pub fn phi_from_q(q: f64, e: f64) -> f64 {
    let q_pole = qsfn(FRAC_PI_2, e);
    if q.abs() >= q_pole * (1.0 - 1e-12) {
        return FRAC_PI_2.copysign(q);
    }

    let e2 = e * e;
    let mut phi = (q / 2.0).asin();
    for _ in 0..15 {
        let sin_phi = phi.sin();
        let con = e * sin_phi;
        let one_minus = 1.0 - con * con;
        let dq_dphi = (1.0 - e2) * 2.0 * phi.cos() / (one_minus * one_minus);
        let delta = (q - qsfn(phi, e)) / dq_dphi;
        phi += delta;
        if delta.abs() < 1e-12 {
            break;
        }
    }
    phi
}
