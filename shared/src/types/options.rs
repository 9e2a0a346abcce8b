//! Balancer options and SR adjustment curves

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A curve control point: anchor position plus its handle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BezierPoint {
    pub position: Point,
    pub control: Point,
}

impl BezierPoint {
    /// Two-point flat curve used until the user edits it
    pub fn default_curve() -> Vec<BezierPoint> {
        const HANDLE_X: f64 = 0.05982905982905983;

        vec![
            BezierPoint {
                position: Point { x: 0.0, y: 0.0 },
                control: Point { x: HANDLE_X, y: 1.0 },
            },
            BezierPoint {
                position: Point { x: 1.0, y: 0.0 },
                control: Point { x: HANDLE_X, y: 1.0 },
            },
        ]
    }
}

/// Adjustment curves for one role, split by how the player plays it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecializationPoints {
    pub any: Vec<BezierPoint>,
    pub primary: Vec<BezierPoint>,
    pub secondary: Vec<BezierPoint>,
}

impl SpecializationPoints {
    /// Same curve for every specialization
    pub fn uniform(points: Vec<BezierPoint>) -> Self {
        Self {
            any: points.clone(),
            primary: points.clone(),
            secondary: points,
        }
    }
}

impl Default for SpecializationPoints {
    fn default() -> Self {
        Self::uniform(BezierPoint::default_curve())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustSr {
    pub is_enabled: bool,
    pub tank: SpecializationPoints,
    pub support: SpecializationPoints,
    pub dps: SpecializationPoints,
}

/// Which seeding stages the engine skips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisableType {
    #[default]
    None,
    /// Skip captain/squire distribution
    ExCaps,
    /// Skip lieutenant/ensign distribution
    LeutEns,
}

impl fmt::Display for DisableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisableType::None => write!(f, "none"),
            DisableType::ExCaps => write!(f, "ex_caps"),
            DisableType::LeutEns => write!(f, "leut_ens"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BalancerOptions {
    pub range: u32,
    pub tries_count: u32,
    pub low_rank_limiter: bool,
    pub dispersion_minimizer: bool,
    pub disallow_secondary_roles: bool,
    pub disable_type: DisableType,
    pub adjust_sr: AdjustSr,
}

impl Default for BalancerOptions {
    fn default() -> Self {
        Self {
            range: 20,
            tries_count: 10,
            low_rank_limiter: false,
            dispersion_minimizer: false,
            disallow_secondary_roles: false,
            disable_type: DisableType::None,
            adjust_sr: AdjustSr::default(),
        }
    }
}
